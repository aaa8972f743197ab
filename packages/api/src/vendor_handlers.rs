// ABOUTME: HTTP request handlers for vendor operations
// ABOUTME: Admin CRUD over vendor profiles plus the public directory lookup

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use procura_core::{VendorCreateInput, VendorUpdateInput};

use crate::auth::{authorize, Caller, ADMIN_ONLY};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::ApiState;

/// List all vendors, newest first
pub async fn list_vendors(
    State(state): State<ApiState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Listing vendors");

    let vendors = state.db.vendor_storage.list_vendors().await?;
    Ok(ResponseJson(ApiResponse::success(vendors)))
}

/// Create a vendor profile for an existing user
pub async fn create_vendor(
    State(state): State<ApiState>,
    caller: Caller,
    Json(request): Json<VendorCreateInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Creating vendor profile (user: {})", request.user_id);

    let vendor = state.db.vendor_storage.create_vendor(request).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(vendor)),
    ))
}

/// Get a single vendor by ID
pub async fn get_vendor(
    State(state): State<ApiState>,
    caller: Caller,
    Path(vendor_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Getting vendor: {}", vendor_id);

    let vendor = state.db.vendor_storage.get_vendor_detail(&vendor_id).await?;
    Ok(ResponseJson(ApiResponse::success(vendor)))
}

/// Update a vendor profile; this is also the approval workflow (status
/// transitions happen only here, by admin action)
pub async fn update_vendor(
    State(state): State<ApiState>,
    caller: Caller,
    Path(vendor_id): Path<String>,
    Json(request): Json<VendorUpdateInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Updating vendor: {}", vendor_id);

    let vendor = state
        .db
        .vendor_storage
        .update_vendor(&vendor_id, request)
        .await?;
    Ok(ResponseJson(ApiResponse::success(vendor)))
}

/// Delete a vendor
pub async fn delete_vendor(
    State(state): State<ApiState>,
    caller: Caller,
    Path(vendor_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Deleting vendor: {}", vendor_id);

    state.db.vendor_storage.delete_vendor(&vendor_id).await?;
    Ok(ResponseJson(ApiResponse::success(
        "Vendor deleted successfully",
    )))
}

#[derive(Deserialize)]
pub struct VendorsByCategoryQuery {
    pub category_id: Option<String>,
}

/// Public directory lookup: approved vendors in a category, projected to
/// id + display name. No authentication required.
pub async fn vendors_by_category(
    State(state): State<ApiState>,
    Query(params): Query<VendorsByCategoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(category_id) = params.category_id else {
        return Err(ApiError::BadRequest(
            "category_id query parameter is required".to_string(),
        ));
    };

    info!("Listing approved vendors for category: {}", category_id);

    let vendors = state
        .db
        .vendor_storage
        .directory_by_category(&category_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(vendors)))
}
