// ABOUTME: HTTP request handlers for RFP operations
// ABOUTME: Role-filtered listing; create/update enforce the assigned-vendor category rule

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use procura_core::{validate_rfp_input, RfpInput};

use crate::auth::{authorize, Caller, ADMIN_OR_VENDOR};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::ApiState;

/// List RFPs. Admins see all; vendors see only RFPs in their own category,
/// and a vendor without a category sees none.
pub async fn list_rfps(
    State(state): State<ApiState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Listing RFPs");

    let rfps = if caller.staff {
        state.db.rfp_storage.list_rfps().await?
    } else {
        let vendor = caller.require_vendor()?;
        state
            .db
            .rfp_storage
            .list_rfps_by_category(vendor.category_id.as_deref())
            .await?
    };

    Ok(ResponseJson(ApiResponse::success(rfps)))
}

/// Create a new RFP. The assigned vendor must belong to the RFP's category;
/// a mismatch fails before anything is written.
pub async fn create_rfp(
    State(state): State<ApiState>,
    caller: Caller,
    Json(request): Json<RfpInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Creating RFP: {}", request.name);

    let errors = validate_rfp_input(&request);
    if !errors.is_empty() {
        return Err(ApiError::from_validation(errors));
    }

    let rfp = state.db.rfp_storage.create_rfp(request).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(rfp))))
}

/// Get a single RFP by ID
pub async fn get_rfp(
    State(state): State<ApiState>,
    caller: Caller,
    Path(rfp_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Getting RFP: {}", rfp_id);

    let rfp = state.db.rfp_storage.get_rfp(&rfp_id).await?;
    Ok(ResponseJson(ApiResponse::success(rfp)))
}

/// Replace an RFP's fields, re-validating the assigned-vendor category rule
pub async fn update_rfp(
    State(state): State<ApiState>,
    caller: Caller,
    Path(rfp_id): Path<String>,
    Json(request): Json<RfpInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Updating RFP: {}", rfp_id);

    let errors = validate_rfp_input(&request);
    if !errors.is_empty() {
        return Err(ApiError::from_validation(errors));
    }

    let rfp = state.db.rfp_storage.update_rfp(&rfp_id, request).await?;
    Ok(ResponseJson(ApiResponse::success(rfp)))
}

/// Delete an RFP
pub async fn delete_rfp(
    State(state): State<ApiState>,
    caller: Caller,
    Path(rfp_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Deleting RFP: {}", rfp_id);

    state.db.rfp_storage.delete_rfp(&rfp_id).await?;
    Ok(ResponseJson(ApiResponse::success("RFP deleted successfully")))
}
