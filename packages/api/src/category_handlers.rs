// ABOUTME: HTTP request handlers for category operations
// ABOUTME: Admin CRUD plus the public listing used by registration forms

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use procura_core::CategoryInput;

use crate::auth::{authorize, Caller, ADMIN_ONLY};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::ApiState;

/// List all categories (admin view)
pub async fn list_categories(
    State(state): State<ApiState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Listing categories");

    let categories = state.db.category_storage.list_categories().await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

/// Public, unauthenticated category listing for registration forms
pub async fn public_list_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Listing categories (public)");

    let categories = state.db.category_storage.list_categories().await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

/// Create a new category
pub async fn create_category(
    State(state): State<ApiState>,
    caller: Caller,
    Json(request): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Creating category: {}", request.name);

    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Category name is required".to_string()));
    }

    let category = state.db.category_storage.create_category(request).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(category)),
    ))
}

/// Get a single category by ID
pub async fn get_category(
    State(state): State<ApiState>,
    caller: Caller,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Getting category: {}", category_id);

    let category = state.db.category_storage.get_category(&category_id).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

/// Rename a category
pub async fn update_category(
    State(state): State<ApiState>,
    caller: Caller,
    Path(category_id): Path<String>,
    Json(request): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Updating category: {}", category_id);

    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Category name is required".to_string()));
    }

    let category = state
        .db
        .category_storage
        .update_category(&category_id, request)
        .await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

/// Delete a category. Its RFPs are deleted with it; vendors in the category
/// survive with their category reference cleared.
pub async fn delete_category(
    State(state): State<ApiState>,
    caller: Caller,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Deleting category: {}", category_id);

    state.db.category_storage.delete_category(&category_id).await?;
    Ok(ResponseJson(ApiResponse::success(
        "Category deleted successfully",
    )))
}
