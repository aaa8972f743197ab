// ABOUTME: HTTP request handlers for quote operations
// ABOUTME: Vendor-only creation with caller-derived identity; filtered visibility

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use procura_core::{validate_quote_input, QuoteCreateInput, QuoteDetail, QuoteUpdateInput};

use crate::auth::{authorize, Caller, ADMIN_OR_VENDOR, VENDOR_ONLY};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::ApiState;

/// List quotes. Admins see all; vendors see only their own.
pub async fn list_quotes(
    State(state): State<ApiState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Listing quotes");

    let quotes = if caller.staff {
        state.db.quote_storage.list_quotes().await?
    } else {
        let vendor = caller.require_vendor()?;
        state
            .db
            .quote_storage
            .list_quotes_for_vendor(&vendor.id)
            .await?
    };

    Ok(ResponseJson(ApiResponse::success(quotes)))
}

/// Submit a quote. The vendor identity comes exclusively from the caller's
/// linked vendor record; a vendor id in the body is ignored (the input type
/// has no such field), so a vendor can never quote on another's behalf.
pub async fn create_quote(
    State(state): State<ApiState>,
    caller: Caller,
    Json(request): Json<QuoteCreateInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, VENDOR_ONLY)?;
    let vendor = caller.require_vendor()?;

    info!("Creating quote (rfp: {}, vendor: {})", request.rfp_id, vendor.id);

    let errors = validate_quote_input(&request);
    if !errors.is_empty() {
        return Err(ApiError::from_validation(errors));
    }

    let quote = state
        .db
        .quote_storage
        .create_quote(&vendor.id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(quote)),
    ))
}

/// Fetch a quote with the caller's visibility applied: admins reach any
/// quote, vendors only their own (anything else reads as not-found).
async fn get_visible_quote(
    state: &ApiState,
    caller: &Caller,
    quote_id: &str,
) -> Result<QuoteDetail, ApiError> {
    if caller.staff {
        Ok(state.db.quote_storage.get_quote(quote_id).await?)
    } else {
        let vendor = caller.require_vendor()?;
        Ok(state
            .db
            .quote_storage
            .get_quote_for_vendor(quote_id, &vendor.id)
            .await?)
    }
}

/// Get a single quote by ID
pub async fn get_quote(
    State(state): State<ApiState>,
    caller: Caller,
    Path(quote_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Getting quote: {}", quote_id);

    let quote = get_visible_quote(&state, &caller, &quote_id).await?;
    Ok(ResponseJson(ApiResponse::success(quote)))
}

/// Update a quote (admin, or the owning vendor)
pub async fn update_quote(
    State(state): State<ApiState>,
    caller: Caller,
    Path(quote_id): Path<String>,
    Json(request): Json<QuoteUpdateInput>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Updating quote: {}", quote_id);

    // Ownership check before the write
    get_visible_quote(&state, &caller, &quote_id).await?;

    let quote = state.db.quote_storage.update_quote(&quote_id, request).await?;
    Ok(ResponseJson(ApiResponse::success(quote)))
}

/// Delete a quote (admin, or the owning vendor)
pub async fn delete_quote(
    State(state): State<ApiState>,
    caller: Caller,
    Path(quote_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_OR_VENDOR)?;

    info!("Deleting quote: {}", quote_id);

    // Ownership check before the write
    get_visible_quote(&state, &caller, &quote_id).await?;

    state.db.quote_storage.delete_quote(&quote_id).await?;
    Ok(ResponseJson(ApiResponse::success(
        "Quote deleted successfully",
    )))
}
