// ABOUTME: HTTP API layer for Procura providing REST endpoints and routing
// ABOUTME: Integration layer that depends on the storage, auth, and notify packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod auth;
pub mod auth_handlers;
pub mod category_handlers;
pub mod error;
pub mod quote_handlers;
pub mod response;
pub mod rfp_handlers;
pub mod state;
pub mod vendor_handlers;

pub use state::ApiState;

/// Creates the registration and authentication router
pub fn create_auth_router() -> Router<ApiState> {
    Router::new()
        .route("/register/vendor", post(auth_handlers::register_vendor))
        .route("/register/admin", post(auth_handlers::register_admin))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/forgot-password", post(auth_handlers::forgot_password))
        .route("/auth/reset-password", post(auth_handlers::reset_password))
}

/// Creates the categories API router
pub fn create_categories_router() -> Router<ApiState> {
    Router::new()
        .route("/categories", get(category_handlers::list_categories))
        .route("/categories", post(category_handlers::create_category))
        .route("/categories/public", get(category_handlers::public_list_categories))
        .route("/categories/{id}", get(category_handlers::get_category))
        .route("/categories/{id}", put(category_handlers::update_category))
        .route("/categories/{id}", delete(category_handlers::delete_category))
}

/// Creates the vendors API router
pub fn create_vendors_router() -> Router<ApiState> {
    Router::new()
        .route("/vendors", get(vendor_handlers::list_vendors))
        .route("/vendors", post(vendor_handlers::create_vendor))
        .route("/vendors/{id}", get(vendor_handlers::get_vendor))
        .route("/vendors/{id}", put(vendor_handlers::update_vendor))
        .route("/vendors/{id}", delete(vendor_handlers::delete_vendor))
        .route(
            "/vendors-by-category",
            get(vendor_handlers::vendors_by_category),
        )
}

/// Creates the RFPs API router
pub fn create_rfps_router() -> Router<ApiState> {
    Router::new()
        .route("/rfps", get(rfp_handlers::list_rfps))
        .route("/rfps", post(rfp_handlers::create_rfp))
        .route("/rfps/{id}", get(rfp_handlers::get_rfp))
        .route("/rfps/{id}", put(rfp_handlers::update_rfp))
        .route("/rfps/{id}", delete(rfp_handlers::delete_rfp))
}

/// Creates the quotes API router
pub fn create_quotes_router() -> Router<ApiState> {
    Router::new()
        .route("/quotes", get(quote_handlers::list_quotes))
        .route("/quotes", post(quote_handlers::create_quote))
        .route("/quotes/{id}", get(quote_handlers::get_quote))
        .route("/quotes/{id}", put(quote_handlers::update_quote))
        .route("/quotes/{id}", delete(quote_handlers::delete_quote))
}

/// Creates the full application router with state applied
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .merge(create_auth_router())
        .merge(create_categories_router())
        .merge(create_vendors_router())
        .merge(create_rfps_router())
        .merge(create_quotes_router())
        .with_state(state)
}
