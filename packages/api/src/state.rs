// ABOUTME: Shared application state for API handlers
// ABOUTME: Bundles the database state with token signing and link configuration

use procura_auth::TokenSigner;
use procura_storage::DbState;

/// State shared by every handler.
#[derive(Clone)]
pub struct ApiState {
    pub db: DbState,
    pub signer: TokenSigner,
    /// Reset token lifetime in seconds.
    pub reset_ttl_secs: i64,
    /// Base URL of the frontend, used in welcome and reset-link emails.
    pub frontend_url: String,
}

impl ApiState {
    pub fn new(db: DbState, signer: TokenSigner, reset_ttl_secs: i64, frontend_url: String) -> Self {
        Self {
            db,
            signer,
            reset_ttl_secs,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }
}
