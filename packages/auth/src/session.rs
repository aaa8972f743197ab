// ABOUTME: Signed session tokens exchanged at login
// ABOUTME: HS256 JWTs carrying the caller's identity, staff flag, and vendor link

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Default session lifetime: 12 hours.
pub const SESSION_TTL_SECS: i64 = 12 * 60 * 60;

/// Claims embedded in a session token. The vendor link is a hint for
/// clients; handlers re-derive the authoritative link from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: String,
    /// Staff (admin) flag at issue time.
    pub staff: bool,
    /// Linked vendor id, when the user is a vendor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, SESSION_TTL_SECS)
    }

    /// Issue a token for the given user.
    pub fn issue(
        &self,
        user_id: &str,
        staff: bool,
        vendor_id: Option<&str>,
    ) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            staff,
            vendor: vendor_id.map(|v| v.to_string()),
            exp: Utc::now().timestamp() + self.ttl_secs,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token and return its claims. Expired or tampered tokens
    /// fail with `AuthError::InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
