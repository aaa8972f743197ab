// ABOUTME: Single-use, time-bound password reset tokens
// ABOUTME: Random tokens stored as SHA-256 hashes, consumed on first successful use

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::AuthError;

/// Reset tokens expire after one hour.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Encode a user id for embedding in a reset link.
pub fn encode_uid(user_id: &str) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(user_id.as_bytes())
}

/// Decode a reset-link user id. Any decode failure is reported as an
/// invalid token; callers must not distinguish causes.
pub fn decode_uid(encoded: &str) -> Result<String, AuthError> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(encoded.as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    String::from_utf8(bytes).map_err(|_| AuthError::InvalidToken)
}

/// Storage for password reset tokens. Only token hashes are persisted.
pub struct ResetTokenStorage {
    pool: SqlitePool,
}

impl ResetTokenStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random token.
    /// Returns a base64-encoded 32-byte token.
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256; the hash is what gets stored.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a token against a stored hash in constant time.
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        let computed = Self::hash_token(token);

        use subtle::ConstantTimeEq;
        computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
    }

    /// Issue a new reset token for a user and return the raw token. The raw
    /// value goes into the reset email and is never stored.
    pub async fn issue(&self, user_id: &str, ttl_secs: i64) -> Result<String, AuthError> {
        let id = procura_core::reset_id();
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);
        let now = Utc::now();
        let expires_at = now + Duration::seconds(ttl_secs);

        debug!("Issuing reset token for user: {}", user_id);

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, user_id, token_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    /// Verify a token for a specific user and consume it. Returns true only
    /// when an unused, unexpired token for that user matches; the matching
    /// row is marked used so it cannot be replayed.
    pub async fn verify_and_consume(&self, user_id: &str, token: &str) -> Result<bool, AuthError> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            SELECT id, token_hash, expires_at FROM password_reset_tokens
            WHERE user_id = ? AND used_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let stored_hash: String = row.try_get("token_hash")?;
            if !Self::verify_token_hash(token, &stored_hash) {
                continue;
            }

            let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
            if expires_at < now {
                debug!("Reset token matched but is expired for user: {}", user_id);
                return Ok(false);
            }

            let id: String = row.try_get("id")?;
            sqlx::query("UPDATE password_reset_tokens SET used_at = ? WHERE id = ?")
                .bind(now)
                .bind(&id)
                .execute(&self.pool)
                .await?;

            return Ok(true);
        }

        Ok(false)
    }
}
