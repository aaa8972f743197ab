// ABOUTME: User storage layer using SQLite
// ABOUTME: Account creation, credential lookup, and password updates

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use procura_core::{User, UserCreateInput};

use crate::error::{map_unique_violation, StorageError, USER_UNIQUE_COLUMNS};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user. Username and email are checked up front for a
    /// friendly error; the UNIQUE constraints remain the final authority.
    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        if self.username_exists(&input.username).await? {
            return Err(StorageError::field("username", "Username already exists"));
        }
        if self.email_exists(&input.email).await? {
            return Err(StorageError::field("email", "Email already exists"));
        }

        let user_id = procura_core::user_id();
        let now = Utc::now();

        debug!("Creating user: {} (username: {})", user_id, input.username);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash, is_staff, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.password_hash)
        .bind(input.is_staff as i64)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, USER_UNIQUE_COLUMNS))?;

        self.get_user(&user_id).await
    }

    /// Get a single user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        row_to_user(&row)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Overwrite a user's password hash.
    pub async fn update_password(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), StorageError> {
        debug!("Updating password for user: {}", user_id);

        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

/// Convert a database row to a User
pub(crate) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        password_hash: row.try_get("password_hash")?,
        is_staff: row.try_get::<i64, _>("is_staff")? != 0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
