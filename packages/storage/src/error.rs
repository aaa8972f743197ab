// ABOUTME: Storage error types and constraint-violation mapping
// ABOUTME: Translates SQLite UNIQUE violations back into field-scoped errors

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("{field}: {message}")]
    Field { field: String, message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Field {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Column-to-field translations for UNIQUE violations, e.g.
/// `("users.username", "username", "Username already exists")`.
pub type UniqueMap = &'static [(&'static str, &'static str, &'static str)];

pub const USER_UNIQUE_COLUMNS: UniqueMap = &[
    ("users.username", "username", "Username already exists"),
    ("users.email", "email", "Email already exists"),
];

pub const VENDOR_UNIQUE_COLUMNS: UniqueMap = &[
    ("vendors.user_id", "user_id", "User already has a vendor profile"),
    ("vendors.gst_number", "gst_number", "GST number already exists"),
    (
        "vendors.pan_number",
        "pan_number",
        "PAN Card number already registered",
    ),
    (
        "vendors.mobile_number",
        "mobile_number",
        "Mobile number already registered",
    ),
];

pub const CATEGORY_UNIQUE_COLUMNS: UniqueMap =
    &[("categories.name", "name", "Category with this name already exists")];

pub const QUOTE_UNIQUE_COLUMNS: UniqueMap = &[(
    "quotes.rfp_id",
    "rfp_id",
    "A quote for this RFP already exists for this vendor",
)];

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            other => StorageError::Sqlx(other),
        }
    }
}

/// Map a write error to a field-scoped error when it is a UNIQUE violation
/// on one of the listed columns. The database constraint is the final
/// authority behind the application-layer fast-path checks, so a race that
/// slips past those checks still surfaces as the same validation error.
pub fn map_unique_violation(err: sqlx::Error, columns: UniqueMap) -> StorageError {
    if let sqlx::Error::Database(ref db_err) = err {
        let message = db_err.message();
        if message.contains("UNIQUE constraint failed") {
            for (column, field, reason) in columns {
                if message.contains(column) {
                    return StorageError::field(*field, *reason);
                }
            }
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unique_violation_maps_to_field_error() {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE users (id TEXT PRIMARY KEY, username TEXT UNIQUE, email TEXT UNIQUE)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO users (id, username, email) VALUES ('u1', 'acme', 'a@b.c')")
            .execute(&pool)
            .await
            .unwrap();

        let err = sqlx::query("INSERT INTO users (id, username, email) VALUES ('u2', 'acme', 'x@y.z')")
            .execute(&pool)
            .await
            .unwrap_err();

        match map_unique_violation(err, USER_UNIQUE_COLUMNS) {
            StorageError::Field { field, .. } => assert_eq!(field, "username"),
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unmapped_error_passes_through() {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let err = sqlx::query("SELECT * FROM missing_table")
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(matches!(
            map_unique_violation(err, USER_UNIQUE_COLUMNS),
            StorageError::Sqlx(_)
        ));
    }
}
