// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tracing::{debug, info};

use chrono::Utc;
use procura_auth::ResetTokenStorage;
use procura_core::{User, Vendor, VendorRegistrationInput};
use procura_notify::{enqueue_mail, MailDraft, OutboxStorage};

use crate::categories::CategoryStorage;
use crate::error::{
    map_unique_violation, StorageError, USER_UNIQUE_COLUMNS, VENDOR_UNIQUE_COLUMNS,
};
use crate::quotes::QuoteStorage;
use crate::rfps::RfpStorage;
use crate::users::{row_to_user, UserStorage};
use crate::vendors::{row_to_vendor, VendorStorage};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub category_storage: Arc<CategoryStorage>,
    pub vendor_storage: Arc<VendorStorage>,
    pub rfp_storage: Arc<RfpStorage>,
    pub quote_storage: Arc<QuoteStorage>,
    pub reset_tokens: Arc<ResetTokenStorage>,
    pub outbox: Arc<OutboxStorage>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            category_storage: Arc::new(CategoryStorage::new(pool.clone())),
            vendor_storage: Arc::new(VendorStorage::new(pool.clone())),
            rfp_storage: Arc::new(RfpStorage::new(pool.clone())),
            quote_storage: Arc::new(QuoteStorage::new(pool.clone())),
            reset_tokens: Arc::new(ResetTokenStorage::new(pool.clone())),
            outbox: Arc::new(OutboxStorage::new(pool.clone())),
            pool,
        }
    }

    /// Initialize database state with the given database path
    pub async fn init_with_path(database_path: &std::path::Path) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        debug!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&database_url)
            .await?;

        Self::configure_and_migrate(&pool).await?;

        info!("Database connection established");
        Ok(Self::new(pool))
    }

    /// Apply SQLite settings and run migrations on an existing pool.
    pub async fn configure_and_migrate(pool: &SqlitePool) -> Result<(), StorageError> {
        sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;
        sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;
        sqlx::query("PRAGMA synchronous = NORMAL").execute(pool).await?;

        sqlx::migrate!("./migrations").run(pool).await?;

        debug!("Database migrations completed");
        Ok(())
    }

    /// Compound vendor registration: create the user, its vendor profile,
    /// and the welcome mail in one transaction. A uniqueness failure at any
    /// step leaves no rows behind.
    ///
    /// The checks run in the same order the public API documents: username,
    /// email, GST, PAN. Each produces its own field-scoped error.
    pub async fn register_vendor(
        &self,
        input: &VendorRegistrationInput,
        password_hash: &str,
        welcome_mail: &MailDraft,
    ) -> Result<(User, Vendor), StorageError> {
        if self.user_storage.username_exists(&input.username).await? {
            return Err(StorageError::field("username", "Username already exists"));
        }
        if self.user_storage.email_exists(&input.email).await? {
            return Err(StorageError::field("email", "Email already exists"));
        }
        if self.vendor_storage.gst_exists(&input.gst_number, None).await? {
            return Err(StorageError::field("gst_number", "GST number already exists"));
        }
        if self.vendor_storage.pan_exists(&input.pan_number, None).await? {
            return Err(StorageError::field(
                "pan_number",
                "PAN Card number already registered",
            ));
        }
        if self
            .vendor_storage
            .mobile_exists(&input.mobile_number, None)
            .await?
        {
            return Err(StorageError::field(
                "mobile_number",
                "Mobile number already registered",
            ));
        }
        if let Some(category_id) = &input.category_id {
            if !self.category_storage.category_exists(category_id).await? {
                return Err(StorageError::field("category_id", "Category does not exist"));
            }
        }

        let user_id = procura_core::user_id();
        let vendor_id = procura_core::vendor_id();
        let now = Utc::now();

        debug!(
            "Registering vendor: {} (user: {}, username: {})",
            vendor_id, user_id, input.username
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash, is_staff, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, USER_UNIQUE_COLUMNS))?;

        sqlx::query(
            r#"
            INSERT INTO vendors (id, user_id, revenue, employee_count, gst_number, gst_image,
                                 pan_number, pan_image, mobile_number, category_id, status,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'PENDING', ?, ?)
            "#,
        )
        .bind(&vendor_id)
        .bind(&user_id)
        .bind(input.revenue)
        .bind(input.employee_count)
        .bind(&input.gst_number)
        .bind(&input.gst_image)
        .bind(&input.pan_number)
        .bind(&input.pan_image)
        .bind(&input.mobile_number)
        .bind(&input.category_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, VENDOR_UNIQUE_COLUMNS))?;

        enqueue_mail(&mut *tx, welcome_mail).await?;

        tx.commit().await?;

        let user_row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_one(&self.pool)
            .await?;
        let vendor_row = sqlx::query("SELECT * FROM vendors WHERE id = ?")
            .bind(&vendor_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((row_to_user(&user_row)?, row_to_vendor(&vendor_row)?))
    }
}
