// ABOUTME: RFP storage layer using SQLite
// ABOUTME: Role-filtered listing plus the assigned-vendor/category cross-check

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use procura_core::{Rfp, RfpInput};

use crate::error::StorageError;

pub struct RfpStorage {
    pool: SqlitePool,
}

impl RfpStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all RFPs, newest first (admin view)
    pub async fn list_rfps(&self) -> Result<Vec<Rfp>, StorageError> {
        let rows = sqlx::query("SELECT * FROM rfps ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_rfp).collect()
    }

    /// List RFPs in one category (vendor view). A vendor without a category
    /// sees none; callers pass `None` for that case.
    pub async fn list_rfps_by_category(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<Rfp>, StorageError> {
        let Some(category_id) = category_id else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query("SELECT * FROM rfps WHERE category_id = ? ORDER BY created_at DESC")
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_rfp).collect()
    }

    /// Get a single RFP by ID
    pub async fn get_rfp(&self, rfp_id: &str) -> Result<Rfp, StorageError> {
        let row = sqlx::query("SELECT * FROM rfps WHERE id = ?")
            .bind(rfp_id)
            .fetch_one(&self.pool)
            .await?;

        row_to_rfp(&row)
    }

    pub async fn rfp_exists(&self, rfp_id: &str) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rfps WHERE id = ?")
            .bind(rfp_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Cross-field validation shared by create and update: the referenced
    /// category and vendor must exist, and the assigned vendor must belong
    /// to the RFP's category. Runs before any write.
    async fn validate_references(&self, input: &RfpInput) -> Result<(), StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?")
            .bind(&input.category_id)
            .fetch_one(&self.pool)
            .await?;
        if count == 0 {
            return Err(StorageError::field("category_id", "Category does not exist"));
        }

        let vendor_category: Option<Option<String>> =
            sqlx::query_scalar("SELECT category_id FROM vendors WHERE id = ?")
                .bind(&input.assigned_vendor_id)
                .fetch_optional(&self.pool)
                .await?;

        match vendor_category {
            None => Err(StorageError::field(
                "assigned_vendor_id",
                "Vendor does not exist",
            )),
            Some(category) if category.as_deref() != Some(input.category_id.as_str()) => {
                Err(StorageError::field(
                    "assigned_vendor_id",
                    "This vendor does not belong to the selected category",
                ))
            }
            Some(_) => Ok(()),
        }
    }

    /// Create a new RFP
    pub async fn create_rfp(&self, input: RfpInput) -> Result<Rfp, StorageError> {
        self.validate_references(&input).await?;

        let rfp_id = procura_core::rfp_id();
        let now = Utc::now();

        debug!("Creating RFP: {} (name: {})", rfp_id, input.name);

        sqlx::query(
            r#"
            INSERT INTO rfps (id, name, description, quantity, last_date, min_price, max_price,
                              category_id, assigned_vendor_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rfp_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.last_date)
        .bind(input.min_price)
        .bind(input.max_price)
        .bind(&input.category_id)
        .bind(&input.assigned_vendor_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_rfp(&rfp_id).await
    }

    /// Replace an RFP's fields
    pub async fn update_rfp(&self, rfp_id: &str, input: RfpInput) -> Result<Rfp, StorageError> {
        // 404 first, then cross-field validation
        self.get_rfp(rfp_id).await?;
        self.validate_references(&input).await?;

        debug!("Updating RFP: {}", rfp_id);

        sqlx::query(
            r#"
            UPDATE rfps
            SET name = ?, description = ?, quantity = ?, last_date = ?, min_price = ?,
                max_price = ?, category_id = ?, assigned_vendor_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.last_date)
        .bind(input.min_price)
        .bind(input.max_price)
        .bind(&input.category_id)
        .bind(&input.assigned_vendor_id)
        .bind(Utc::now())
        .bind(rfp_id)
        .execute(&self.pool)
        .await?;

        self.get_rfp(rfp_id).await
    }

    /// Delete an RFP; its quotes cascade
    pub async fn delete_rfp(&self, rfp_id: &str) -> Result<(), StorageError> {
        debug!("Deleting RFP: {}", rfp_id);

        let result = sqlx::query("DELETE FROM rfps WHERE id = ?")
            .bind(rfp_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

/// Convert a database row to an Rfp
fn row_to_rfp(row: &sqlx::sqlite::SqliteRow) -> Result<Rfp, StorageError> {
    Ok(Rfp {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        quantity: row.try_get("quantity")?,
        last_date: row.try_get("last_date")?,
        min_price: row.try_get("min_price")?,
        max_price: row.try_get("max_price")?,
        category_id: row.try_get("category_id")?,
        assigned_vendor_id: row.try_get("assigned_vendor_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
