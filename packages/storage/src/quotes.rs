// ABOUTME: Quote storage layer using SQLite
// ABOUTME: Vendor-scoped visibility and the one-quote-per-rfp-per-vendor invariant

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use procura_core::{QuoteCreateInput, QuoteDetail, QuoteUpdateInput};

use crate::error::{map_unique_violation, StorageError, QUOTE_UNIQUE_COLUMNS};

const DETAIL_SELECT: &str = r#"
    SELECT q.*, r.name AS rfp_name, u.first_name, u.last_name, u.username
    FROM quotes q
    JOIN rfps r ON r.id = q.rfp_id
    JOIN vendors v ON v.id = q.vendor_id
    JOIN users u ON u.id = v.user_id
"#;

pub struct QuoteStorage {
    pool: SqlitePool,
}

impl QuoteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all quotes, newest first (admin view)
    pub async fn list_quotes(&self) -> Result<Vec<QuoteDetail>, StorageError> {
        let rows = sqlx::query(&format!("{} ORDER BY q.created_at DESC", DETAIL_SELECT))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_quote_detail).collect()
    }

    /// List one vendor's quotes (vendor view)
    pub async fn list_quotes_for_vendor(
        &self,
        vendor_id: &str,
    ) -> Result<Vec<QuoteDetail>, StorageError> {
        let rows = sqlx::query(&format!(
            "{} WHERE q.vendor_id = ? ORDER BY q.created_at DESC",
            DETAIL_SELECT
        ))
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_quote_detail).collect()
    }

    /// Get a single quote by ID
    pub async fn get_quote(&self, quote_id: &str) -> Result<QuoteDetail, StorageError> {
        let row = sqlx::query(&format!("{} WHERE q.id = ?", DETAIL_SELECT))
            .bind(quote_id)
            .fetch_one(&self.pool)
            .await?;

        row_to_quote_detail(&row)
    }

    /// Get a quote only if it belongs to the given vendor. Quotes owned by
    /// other vendors are indistinguishable from missing ones.
    pub async fn get_quote_for_vendor(
        &self,
        quote_id: &str,
        vendor_id: &str,
    ) -> Result<QuoteDetail, StorageError> {
        let row = sqlx::query(&format!(
            "{} WHERE q.id = ? AND q.vendor_id = ?",
            DETAIL_SELECT
        ))
        .bind(quote_id)
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await?;

        row_to_quote_detail(&row)
    }

    /// Create a quote. The vendor id comes from the authenticated caller,
    /// never from the request body.
    pub async fn create_quote(
        &self,
        vendor_id: &str,
        input: QuoteCreateInput,
    ) -> Result<QuoteDetail, StorageError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE rfp_id = ? AND vendor_id = ?")
            .bind(&input.rfp_id)
            .bind(vendor_id)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Err(StorageError::field(
                "rfp_id",
                "A quote for this RFP already exists for this vendor",
            ));
        }

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rfps WHERE id = ?")
            .bind(&input.rfp_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(StorageError::field("rfp_id", "RFP does not exist"));
        }

        let quote_id = procura_core::quote_id();

        debug!(
            "Creating quote: {} (rfp: {}, vendor: {})",
            quote_id, input.rfp_id, vendor_id
        );

        sqlx::query(
            r#"
            INSERT INTO quotes (id, rfp_id, vendor_id, price, quantity, description, total_cost, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quote_id)
        .bind(&input.rfp_id)
        .bind(vendor_id)
        .bind(input.price)
        .bind(input.quantity)
        .bind(&input.description)
        .bind(input.total_cost)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, QUOTE_UNIQUE_COLUMNS))?;

        self.get_quote(&quote_id).await
    }

    /// Update a quote's priced fields
    pub async fn update_quote(
        &self,
        quote_id: &str,
        input: QuoteUpdateInput,
    ) -> Result<QuoteDetail, StorageError> {
        debug!("Updating quote: {}", quote_id);

        // Build update query dynamically based on provided fields
        let mut query_parts = Vec::new();

        if input.price.is_some() {
            query_parts.push("price = ?");
        }
        if input.quantity.is_some() {
            query_parts.push("quantity = ?");
        }
        if input.description.is_some() {
            query_parts.push("description = ?");
        }
        if input.total_cost.is_some() {
            query_parts.push("total_cost = ?");
        }

        if query_parts.is_empty() {
            return self.get_quote(quote_id).await;
        }

        let query_str = format!("UPDATE quotes SET {} WHERE id = ?", query_parts.join(", "));
        let mut query = sqlx::query(&query_str);

        if let Some(price) = input.price {
            query = query.bind(price);
        }
        if let Some(quantity) = input.quantity {
            query = query.bind(quantity);
        }
        if let Some(description) = input.description {
            query = query.bind(description);
        }
        if let Some(total_cost) = input.total_cost {
            query = query.bind(total_cost);
        }

        query = query.bind(quote_id);

        let result = query.execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_quote(quote_id).await
    }

    /// Delete a quote
    pub async fn delete_quote(&self, quote_id: &str) -> Result<(), StorageError> {
        debug!("Deleting quote: {}", quote_id);

        let result = sqlx::query("DELETE FROM quotes WHERE id = ?")
            .bind(quote_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

/// Convert a joined database row to a QuoteDetail
fn row_to_quote_detail(row: &sqlx::sqlite::SqliteRow) -> Result<QuoteDetail, StorageError> {
    let first: String = row.try_get("first_name")?;
    let last: String = row.try_get("last_name")?;
    let username: String = row.try_get("username")?;
    let full = format!("{} {}", first, last).trim().to_string();

    Ok(QuoteDetail {
        id: row.try_get("id")?,
        rfp_id: row.try_get("rfp_id")?,
        vendor_id: row.try_get("vendor_id")?,
        vendor_name: if full.is_empty() { username } else { full },
        rfp_name: row.try_get("rfp_name")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
        description: row.try_get("description")?,
        total_cost: row.try_get("total_cost")?,
        created_at: row.try_get("created_at")?,
    })
}
