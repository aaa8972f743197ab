// ABOUTME: Vendor storage layer using SQLite
// ABOUTME: Admin CRUD, uniqueness checks, and the public approved-vendor directory

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use procura_core::{
    Vendor, VendorCreateInput, VendorDetail, VendorDirectoryEntry, VendorStatus, VendorUpdateInput,
};

use crate::error::{map_unique_violation, StorageError, VENDOR_UNIQUE_COLUMNS};

pub struct VendorStorage {
    pool: SqlitePool,
}

impl VendorStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all vendors with owner identity, newest first.
    pub async fn list_vendors(&self) -> Result<Vec<VendorDetail>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT v.*, u.first_name, u.last_name, u.email
            FROM vendors v
            JOIN users u ON u.id = v.user_id
            ORDER BY v.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_vendor_detail).collect()
    }

    /// Get a single vendor by ID (bare row, no user join)
    pub async fn get_vendor(&self, vendor_id: &str) -> Result<Vendor, StorageError> {
        let row = sqlx::query("SELECT * FROM vendors WHERE id = ?")
            .bind(vendor_id)
            .fetch_one(&self.pool)
            .await?;

        row_to_vendor(&row)
    }

    /// Get a vendor with owner identity fields
    pub async fn get_vendor_detail(&self, vendor_id: &str) -> Result<VendorDetail, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT v.*, u.first_name, u.last_name, u.email
            FROM vendors v
            JOIN users u ON u.id = v.user_id
            WHERE v.id = ?
            "#,
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await?;

        row_to_vendor_detail(&row)
    }

    /// Get the vendor profile linked to a user, if any
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Option<Vendor>, StorageError> {
        let row = sqlx::query("SELECT * FROM vendors WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(row_to_vendor(&r)?)),
            None => Ok(None),
        }
    }

    /// Public directory lookup: APPROVED vendors in a category, projected to
    /// id + display name only.
    pub async fn directory_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<VendorDirectoryEntry>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, u.first_name, u.last_name, u.username
            FROM vendors v
            JOIN users u ON u.id = v.user_id
            WHERE v.category_id = ? AND v.status = 'APPROVED'
            ORDER BY v.created_at
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let first: String = row.try_get("first_name")?;
                let last: String = row.try_get("last_name")?;
                let username: String = row.try_get("username")?;
                let full = format!("{} {}", first, last).trim().to_string();
                Ok(VendorDirectoryEntry {
                    id: row.try_get("id")?,
                    vendor_name: if full.is_empty() { username } else { full },
                })
            })
            .collect()
    }

    pub async fn gst_exists(&self, gst: &str, exclude: Option<&str>) -> Result<bool, StorageError> {
        self.unique_field_exists("gst_number", gst, exclude).await
    }

    pub async fn pan_exists(&self, pan: &str, exclude: Option<&str>) -> Result<bool, StorageError> {
        self.unique_field_exists("pan_number", pan, exclude).await
    }

    pub async fn mobile_exists(
        &self,
        mobile: &str,
        exclude: Option<&str>,
    ) -> Result<bool, StorageError> {
        self.unique_field_exists("mobile_number", mobile, exclude)
            .await
    }

    async fn unique_field_exists(
        &self,
        column: &str,
        value: &str,
        exclude: Option<&str>,
    ) -> Result<bool, StorageError> {
        // column is one of the fixed names above, never caller input
        let count: i64 = match exclude {
            Some(id) => sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM vendors WHERE {} = ? AND id != ?",
                column
            ))
            .bind(value)
            .bind(id)
            .fetch_one(&self.pool)
            .await?,
            None => sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM vendors WHERE {} = ?",
                column
            ))
            .bind(value)
            .fetch_one(&self.pool)
            .await?,
        };
        Ok(count > 0)
    }

    /// Create a vendor profile for an existing user (admin path). The public
    /// registration path goes through `DbState::register_vendor` instead so
    /// the user row and vendor row commit together.
    pub async fn create_vendor(&self, input: VendorCreateInput) -> Result<VendorDetail, StorageError> {
        let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(&input.user_id)
            .fetch_one(&self.pool)
            .await?;
        if user_count == 0 {
            return Err(StorageError::field("user_id", "User does not exist"));
        }
        if self.get_by_user_id(&input.user_id).await?.is_some() {
            return Err(StorageError::field(
                "user_id",
                "User already has a vendor profile",
            ));
        }
        if self.gst_exists(&input.gst_number, None).await? {
            return Err(StorageError::field("gst_number", "GST number already exists"));
        }
        if self.pan_exists(&input.pan_number, None).await? {
            return Err(StorageError::field(
                "pan_number",
                "PAN Card number already registered",
            ));
        }
        if self.mobile_exists(&input.mobile_number, None).await? {
            return Err(StorageError::field(
                "mobile_number",
                "Mobile number already registered",
            ));
        }
        if let Some(category_id) = &input.category_id {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
            if count == 0 {
                return Err(StorageError::field("category_id", "Category does not exist"));
            }
        }

        let vendor_id = procura_core::vendor_id();
        let now = Utc::now();

        debug!("Creating vendor: {} (user: {})", vendor_id, input.user_id);

        sqlx::query(
            r#"
            INSERT INTO vendors (id, user_id, revenue, employee_count, gst_number, gst_image,
                                 pan_number, pan_image, mobile_number, category_id, status,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'PENDING', ?, ?)
            "#,
        )
        .bind(&vendor_id)
        .bind(&input.user_id)
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
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, VENDOR_UNIQUE_COLUMNS))?;

        self.get_vendor_detail(&vendor_id).await
    }

    /// Update a vendor profile. Status changes (the approval workflow) come
    /// through here; changed unique fields are re-validated.
    pub async fn update_vendor(
        &self,
        vendor_id: &str,
        input: VendorUpdateInput,
    ) -> Result<VendorDetail, StorageError> {
        let existing = self.get_vendor(vendor_id).await?;

        if let Some(gst) = &input.gst_number {
            if gst != &existing.gst_number && self.gst_exists(gst, Some(vendor_id)).await? {
                return Err(StorageError::field("gst_number", "GST number already exists"));
            }
        }
        if let Some(pan) = &input.pan_number {
            if pan != &existing.pan_number && self.pan_exists(pan, Some(vendor_id)).await? {
                return Err(StorageError::field(
                    "pan_number",
                    "PAN Card number already registered",
                ));
            }
        }
        if let Some(mobile) = &input.mobile_number {
            if mobile != &existing.mobile_number
                && self.mobile_exists(mobile, Some(vendor_id)).await?
            {
                return Err(StorageError::field(
                    "mobile_number",
                    "Mobile number already registered",
                ));
            }
        }
        if let Some(Some(category_id)) = &input.category_id {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
            if count == 0 {
                return Err(StorageError::field("category_id", "Category does not exist"));
            }
        }

        debug!("Updating vendor: {}", vendor_id);

        // Build update query dynamically based on provided fields
        let mut query_parts = Vec::new();

        if input.revenue.is_some() {
            query_parts.push("revenue = ?");
        }
        if input.employee_count.is_some() {
            query_parts.push("employee_count = ?");
        }
        if input.gst_number.is_some() {
            query_parts.push("gst_number = ?");
        }
        if input.gst_image.is_some() {
            query_parts.push("gst_image = ?");
        }
        if input.pan_number.is_some() {
            query_parts.push("pan_number = ?");
        }
        if input.pan_image.is_some() {
            query_parts.push("pan_image = ?");
        }
        if input.mobile_number.is_some() {
            query_parts.push("mobile_number = ?");
        }
        if input.category_id.is_some() {
            query_parts.push("category_id = ?");
        }
        if input.status.is_some() {
            query_parts.push("status = ?");
        }

        if query_parts.is_empty() {
            return self.get_vendor_detail(vendor_id).await;
        }

        query_parts.push("updated_at = ?");

        let query_str = format!("UPDATE vendors SET {} WHERE id = ?", query_parts.join(", "));
        let mut query = sqlx::query(&query_str);

        // Bind parameters in the same order
        if let Some(revenue) = input.revenue {
            query = query.bind(revenue);
        }
        if let Some(employee_count) = input.employee_count {
            query = query.bind(employee_count);
        }
        if let Some(gst_number) = input.gst_number {
            query = query.bind(gst_number);
        }
        if let Some(gst_image) = input.gst_image {
            query = query.bind(gst_image);
        }
        if let Some(pan_number) = input.pan_number {
            query = query.bind(pan_number);
        }
        if let Some(pan_image) = input.pan_image {
            query = query.bind(pan_image);
        }
        if let Some(mobile_number) = input.mobile_number {
            query = query.bind(mobile_number);
        }
        if let Some(category_id) = input.category_id {
            query = query.bind(category_id);
        }
        if let Some(status) = input.status {
            query = query.bind(status.as_str());
        }

        query = query.bind(Utc::now()).bind(vendor_id);

        query
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, VENDOR_UNIQUE_COLUMNS))?;

        self.get_vendor_detail(vendor_id).await
    }

    /// Delete a vendor. Quotes cascade; RFP assignments are nulled by the
    /// schema.
    pub async fn delete_vendor(&self, vendor_id: &str) -> Result<(), StorageError> {
        debug!("Deleting vendor: {}", vendor_id);

        let result = sqlx::query("DELETE FROM vendors WHERE id = ?")
            .bind(vendor_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn parse_status(value: &str) -> Result<VendorStatus, StorageError> {
    VendorStatus::parse(value)
        .ok_or_else(|| StorageError::Database(format!("invalid vendor status: {}", value)))
}

/// Convert a database row to a Vendor
pub(crate) fn row_to_vendor(row: &sqlx::sqlite::SqliteRow) -> Result<Vendor, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(Vendor {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        revenue: row.try_get("revenue")?,
        employee_count: row.try_get("employee_count")?,
        gst_number: row.try_get("gst_number")?,
        gst_image: row.try_get("gst_image")?,
        pan_number: row.try_get("pan_number")?,
        pan_image: row.try_get("pan_image")?,
        mobile_number: row.try_get("mobile_number")?,
        category_id: row.try_get("category_id")?,
        status: parse_status(&status)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_vendor_detail(row: &sqlx::sqlite::SqliteRow) -> Result<VendorDetail, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(VendorDetail {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        revenue: row.try_get("revenue")?,
        employee_count: row.try_get("employee_count")?,
        gst_number: row.try_get("gst_number")?,
        gst_image: row.try_get("gst_image")?,
        pan_number: row.try_get("pan_number")?,
        pan_image: row.try_get("pan_image")?,
        mobile_number: row.try_get("mobile_number")?,
        category_id: row.try_get("category_id")?,
        status: parse_status(&status)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
