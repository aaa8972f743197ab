// ABOUTME: Category storage layer using SQLite
// ABOUTME: CRUD for categories; deletes cascade to RFPs and null vendor references

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use procura_core::{Category, CategoryInput};

use crate::error::{map_unique_violation, StorageError, CATEGORY_UNIQUE_COLUMNS};

pub struct CategoryStorage {
    pool: SqlitePool,
}

impl CategoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name
    pub async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let categories = sqlx::query_as::<_, (String, String, chrono::DateTime<Utc>)>(
            "SELECT id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, name, created_at)| Category {
            id,
            name,
            created_at,
        })
        .collect();

        Ok(categories)
    }

    /// Get a single category by ID
    pub async fn get_category(&self, category_id: &str) -> Result<Category, StorageError> {
        let (id, name, created_at) = sqlx::query_as(
            "SELECT id, name, created_at FROM categories WHERE id = ?",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Category {
            id,
            name,
            created_at,
        })
    }

    pub async fn category_exists(&self, category_id: &str) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn name_exists(&self, name: &str, exclude: Option<&str>) -> Result<bool, StorageError> {
        let count: i64 = match exclude {
            Some(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name = ? AND id != ?")
                    .bind(name)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name = ?")
                .bind(name)
                .fetch_one(&self.pool)
                .await?,
        };
        Ok(count > 0)
    }

    /// Create a new category
    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, StorageError> {
        if self.name_exists(&input.name, None).await? {
            return Err(StorageError::field(
                "name",
                "Category with this name already exists",
            ));
        }

        let category_id = procura_core::category_id();

        debug!("Creating category: {} (name: {})", category_id, input.name);

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&category_id)
            .bind(&input.name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, CATEGORY_UNIQUE_COLUMNS))?;

        self.get_category(&category_id).await
    }

    /// Rename a category
    pub async fn update_category(
        &self,
        category_id: &str,
        input: CategoryInput,
    ) -> Result<Category, StorageError> {
        // 404 before validation so renames of missing categories don't
        // report a name conflict.
        let existing = self.get_category(category_id).await?;

        if self.name_exists(&input.name, Some(&existing.id)).await? {
            return Err(StorageError::field(
                "name",
                "Category with this name already exists",
            ));
        }

        debug!("Updating category: {}", category_id);

        sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(&input.name)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, CATEGORY_UNIQUE_COLUMNS))?;

        self.get_category(category_id).await
    }

    /// Delete a category. RFPs in the category are cascade-deleted by the
    /// schema; vendors keep their rows with the category reference nulled.
    pub async fn delete_category(&self, category_id: &str) -> Result<(), StorageError> {
        debug!("Deleting category: {}", category_id);

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
