//! # Category Repository
//!
//! Shared reference data. Names are unique; the seed binary relies on
//! [`CategoryRepository::get_by_name`] to stay idempotent.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{Category, CategoryCreate, CategoryUpdate, Page};

const SELECT_CATEGORY: &str =
    "SELECT id, name, description, created_at, updated_at FROM categories";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn get_multi(&self, page: Page) -> DbResult<Vec<Category>> {
        let page = page.clamped();
        let categories = sqlx::query_as::<_, Category>(&format!(
            "{SELECT_CATEGORY} ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE name = ?1"))
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    /// Inserts a category. A taken name is a `UniqueViolation`.
    pub async fn create(&self, input: CategoryCreate) -> DbResult<Category> {
        input.validate()?;
        let name = input.name.trim().to_string();

        if self.get_by_name(&name).await?.is_some() {
            return Err(DbError::duplicate("name", name));
        }

        debug!(name = %name, "Creating category");

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&input.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update(&self, id: i64, patch: CategoryUpdate) -> DbResult<Category> {
        patch.validate()?;
        let mut category = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))?;

        if let Some(name) = &patch.name {
            let name = name.trim();
            if let Some(existing) = self.get_by_name(name).await? {
                if existing.id != id {
                    return Err(DbError::duplicate("name", name));
                }
            }
        }

        patch.apply(&mut category);
        category.updated_at = Some(Utc::now());

        debug!(id, "Updating category");

        let result = sqlx::query(
            "UPDATE categories SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(category)
    }

    /// Deletes and returns the category. Fails while products reference it.
    pub async fn remove(&self, id: i64) -> DbResult<Option<Category>> {
        let Some(category) = self.get(id).await? else {
            return Ok(None);
        };

        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(category))
    }
}
