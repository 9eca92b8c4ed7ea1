//! # Supplier Repository
//!
//! Shared reference data. Names are not unique in the schema; the seed
//! binary looks suppliers up by name before inserting.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{Page, Supplier, SupplierCreate, SupplierUpdate};

const SELECT_SUPPLIER: &str = r#"
    SELECT id, name, contact_name, email, phone, address, created_at, updated_at
    FROM suppliers
"#;

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!("{SELECT_SUPPLIER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    pub async fn get_multi(&self, page: Page) -> DbResult<Vec<Supplier>> {
        let page = page.clamped();
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "{SELECT_SUPPLIER} ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// First supplier with this exact name, by id.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "{SELECT_SUPPLIER} WHERE name = ?1 ORDER BY id LIMIT 1"
        ))
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn create(&self, input: SupplierCreate) -> DbResult<Supplier> {
        input.validate()?;

        debug!(name = %input.name, "Creating supplier");

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact_name, email, phone, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, name, contact_name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn update(&self, id: i64, patch: SupplierUpdate) -> DbResult<Supplier> {
        patch.validate()?;
        let mut supplier = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))?;

        patch.apply(&mut supplier);
        supplier.updated_at = Some(Utc::now());

        debug!(id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = ?2, contact_name = ?3, email = ?4, phone = ?5, address = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(supplier)
    }

    /// Deletes and returns the supplier. Fails while products reference it.
    pub async fn remove(&self, id: i64) -> DbResult<Option<Supplier>> {
        let Some(supplier) = self.get(id).await? else {
            return Ok(None);
        };

        debug!(id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok((result.rows_affected() > 0).then_some(supplier))
    }
}
