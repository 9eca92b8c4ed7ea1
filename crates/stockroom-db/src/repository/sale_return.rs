//! # Return Repository
//!
//! Read side of returns. Rows are written only by
//! [`InventoryWorkflow::record_return`](crate::workflow::InventoryWorkflow::record_return).

use sqlx::SqlitePool;

use crate::error::DbResult;
use stockroom_core::{Page, ReturnFilter, SaleReturn};

const SELECT_RETURN: &str = r#"
    SELECT id, sale_id, product_id, quantity, reason, notes, created_by, created_at
    FROM returns
"#;

/// Return reads, scoped by the return's `created_by`.
#[derive(Debug, Clone)]
pub struct ReturnRepository {
    pool: SqlitePool,
}

impl ReturnRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReturnRepository { pool }
    }

    pub async fn get(&self, id: i64, owner: Option<i64>) -> DbResult<Option<SaleReturn>> {
        let row = sqlx::query_as::<_, SaleReturn>(&format!(
            "{SELECT_RETURN} WHERE id = ?1 AND (?2 IS NULL OR created_by = ?2)"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_multi(&self, page: Page, owner: Option<i64>) -> DbResult<Vec<SaleReturn>> {
        self.get_filtered(ReturnFilter::default(), page, owner).await
    }

    pub async fn get_by_sale(
        &self,
        sale_id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<SaleReturn>> {
        let filter = ReturnFilter {
            sale_id: Some(sale_id),
            product_id: None,
        };
        self.get_filtered(filter, page, owner).await
    }

    pub async fn get_by_product(
        &self,
        product_id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<SaleReturn>> {
        let filter = ReturnFilter {
            sale_id: None,
            product_id: Some(product_id),
        };
        self.get_filtered(filter, page, owner).await
    }

    /// Returns matching every supplied filter, oldest first.
    pub async fn get_filtered(
        &self,
        filter: ReturnFilter,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<SaleReturn>> {
        let page = page.clamped();
        let rows = sqlx::query_as::<_, SaleReturn>(&format!(
            r#"{SELECT_RETURN}
            WHERE (?1 IS NULL OR created_by = ?1)
              AND (?2 IS NULL OR sale_id = ?2)
              AND (?3 IS NULL OR product_id = ?3)
            ORDER BY id
            LIMIT ?4 OFFSET ?5"#
        ))
        .bind(owner)
        .bind(filter.sale_id)
        .bind(filter.product_id)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
