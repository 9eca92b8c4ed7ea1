//! # Inventory Ledger Repository
//!
//! Read side of the append-only stock ledger. Entries are written only by
//! [`InventoryWorkflow::record_transaction`](crate::workflow::InventoryWorkflow::record_transaction)
//! and are never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::product::{ProductDetailRow, PRODUCT_DETAIL_COLUMNS, PRODUCT_DETAIL_JOINS};
use crate::error::DbResult;
use stockroom_core::{InventoryTransaction, InventoryTransactionDetail, Page, ProductDetail, TransactionType};

/// Ledger entry joined with its product, category and supplier.
#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    entry_id: i64,
    entry_quantity: i64,
    entry_type: TransactionType,
    entry_reference: Option<String>,
    entry_notes: Option<String>,
    entry_created_by: i64,
    entry_created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    product: ProductDetailRow,
}

impl From<LedgerRow> for InventoryTransactionDetail {
    fn from(row: LedgerRow) -> Self {
        let product = ProductDetail::from(row.product);
        InventoryTransactionDetail {
            transaction: InventoryTransaction {
                id: row.entry_id,
                product_id: product.product.id,
                quantity: row.entry_quantity,
                transaction_type: row.entry_type,
                reference: row.entry_reference,
                notes: row.entry_notes,
                created_by: row.entry_created_by,
                created_at: row.entry_created_at,
            },
            product,
        }
    }
}

fn select_ledger(clause: &str) -> String {
    format!(
        r#"
        SELECT
            t.id AS entry_id, t.quantity AS entry_quantity, t.type AS entry_type,
            t.reference AS entry_reference, t.notes AS entry_notes,
            t.created_by AS entry_created_by, t.created_at AS entry_created_at,
            {PRODUCT_DETAIL_COLUMNS}
        FROM inventory_transactions t
        JOIN products p ON p.id = t.product_id
        {PRODUCT_DETAIL_JOINS}
        {clause}
        "#
    )
}

/// Ledger reads, scoped by the entry's `created_by`.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    pub async fn get(
        &self,
        id: i64,
        owner: Option<i64>,
    ) -> DbResult<Option<InventoryTransactionDetail>> {
        let row = sqlx::query_as::<_, LedgerRow>(&select_ledger(
            "WHERE t.id = ?1 AND (?2 IS NULL OR t.created_by = ?2)",
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn get_multi(
        &self,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<InventoryTransactionDetail>> {
        let page = page.clamped();
        let rows = sqlx::query_as::<_, LedgerRow>(&select_ledger(
            "WHERE (?1 IS NULL OR t.created_by = ?1) ORDER BY t.id LIMIT ?2 OFFSET ?3",
        ))
        .bind(owner)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// History of one product, oldest first.
    pub async fn get_by_product(
        &self,
        product_id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<InventoryTransactionDetail>> {
        let page = page.clamped();
        let rows = sqlx::query_as::<_, LedgerRow>(&select_ledger(
            "WHERE t.product_id = ?1 AND (?2 IS NULL OR t.created_by = ?2) \
             ORDER BY t.id LIMIT ?3 OFFSET ?4",
        ))
        .bind(product_id)
        .bind(owner)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
