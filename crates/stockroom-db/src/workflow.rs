//! # Inventory Workflow
//!
//! The only code that changes `products.stock`. Ledger entries, sales and
//! returns are recorded together with their stock change, or not at all.
//!
//! ## One Transaction Per Request
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   record_sale(product 7, qty 3)                         │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE products SET stock = stock - 3                                 │
//! │   WHERE id = 7 AND stock >= 3            ← check and write are ONE     │
//! │    │                                        statement: no other writer  │
//! │    ├── 1 row  ──► INSERT INTO sales ...      can slip in between        │
//! │    │               COMMIT                                               │
//! │    │                                                                    │
//! │    └── 0 rows ──► SELECT stock WHERE id = 7  (same transaction)        │
//! │                    ├── no row  → Product not found                      │
//! │                    └── stock 2 → InsufficientStock { 2, 3 }             │
//! │                    ROLLBACK (transaction dropped)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock UPDATE is always the first statement of the transaction, so
//! SQLite takes the write lock up front and never has to upgrade a read
//! snapshot that another writer has already invalidated. Concurrent sales
//! against the same product serialize on that lock; each one re-evaluates
//! `stock >= qty` against the committed value.
//!
//! Rejections are terminal. Nothing here retries.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{InventoryRepository, SaleRepository};
use stockroom_core::stock::{apply_movement, check_return};
use stockroom_core::{
    InventoryTransactionDetail, NewInventoryTransaction, NewSale, NewSaleReturn, Principal,
    Sale, SaleDetail, SaleReturn, TransactionType, ValidationError,
};

/// Transactional writer for stock movements, sales and returns.
///
/// ## Usage
/// ```rust,ignore
/// let workflow = db.workflow();
///
/// workflow.record_transaction(restock, &principal).await?;   // IN 5
/// let sale = workflow.record_sale(new_sale, &principal).await?;
/// workflow.record_return(new_return, &principal).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryWorkflow {
    pool: SqlitePool,
}

impl InventoryWorkflow {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryWorkflow { pool }
    }

    /// Applies an IN / OUT / ADJUSTMENT movement and appends the ledger entry.
    ///
    /// ## Errors
    /// - Product missing or not visible → `NotFound`
    /// - OUT larger than stock → `InsufficientStock`, stock unchanged
    /// - IN/OUT quantity <= 0, ADJUSTMENT quantity < 0 → validation error
    pub async fn record_transaction(
        &self,
        input: NewInventoryTransaction,
        principal: &Principal,
    ) -> DbResult<InventoryTransactionDetail> {
        input.validate()?;
        let owner = principal.owner_scope();
        let kind = input.transaction_type;

        let mut tx = self.pool.begin().await?;

        let moved = move_stock(&mut *tx, input.product_id, kind, input.quantity, owner).await?;
        if !moved {
            let err = diagnose(&mut *tx, input.product_id, kind, input.quantity, owner).await;
            warn!(
                product_id = input.product_id,
                kind = %kind,
                quantity = input.quantity,
                error = %err,
                "Stock movement rejected"
            );
            return Err(err);
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO inventory_transactions
                (product_id, quantity, type, reference, notes, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(kind)
        .bind(&input.reference)
        .bind(&input.notes)
        .bind(principal.user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            id,
            product_id = input.product_id,
            kind = %kind,
            quantity = input.quantity,
            user_id = principal.user_id,
            "Stock movement recorded"
        );

        InventoryRepository::new(self.pool.clone())
            .get(id, None)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryTransaction", id))
    }

    /// Records a sale and takes its quantity out of stock.
    ///
    /// `total_amount` is computed here, once, from the request's unit price.
    ///
    /// ## Errors
    /// - Customer missing → `NotFound`
    /// - Product missing or not visible → `NotFound`
    /// - Quantity above stock → `InsufficientStock`, stock unchanged
    pub async fn record_sale(&self, input: NewSale, principal: &Principal) -> DbResult<SaleDetail> {
        input.validate()?;
        let total = input.total_amount()?;
        let owner = principal.owner_scope();

        let customer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)")
                .bind(input.customer_id)
                .fetch_one(&self.pool)
                .await?;
        if !customer_exists {
            return Err(DbError::not_found("Customer", input.customer_id));
        }

        let mut tx = self.pool.begin().await?;

        let moved = move_stock(
            &mut *tx,
            input.product_id,
            TransactionType::Out,
            input.quantity,
            owner,
        )
        .await?;
        if !moved {
            let err = diagnose(
                &mut *tx,
                input.product_id,
                TransactionType::Out,
                input.quantity,
                owner,
            )
            .await;
            warn!(
                product_id = input.product_id,
                quantity = input.quantity,
                error = %err,
                "Sale rejected"
            );
            return Err(err);
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (
                product_id, customer_id, quantity, unit_price_cents,
                total_amount_cents, notes, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.customer_id)
        .bind(input.quantity)
        .bind(input.unit_price_cents)
        .bind(total.cents())
        .bind(&input.notes)
        .bind(principal.user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            id,
            product_id = input.product_id,
            quantity = input.quantity,
            total = %total,
            user_id = principal.user_id,
            "Sale recorded"
        );

        SaleRepository::new(self.pool.clone())
            .get(id, None)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Records a return against a sale and puts its quantity back in stock.
    ///
    /// The quantity is compared with the originating sale only. Earlier
    /// returns on the same sale are not subtracted.
    ///
    /// ## Errors
    /// - Sale missing or not visible → `NotFound`
    /// - `product_id` differs from the sale's product → validation error
    /// - Quantity above the sale's quantity → `ReturnExceedsSale`
    pub async fn record_return(
        &self,
        input: NewSaleReturn,
        principal: &Principal,
    ) -> DbResult<SaleReturn> {
        input.validate()?;

        // Sales are immutable, so reading before the write transaction is safe.
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, customer_id, quantity, unit_price_cents,
                   total_amount_cents, notes, created_by, created_at
            FROM sales
            WHERE id = ?1 AND (?2 IS NULL OR created_by = ?2)
            "#,
        )
        .bind(input.sale_id)
        .bind(principal.owner_scope())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", input.sale_id))?;

        if sale.product_id != input.product_id {
            return Err(ValidationError::Mismatch {
                field: "product_id".to_string(),
                reason: format!("sale {} is for product {}", sale.id, sale.product_id),
            }
            .into());
        }

        if let Err(err) = check_return(sale.id, sale.quantity, input.quantity) {
            warn!(sale_id = sale.id, quantity = input.quantity, error = %err, "Return rejected");
            return Err(err.into());
        }

        let mut tx = self.pool.begin().await?;

        let moved = move_stock(
            &mut *tx,
            sale.product_id,
            TransactionType::In,
            input.quantity,
            None,
        )
        .await?;
        if !moved {
            return Err(diagnose(&mut *tx, sale.product_id, TransactionType::In, input.quantity, None).await);
        }

        let sale_return = sqlx::query_as::<_, SaleReturn>(
            r#"
            INSERT INTO returns (sale_id, product_id, quantity, reason, notes, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, sale_id, product_id, quantity, reason, notes, created_by, created_at
            "#,
        )
        .bind(sale.id)
        .bind(sale.product_id)
        .bind(input.quantity)
        .bind(&input.reason)
        .bind(&input.notes)
        .bind(principal.user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            id = sale_return.id,
            sale_id = sale.id,
            product_id = sale.product_id,
            quantity = input.quantity,
            user_id = principal.user_id,
            "Return recorded"
        );

        Ok(sale_return)
    }
}

// =============================================================================
// Stock Statements
// =============================================================================

/// Conditional stock write. `false` means no row matched.
///
/// ```text
/// IN          stock = stock + qty   WHERE stock <= i64::MAX - qty
/// OUT         stock = stock - qty   WHERE stock >= qty
/// ADJUSTMENT  stock = qty
/// ```
async fn move_stock(
    conn: &mut SqliteConnection,
    product_id: i64,
    kind: TransactionType,
    quantity: i64,
    owner: Option<i64>,
) -> DbResult<bool> {
    let (sql, guard) = match kind {
        TransactionType::In => (
            "UPDATE products SET stock = stock + ?2, updated_at = ?3 \
             WHERE id = ?1 AND (?4 IS NULL OR created_by = ?4) AND stock <= ?5",
            i64::MAX - quantity,
        ),
        TransactionType::Out => (
            "UPDATE products SET stock = stock - ?2, updated_at = ?3 \
             WHERE id = ?1 AND (?4 IS NULL OR created_by = ?4) AND stock >= ?5",
            quantity,
        ),
        TransactionType::Adjustment => (
            "UPDATE products SET stock = ?2, updated_at = ?3 \
             WHERE id = ?1 AND (?4 IS NULL OR created_by = ?4) AND ?5 >= 0",
            quantity,
        ),
    };

    let result = sqlx::query(sql)
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .bind(owner)
        .bind(guard)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Explains why [`move_stock`] matched nothing, reading inside the same
/// transaction so the answer reflects the state the UPDATE saw.
async fn diagnose(
    conn: &mut SqliteConnection,
    product_id: i64,
    kind: TransactionType,
    quantity: i64,
    owner: Option<i64>,
) -> DbError {
    let current = sqlx::query_scalar::<_, i64>(
        "SELECT stock FROM products WHERE id = ?1 AND (?2 IS NULL OR created_by = ?2)",
    )
    .bind(product_id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await;

    match current {
        Ok(None) => DbError::not_found("Product", product_id),
        Ok(Some(stock)) => match apply_movement(product_id, kind, stock, quantity) {
            Err(err) => err.into(),
            Ok(_) => DbError::Internal(format!(
                "stock update for product {product_id} matched no row"
            )),
        },
        Err(err) => err.into(),
    }
}
