//! # Sale Repository
//!
//! Read side of sales. Rows are written only by
//! [`InventoryWorkflow::record_sale`](crate::workflow::InventoryWorkflow::record_sale)
//! and never change afterwards.
//!
//! ## Filters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /sales?customer_id=3&start_date=2026-03-01&end_date=2026-03-31    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleFilter → DateRange [2026-03-01T00:00, 2026-04-01T00:00)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE (owner IS NULL OR created_by = owner)                           │
//! │    AND (customer IS NULL OR customer_id = customer)                    │
//! │    AND (start IS NULL OR created_at >= start)                          │
//! │    AND (end IS NULL OR created_at < end)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timestamps are stored as RFC 3339 text in UTC, so range comparisons on
//! the text agree with time order.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use stockroom_core::{
    Customer, DateRange, Page, Product, Sale, SaleDetail, SaleFilter, SalesSummary,
};

/// Sale joined with its product and customer.
#[derive(Debug, sqlx::FromRow)]
struct SaleDetailRow {
    #[sqlx(flatten)]
    sale: Sale,

    prod_name: String,
    prod_description: Option<String>,
    prod_sku: Option<String>,
    prod_barcode: Option<String>,
    prod_price_cents: i64,
    prod_cost_cents: i64,
    prod_stock: i64,
    prod_min_quantity: i64,
    prod_category_id: Option<i64>,
    prod_supplier_id: Option<i64>,
    prod_created_by: i64,
    prod_created_at: DateTime<Utc>,
    prod_updated_at: Option<DateTime<Utc>>,

    cust_full_name: String,
    cust_email: Option<String>,
    cust_phone: Option<String>,
    cust_address: Option<String>,
    cust_created_at: DateTime<Utc>,
    cust_updated_at: Option<DateTime<Utc>>,
}

impl From<SaleDetailRow> for SaleDetail {
    fn from(row: SaleDetailRow) -> Self {
        let product = Product {
            id: row.sale.product_id,
            name: row.prod_name,
            description: row.prod_description,
            sku: row.prod_sku,
            barcode: row.prod_barcode,
            price_cents: row.prod_price_cents,
            cost_cents: row.prod_cost_cents,
            stock: row.prod_stock,
            min_quantity: row.prod_min_quantity,
            category_id: row.prod_category_id,
            supplier_id: row.prod_supplier_id,
            created_by: row.prod_created_by,
            created_at: row.prod_created_at,
            updated_at: row.prod_updated_at,
        };
        let customer = Customer {
            id: row.sale.customer_id,
            full_name: row.cust_full_name,
            email: row.cust_email,
            phone: row.cust_phone,
            address: row.cust_address,
            created_at: row.cust_created_at,
            updated_at: row.cust_updated_at,
        };
        SaleDetail {
            sale: row.sale,
            product,
            customer,
        }
    }
}

const SELECT_SALE_DETAIL: &str = r#"
    SELECT
        s.id AS id, s.product_id AS product_id, s.customer_id AS customer_id,
        s.quantity AS quantity, s.unit_price_cents AS unit_price_cents,
        s.total_amount_cents AS total_amount_cents, s.notes AS notes,
        s.created_by AS created_by, s.created_at AS created_at,
        p.name AS prod_name, p.description AS prod_description,
        p.sku AS prod_sku, p.barcode AS prod_barcode,
        p.price_cents AS prod_price_cents, p.cost_cents AS prod_cost_cents,
        p.stock AS prod_stock, p.min_quantity AS prod_min_quantity,
        p.category_id AS prod_category_id, p.supplier_id AS prod_supplier_id,
        p.created_by AS prod_created_by, p.created_at AS prod_created_at,
        p.updated_at AS prod_updated_at,
        c.full_name AS cust_full_name, c.email AS cust_email, c.phone AS cust_phone,
        c.address AS cust_address, c.created_at AS cust_created_at,
        c.updated_at AS cust_updated_at
    FROM sales s
    JOIN products p ON p.id = s.product_id
    JOIN customers c ON c.id = s.customer_id
"#;

/// Sales reads, scoped by the sale's `created_by`.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    pub async fn get(&self, id: i64, owner: Option<i64>) -> DbResult<Option<SaleDetail>> {
        let row = sqlx::query_as::<_, SaleDetailRow>(&format!(
            "{SELECT_SALE_DETAIL} WHERE s.id = ?1 AND (?2 IS NULL OR s.created_by = ?2)"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn get_multi(&self, page: Page, owner: Option<i64>) -> DbResult<Vec<SaleDetail>> {
        self.get_filtered(SaleFilter::default(), page, owner).await
    }

    /// Sales matching every supplied filter, oldest first.
    pub async fn get_filtered(
        &self,
        filter: SaleFilter,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<SaleDetail>> {
        let range = filter.date_range()?;
        let page = page.clamped();
        self.fetch(owner, filter.customer_id, range, page.limit, page.skip)
            .await
    }

    pub async fn get_by_customer(
        &self,
        customer_id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<SaleDetail>> {
        let page = page.clamped();
        self.fetch(
            owner,
            Some(customer_id),
            DateRange::from_dates(None, None)?,
            page.limit,
            page.skip,
        )
        .await
    }

    /// Every sale in `range`. Not paginated.
    pub async fn get_by_date_range(
        &self,
        range: DateRange,
        owner: Option<i64>,
    ) -> DbResult<Vec<SaleDetail>> {
        self.fetch(owner, None, range, -1, 0).await
    }

    /// Every sale on one calendar day (UTC).
    pub async fn get_daily(&self, date: NaiveDate, owner: Option<i64>) -> DbResult<Vec<SaleDetail>> {
        self.get_by_date_range(DateRange::day(date)?, owner).await
    }

    /// Count and revenue over `range`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let march = DateRange::from_dates(Some(first), Some(last))?;
    /// let summary = db.sales().summary(march, None).await?;
    /// println!("{} sales, {}", summary.total_sales, summary.total_revenue());
    /// ```
    pub async fn summary(&self, range: DateRange, owner: Option<i64>) -> DbResult<SalesSummary> {
        let summary = sqlx::query_as::<_, SalesSummary>(
            r#"
            SELECT COUNT(*) AS total_sales,
                   COALESCE(SUM(total_amount_cents), 0) AS total_revenue_cents
            FROM sales
            WHERE (?1 IS NULL OR created_by = ?1)
              AND (?2 IS NULL OR created_at >= ?2)
              AND (?3 IS NULL OR created_at < ?3)
            "#,
        )
        .bind(owner)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// `limit = -1` means no limit (SQLite semantics).
    async fn fetch(
        &self,
        owner: Option<i64>,
        customer_id: Option<i64>,
        range: DateRange,
        limit: i64,
        skip: i64,
    ) -> DbResult<Vec<SaleDetail>> {
        let rows = sqlx::query_as::<_, SaleDetailRow>(&format!(
            r#"{SELECT_SALE_DETAIL}
            WHERE (?1 IS NULL OR s.created_by = ?1)
              AND (?2 IS NULL OR s.customer_id = ?2)
              AND (?3 IS NULL OR s.created_at >= ?3)
              AND (?4 IS NULL OR s.created_at < ?4)
            ORDER BY s.id
            LIMIT ?5 OFFSET ?6"#
        ))
        .bind(owner)
        .bind(customer_id)
        .bind(range.start)
        .bind(range.end)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
