//! # Product Repository
//!
//! Product CRUD and lookups. Every read returns a [`ProductDetail`] with
//! category and supplier resolved in the same query.
//!
//! ## Eager Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  One Query Per Read                                     │
//! │                                                                         │
//! │  products p                                                            │
//! │    LEFT JOIN categories c ON c.id = p.category_id   → cat_* columns    │
//! │    LEFT JOIN suppliers  s ON s.id = p.supplier_id   → sup_* columns    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductDetailRow (flat)  ──into()──►  ProductDetail {                  │
//! │                                          product,                       │
//! │                                          category: Option<Category>,    │
//! │                                          supplier: Option<Supplier>,    │
//! │                                        }                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Uniqueness
//! SKU is unique when present; barcode is unique among non-empty values.
//! Both are checked across ALL owners before a write, and the store's own
//! UNIQUE indexes back the checks up when two writers race.
//!
//! Stock is never written here. It only moves through
//! [`InventoryWorkflow`](crate::workflow::InventoryWorkflow).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{
    Category, Page, Product, ProductCreate, ProductDetail, ProductUpdate, Supplier,
};

// =============================================================================
// Row Mapping
// =============================================================================

pub(crate) const PRODUCT_DETAIL_COLUMNS: &str = r#"
        p.id AS id, p.name AS name, p.description AS description,
        p.sku AS sku, p.barcode AS barcode,
        p.price_cents AS price_cents, p.cost_cents AS cost_cents,
        p.stock AS stock, p.min_quantity AS min_quantity,
        p.category_id AS category_id, p.supplier_id AS supplier_id,
        p.created_by AS created_by, p.created_at AS created_at, p.updated_at AS updated_at,
        c.id AS cat_id, c.name AS cat_name, c.description AS cat_description,
        c.created_at AS cat_created_at, c.updated_at AS cat_updated_at,
        s.id AS sup_id, s.name AS sup_name, s.contact_name AS sup_contact_name,
        s.email AS sup_email, s.phone AS sup_phone, s.address AS sup_address,
        s.created_at AS sup_created_at, s.updated_at AS sup_updated_at
"#;

/// Joins for [`PRODUCT_DETAIL_COLUMNS`]; expects products aliased as `p`.
pub(crate) const PRODUCT_DETAIL_JOINS: &str = r#"
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

fn select_detail(clause: &str) -> String {
    format!("SELECT {PRODUCT_DETAIL_COLUMNS} FROM products p {PRODUCT_DETAIL_JOINS} {clause}")
}

/// Flat row of [`PRODUCT_DETAIL_COLUMNS`].
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductDetailRow {
    #[sqlx(flatten)]
    product: Product,

    cat_id: Option<i64>,
    cat_name: Option<String>,
    cat_description: Option<String>,
    cat_created_at: Option<DateTime<Utc>>,
    cat_updated_at: Option<DateTime<Utc>>,

    sup_id: Option<i64>,
    sup_name: Option<String>,
    sup_contact_name: Option<String>,
    sup_email: Option<String>,
    sup_phone: Option<String>,
    sup_address: Option<String>,
    sup_created_at: Option<DateTime<Utc>>,
    sup_updated_at: Option<DateTime<Utc>>,
}

impl From<ProductDetailRow> for ProductDetail {
    fn from(row: ProductDetailRow) -> Self {
        let category = match (row.cat_id, row.cat_name, row.cat_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Category {
                id,
                name,
                description: row.cat_description,
                created_at,
                updated_at: row.cat_updated_at,
            }),
            _ => None,
        };

        let supplier = match (row.sup_id, row.sup_name, row.sup_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Supplier {
                id,
                name,
                contact_name: row.sup_contact_name,
                email: row.sup_email,
                phone: row.sup_phone,
                address: row.sup_address,
                created_at,
                updated_at: row.sup_updated_at,
            }),
            _ => None,
        };

        ProductDetail {
            product: row.product,
            category,
            supplier,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// Methods that read take `owner`: `Some(user_id)` limits results to
/// products that user created, `None` reads everything.
///
/// ## Usage
/// ```rust,ignore
/// let scope = principal.owner_scope();
/// let keyboard = db.products().get_by_sku("KB-001", scope).await?;
/// let reorder = db.products().get_low_stock(scope).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    pub async fn get(&self, id: i64, owner: Option<i64>) -> DbResult<Option<ProductDetail>> {
        let row = sqlx::query_as::<_, ProductDetailRow>(&select_detail(
            "WHERE p.id = ?1 AND (?2 IS NULL OR p.created_by = ?2)",
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn get_multi(&self, page: Page, owner: Option<i64>) -> DbResult<Vec<ProductDetail>> {
        let page = page.clamped();
        let rows = sqlx::query_as::<_, ProductDetailRow>(&select_detail(
            "WHERE (?1 IS NULL OR p.created_by = ?1) ORDER BY p.id LIMIT ?2 OFFSET ?3",
        ))
        .bind(owner)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Exact SKU match.
    pub async fn get_by_sku(&self, sku: &str, owner: Option<i64>) -> DbResult<Option<ProductDetail>> {
        self.get_by_code("sku", sku, owner).await
    }

    /// Exact barcode match. Blank input never matches.
    pub async fn get_by_barcode(
        &self,
        barcode: &str,
        owner: Option<i64>,
    ) -> DbResult<Option<ProductDetail>> {
        self.get_by_code("barcode", barcode, owner).await
    }

    async fn get_by_code(
        &self,
        column: &'static str,
        code: &str,
        owner: Option<i64>,
    ) -> DbResult<Option<ProductDetail>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, ProductDetailRow>(&select_detail(&format!(
            "WHERE p.{column} = ?1 AND (?2 IS NULL OR p.created_by = ?2)"
        )))
        .bind(code)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn get_by_category(
        &self,
        category_id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<ProductDetail>> {
        self.get_by_reference("category_id", category_id, page, owner)
            .await
    }

    pub async fn get_by_supplier(
        &self,
        supplier_id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<ProductDetail>> {
        self.get_by_reference("supplier_id", supplier_id, page, owner)
            .await
    }

    async fn get_by_reference(
        &self,
        column: &'static str,
        id: i64,
        page: Page,
        owner: Option<i64>,
    ) -> DbResult<Vec<ProductDetail>> {
        let page = page.clamped();
        let rows = sqlx::query_as::<_, ProductDetailRow>(&select_detail(&format!(
            "WHERE p.{column} = ?1 AND (?2 IS NULL OR p.created_by = ?2) \
             ORDER BY p.id LIMIT ?3 OFFSET ?4"
        )))
        .bind(id)
        .bind(owner)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every product with `stock <= min_quantity`. Not paginated.
    ///
    /// ## User Workflow
    /// ```text
    /// GET /products/low-stock
    ///      │
    ///      ▼
    /// get_low_stock(scope) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// [ Keyboard (stock 2, min 5), Cable (stock 0, min 0), ... ]
    /// ```
    pub async fn get_low_stock(&self, owner: Option<i64>) -> DbResult<Vec<ProductDetail>> {
        let rows = sqlx::query_as::<_, ProductDetailRow>(&select_detail(
            "WHERE p.stock <= p.min_quantity AND (?1 IS NULL OR p.created_by = ?1) ORDER BY p.id",
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Inserts a product owned by `created_by`.
    ///
    /// ## Checks (before the INSERT)
    /// 1. Field validation (positive price/cost, non-negative stock/min)
    /// 2. SKU and barcode not already taken by anyone
    /// 3. Referenced category/supplier exist
    pub async fn create(&self, input: ProductCreate, created_by: i64) -> DbResult<ProductDetail> {
        let input = input.normalized();
        input.validate()?;

        self.ensure_codes_free(input.sku.as_deref(), input.barcode.as_deref(), None)
            .await?;
        self.ensure_references(input.category_id, input.supplier_id)
            .await?;

        debug!(name = %input.name, sku = ?input.sku, created_by, "Creating product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (
                name, description, sku, barcode,
                price_cents, cost_cents, stock, min_quantity,
                category_id, supplier_id, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.sku)
        .bind(&input.barcode)
        .bind(input.price_cents)
        .bind(input.cost_cents)
        .bind(input.stock)
        .bind(input.min_quantity)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        self.get(id, None)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Applies `patch` to a visible product and writes it back in one UPDATE.
    pub async fn update(
        &self,
        id: i64,
        patch: ProductUpdate,
        owner: Option<i64>,
    ) -> DbResult<ProductDetail> {
        patch.validate()?;
        let mut product = self
            .get(id, owner)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?
            .product;

        patch.apply(&mut product);

        self.ensure_codes_free(product.sku.as_deref(), product.barcode.as_deref(), Some(id))
            .await?;
        self.ensure_references(product.category_id, product.supplier_id)
            .await?;

        debug!(id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, description = ?3, sku = ?4, barcode = ?5,
                price_cents = ?6, cost_cents = ?7, min_quantity = ?8,
                category_id = ?9, supplier_id = ?10, updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(&product.barcode)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.min_quantity)
        .bind(product.category_id)
        .bind(product.supplier_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id, None)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a visible product and returns its last snapshot.
    ///
    /// Products with ledger entries, sales or returns cannot be deleted
    /// (`ForeignKeyViolation`).
    pub async fn remove(&self, id: i64, owner: Option<i64>) -> DbResult<Option<ProductDetail>> {
        let Some(product) = self.get(id, owner).await? else {
            return Ok(None);
        };

        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok((result.rows_affected() > 0).then_some(product))
    }

    // =========================================================================
    // Checks
    // =========================================================================

    async fn ensure_codes_free(
        &self,
        sku: Option<&str>,
        barcode: Option<&str>,
        except_id: Option<i64>,
    ) -> DbResult<()> {
        if let Some(sku) = sku {
            if let Some(existing) = self.get_by_sku(sku, None).await? {
                if Some(existing.product.id) != except_id {
                    return Err(DbError::duplicate("sku", sku));
                }
            }
        }

        if let Some(barcode) = barcode {
            if let Some(existing) = self.get_by_barcode(barcode, None).await? {
                if Some(existing.product.id) != except_id {
                    return Err(DbError::duplicate("barcode", barcode));
                }
            }
        }

        Ok(())
    }

    async fn ensure_references(
        &self,
        category_id: Option<i64>,
        supplier_id: Option<i64>,
    ) -> DbResult<()> {
        if let Some(id) = category_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                return Err(DbError::not_found("Category", id));
            }
        }

        if let Some(id) = supplier_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = ?1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                return Err(DbError::not_found("Supplier", id));
            }
        }

        Ok(())
    }
}
