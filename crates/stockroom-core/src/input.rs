//! # Inputs
//!
//! Create payloads, partial-update patches, list paging and filters.
//!
//! ## Patch Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PUT /products/7  { "price_cents": 1299 }                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ProductUpdate { price_cents: Some(1299), everything else: None }       │
//! │        │                                                                │
//! │        ▼  validate()      only the supplied fields are checked          │
//! │        ▼  apply(&mut p)   only the supplied fields are written          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  one UPDATE with the merged record                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A field that is absent (or `null`) in a patch keeps its stored value.
//! SKU and barcode are the exception: sending `""` clears them.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::stock::sale_total;
use crate::types::{Category, Customer, Product, Supplier, TransactionType, User};
use crate::validation::{
    normalize_optional, validate_barcode, validate_email, validate_name, validate_non_negative,
    validate_password, validate_positive, validate_price_cents, validate_quantity, validate_sku,
    ValidationResult,
};
use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

// =============================================================================
// Paging
// =============================================================================

/// `?skip=&limit=` window over an id-ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> Self {
        Page { skip, limit }.clamped()
    }

    /// Negative skip becomes 0; limit is held to `0..=MAX_PAGE_LIMIT`.
    pub fn clamped(self) -> Self {
        Page {
            skip: self.skip.max(0),
            limit: self.limit.clamp(0, MAX_PAGE_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

// =============================================================================
// Date Ranges
// =============================================================================

/// Half-open `[start, end)` window over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whole calendar days, both ends inclusive.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use stockroom_core::DateRange;
    ///
    /// let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// let range = DateRange::from_dates(Some(d), Some(d)).unwrap();
    /// assert_eq!(range.end.unwrap().to_rfc3339(), "2026-03-02T00:00:00+00:00");
    /// ```
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ValidationResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(ValidationError::Mismatch {
                    field: "end_date".to_string(),
                    reason: "must not be before start_date".to_string(),
                });
            }
        }

        let end = match end {
            Some(e) => Some(next_midnight(e)?),
            None => None,
        };

        Ok(DateRange {
            start: start.map(midnight),
            end,
        })
    }

    /// The single calendar day `date`.
    pub fn day(date: NaiveDate) -> ValidationResult<Self> {
        DateRange::from_dates(Some(date), Some(date))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at < e)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn next_midnight(date: NaiveDate) -> ValidationResult<DateTime<Utc>> {
    date.checked_add_days(Days::new(1))
        .map(midnight)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "end_date".to_string(),
            reason: "out of range".to_string(),
        })
}

/// Filters accepted by the sales list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFilter {
    pub customer_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SaleFilter {
    pub fn date_range(&self) -> ValidationResult<DateRange> {
        DateRange::from_dates(self.start_date, self.end_date)
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryCreate {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        Ok(())
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierCreate {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl SupplierCreate {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl SupplierUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }

    pub fn apply(self, supplier: &mut Supplier) {
        if let Some(name) = self.name {
            supplier.name = name.trim().to_string();
        }
        if self.contact_name.is_some() {
            supplier.contact_name = self.contact_name;
        }
        if self.email.is_some() {
            supplier.email = self.email;
        }
        if self.phone.is_some() {
            supplier.phone = self.phone;
        }
        if self.address.is_some() {
            supplier.address = self.address;
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerCreate {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerCreate {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("full_name", &self.full_name)?;
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }

    /// Blank email becomes `None` so it never collides on the unique index.
    pub fn normalized(mut self) -> Self {
        self.email = normalize_optional(self.email);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.full_name {
            validate_name("full_name", name)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }

    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = self.full_name {
            customer.full_name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            customer.email = normalize_optional(Some(email));
        }
        if self.phone.is_some() {
            customer.phone = self.phone;
        }
        if self.address.is_some() {
            customer.address = self.address;
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Admin-side user creation (`POST /users`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

impl UserCreate {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email("email", &self.email)?;
        validate_password(&self.password)
    }
}

/// Self-service signup (`POST /users/register`). Never a superuser.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl From<UserRegister> for UserCreate {
    fn from(r: UserRegister) -> Self {
        UserCreate {
            email: r.email,
            password: r.password,
            full_name: r.full_name,
            is_superuser: false,
        }
    }
}

/// Profile edit (`PUT /users/me`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}

/// A user row ready to insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// Store-side user patch. Built by the API after hashing any new password.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email.trim().to_string();
        }
        if let Some(hash) = self.hashed_password {
            user.hashed_password = hash;
        }
        if self.full_name.is_some() {
            user.full_name = self.full_name;
        }
        if let Some(active) = self.is_active {
            user.is_active = active;
        }
        if let Some(superuser) = self.is_superuser {
            user.is_superuser = superuser;
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// New product. `created_by` comes from the principal, not the body.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub price_cents: i64,
    pub cost_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_quantity: i64,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl ProductCreate {
    /// Trims SKU and barcode and maps blanks to `None`.
    pub fn normalized(mut self) -> Self {
        self.sku = normalize_optional(self.sku);
        self.barcode = normalize_optional(self.barcode);
        self
    }

    /// Expects [`normalized`](Self::normalized) to have run.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        if let Some(sku) = &self.sku {
            validate_sku(sku)?;
        }
        if let Some(barcode) = &self.barcode {
            validate_barcode(barcode)?;
        }
        validate_price_cents("price_cents", self.price_cents)?;
        validate_price_cents("cost_cents", self.cost_cents)?;
        validate_non_negative("stock", self.stock)?;
        validate_non_negative("min_quantity", self.min_quantity)
    }
}

/// Partial product update.
///
/// `stock` is deliberately absent: stock only moves through the ledger,
/// sales and returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
    pub min_quantity: Option<i64>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl ProductUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(sku) = normalize_optional(self.sku.clone()) {
            validate_sku(&sku)?;
        }
        if let Some(barcode) = normalize_optional(self.barcode.clone()) {
            validate_barcode(&barcode)?;
        }
        if let Some(price) = self.price_cents {
            validate_price_cents("price_cents", price)?;
        }
        if let Some(cost) = self.cost_cents {
            validate_price_cents("cost_cents", cost)?;
        }
        if let Some(min) = self.min_quantity {
            validate_non_negative("min_quantity", min)?;
        }
        Ok(())
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if self.description.is_some() {
            product.description = self.description;
        }
        if self.sku.is_some() {
            product.sku = normalize_optional(self.sku);
        }
        if self.barcode.is_some() {
            product.barcode = normalize_optional(self.barcode);
        }
        if let Some(price) = self.price_cents {
            product.price_cents = price;
        }
        if let Some(cost) = self.cost_cents {
            product.cost_cents = cost;
        }
        if let Some(min) = self.min_quantity {
            product.min_quantity = min;
        }
        if self.category_id.is_some() {
            product.category_id = self.category_id;
        }
        if self.supplier_id.is_some() {
            product.supplier_id = self.supplier_id;
        }
    }
}

// =============================================================================
// Ledger, Sale, Return
// =============================================================================

/// Direct stock movement (`POST /inventory`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryTransaction {
    pub product_id: i64,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl NewInventoryTransaction {
    /// IN/OUT need a positive quantity; ADJUSTMENT accepts zero.
    pub fn validate(&self) -> ValidationResult<()> {
        match self.transaction_type {
            TransactionType::In | TransactionType::Out => validate_quantity(self.quantity),
            TransactionType::Adjustment => validate_non_negative("quantity", self.quantity),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub notes: Option<String>,
}

impl NewSale {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_price_cents("unit_price_cents", self.unit_price_cents)
    }

    /// The frozen total for this sale.
    pub fn total_amount(&self) -> CoreResult<Money> {
        sale_total(self.quantity, Money::from_cents(self.unit_price_cents))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleReturn {
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl NewSaleReturn {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_positive("sale_id", self.sale_id)?;
        validate_quantity(self.quantity)
    }
}

/// Filters accepted by the returns list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnFilter {
    pub sale_id: Option<i64>,
    pub product_id: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================
