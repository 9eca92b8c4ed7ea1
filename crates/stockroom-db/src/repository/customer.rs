//! # Customer Repository
//!
//! Customers are shared across users. Email is unique when present.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{Customer, CustomerCreate, CustomerUpdate, Page};

const SELECT_CUSTOMER: &str = r#"
    SELECT id, full_name, email, phone, address, created_at, updated_at
    FROM customers
"#;

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!("{SELECT_CUSTOMER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn get_multi(&self, page: Page) -> DbResult<Vec<Customer>> {
        let page = page.clamped();
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER} ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let customer =
            sqlx::query_as::<_, Customer>(&format!("{SELECT_CUSTOMER} WHERE email = ?1"))
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(customer)
    }

    /// First customer with this phone number, by id.
    pub async fn get_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "{SELECT_CUSTOMER} WHERE phone = ?1 ORDER BY id LIMIT 1"
        ))
        .bind(phone.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer. A taken email is a `UniqueViolation`.
    pub async fn create(&self, input: CustomerCreate) -> DbResult<Customer> {
        let input = input.normalized();
        input.validate()?;

        if let Some(email) = &input.email {
            if self.get_by_email(email).await?.is_some() {
                return Err(DbError::duplicate("email", email.as_str()));
            }
        }

        debug!(full_name = %input.full_name, "Creating customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (full_name, email, phone, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, full_name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(input.full_name.trim())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn update(&self, id: i64, patch: CustomerUpdate) -> DbResult<Customer> {
        patch.validate()?;
        let mut customer = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;

        patch.apply(&mut customer);

        if let Some(email) = &customer.email {
            if let Some(existing) = self.get_by_email(email).await? {
                if existing.id != id {
                    return Err(DbError::duplicate("email", email.as_str()));
                }
            }
        }

        customer.updated_at = Some(Utc::now());

        debug!(id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET full_name = ?2, email = ?3, phone = ?4, address = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&customer.full_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(customer)
    }

    /// Deletes and returns the customer. Fails while sales reference it.
    pub async fn remove(&self, id: i64) -> DbResult<Option<Customer>> {
        let Some(customer) = self.get(id).await? else {
            return Ok(None);
        };

        debug!(id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok((result.rows_affected() > 0).then_some(customer))
    }
}
