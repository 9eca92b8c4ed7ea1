//! # User Repository
//!
//! Accounts. Passwords arrive here already hashed; hashing and token
//! issuance live in the API crate.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{NewUser, Page, User, UserPatch};

const SELECT_USER: &str = r#"
    SELECT id, email, hashed_password, full_name, is_active, is_superuser, created_at, updated_at
    FROM users
"#;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_multi(&self, page: Page) -> DbResult<Vec<User>> {
        let page = page.clamped();
        let users =
            sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY id LIMIT ?1 OFFSET ?2"))
                .bind(page.limit)
                .bind(page.skip)
                .fetch_all(&self.pool)
                .await?;

        Ok(users)
    }

    /// Case-sensitive exact match on the stored (trimmed) email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = ?1"))
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Inserts a user. A taken email is a `UniqueViolation`.
    pub async fn create(&self, input: NewUser) -> DbResult<User> {
        let email = input.email.trim().to_string();

        if self.get_by_email(&email).await?.is_some() {
            return Err(DbError::duplicate("email", email));
        }

        debug!(email = %email, is_superuser = input.is_superuser, "Creating user");

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password, full_name, is_active, is_superuser, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, email, hashed_password, full_name, is_active, is_superuser, created_at, updated_at
            "#,
        )
        .bind(&email)
        .bind(&input.hashed_password)
        .bind(&input.full_name)
        .bind(input.is_active)
        .bind(input.is_superuser)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> DbResult<User> {
        let mut user = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        patch.apply(&mut user);

        if let Some(existing) = self.get_by_email(&user.email).await? {
            if existing.id != id {
                return Err(DbError::duplicate("email", user.email));
            }
        }

        user.updated_at = Some(Utc::now());

        debug!(id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?2, hashed_password = ?3, full_name = ?4,
                is_active = ?5, is_superuser = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(user)
    }

    /// Deletes and returns the user. Fails while they own any records.
    pub async fn remove(&self, id: i64) -> DbResult<Option<User>> {
        let Some(user) = self.get(id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok((result.rows_affected() > 0).then_some(user))
    }
}
