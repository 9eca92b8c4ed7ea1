//! # Access Scoping
//!
//! The authenticated principal and the ownership rule applied to owned
//! records (products, ledger entries, sales, returns).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Principal          owner_scope()      sees                             │
//! │  ─────────────────  ─────────────────  ──────────────────────────────  │
//! │  regular user #4    Some(4)            rows with created_by = 4        │
//! │  superuser          None               every row                       │
//! │                                                                         │
//! │  Applies to list AND single-item reads. A row outside the scope is     │
//! │  reported as not found, never as forbidden.                             │
//! │  Categories, suppliers and customers are shared and never scoped.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::User;

/// The user a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub is_superuser: bool,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Principal {
            user_id: user.id,
            email: user.email.clone(),
            is_superuser: user.is_superuser,
        }
    }

    /// `created_by` filter for owned records; `None` means unrestricted.
    pub fn owner_scope(&self) -> Option<i64> {
        if self.is_superuser {
            None
        } else {
            Some(self.user_id)
        }
    }

    /// Gate for user administration.
    pub fn require_superuser(&self) -> CoreResult<()> {
        if self.is_superuser {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(
                "The user doesn't have enough privileges".to_string(),
            ))
        }
    }

    /// Gate for reading a user record: self or a superuser.
    pub fn require_self_or_superuser(&self, user_id: i64) -> CoreResult<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            self.require_superuser()
        }
    }
}
