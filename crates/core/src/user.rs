//! The user record and its write payload.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// A stored user, as returned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Writable fields of a user (create and full update).
///
/// `id` is deliberately absent: it is assigned once by the database and never
/// patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Shape check only: both fields present and not blank.
    ///
    /// No business rules (email format, uniqueness) are applied here.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }
        Ok(())
    }
}
