//! Request/response DTOs.
//!
//! These carry the `ToSchema` derives, so the OpenAPI document is generated
//! from the same types the handlers (de)serialize. Domain types stay free of
//! presentation concerns.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use userbase_core::{DomainError, User, UserDraft};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserRequest {
    #[schema(min_length = 1, example = "Ana")]
    pub name: String,
    #[schema(min_length = 1, example = "ana@x.com")]
    pub email: String,
}

impl UserRequest {
    pub fn into_draft(self) -> UserDraft {
        UserDraft::new(self.name, self.email)
    }
}

/// Shape checks applied by the `ValidJson` extractor before a handler runs.
pub trait Validate {
    fn validate(&self) -> Result<(), DomainError>;
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), DomainError> {
        UserDraft::new(self.name.as_str(), self.email.as_str()).validate()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    /// Database-assigned identifier.
    #[schema(example = "0190b7a4-6f1e-7c3a-9a51-2f0c8a1d4e55")]
    pub id: String,
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(example = "ana@x.com")]
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_inner(),
            name: user.name,
            email: user.email,
        }
    }
}

/// `{ "value": User | null }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    /// `null` when the database returned no row (e.g. unknown id).
    pub value: Option<UserDto>,
}

impl From<Option<User>> for UserEnvelope {
    fn from(user: Option<User>) -> Self {
        Self {
            value: user.map(UserDto::from),
        }
    }
}

/// `{ "value": [User] }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListEnvelope {
    pub value: Vec<UserDto>,
}

impl From<Vec<User>> for UserListEnvelope {
    fn from(users: Vec<User>) -> Self {
        Self {
            value: users.into_iter().map(UserDto::from).collect(),
        }
    }
}

/// Error body shared by every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "validation_error")]
    pub error: String,
    pub message: String,
}
