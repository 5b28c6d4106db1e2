//! `userbase-core` — domain building blocks for the users resource.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod user;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use user::{User, UserDraft};
