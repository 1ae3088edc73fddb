//! Domain layer - Core authentication entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are shared between the token service, the orchestrator and the
//! user store.

pub mod constants;
pub mod error;
pub mod password;
pub mod token;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{Argon2Hasher, CredentialHasher};
pub use token::{validate_token_format, Claims, TokenClass, TokenPair};
pub use user::{LoginCredentials, User};
