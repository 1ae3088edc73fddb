//! User domain entity and credential input.

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// User domain entity.
///
/// Created once at registration and never updated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl User {
    /// Create a new user with a freshly generated identifier.
    ///
    /// The store may assign a different identifier on insert; callers adopt
    /// whatever the store returns.
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
        }
    }
}

/// Email and plain text password supplied by a caller. Never persisted.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginCredentials {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Structural validation. The error lists every failing field.
    pub fn check(&self) -> DomainResult<()> {
        self.validate()
            .map_err(|e| DomainError::validation(format_validation_errors(&e)))
    }
}

/// Format validation errors as `field: message` pairs, ordered by field name.
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                (field.clone(), message)
            })
        })
        .collect();
    messages.sort();

    messages
        .into_iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}
