//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token expiration in hours
pub const DEFAULT_ACCESS_EXPIRATION_HOURS: i64 = 24;

/// Default refresh token expiration in hours (30 days)
pub const DEFAULT_REFRESH_EXPIRATION_HOURS: i64 = 720;

/// Upper bound for either token lifetime (10 years)
pub const MAX_EXPIRATION_HOURS: i64 = 87_600;

/// Default issuer embedded in every token
pub const DEFAULT_TOKEN_ISSUER: &str = "auth-service";

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
