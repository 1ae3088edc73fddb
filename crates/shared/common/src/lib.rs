//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - The error taxonomy with its gRPC and HTTP mappings
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
