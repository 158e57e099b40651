//! Core types for cnab-deps
//!
//! This module holds the error taxonomy shared by every other module:
//! - [`DepsError`] - Enumerated error types returned by library operations
//! - [`ErrorContext`] - User-friendly wrapper with details and suggestions
//! - [`user_friendly_error`] - Convert any [`anyhow::Error`] for CLI display
//!
//! Library functions return [`Result<T>`](Result), an alias over [`DepsError`].
//! The CLI layer works in `anyhow` and converts at the edge.

pub mod error;

pub use error::{DepsError, ErrorContext, user_friendly_error};

/// Result alias used by library operations.
pub type Result<T> = std::result::Result<T, DepsError>;
