//! Configuration management for cnab-deps
//!
//! The only configuration layer is the optional user-wide file handled by
//! [`GlobalConfig`]. Command-line flags take precedence over it, and it takes
//! precedence over built-in defaults.

mod global;

pub use global::GlobalConfig;
