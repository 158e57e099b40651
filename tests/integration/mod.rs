//! Integration test suite for cnab-deps
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: End-to-end runs of the `cnab-deps` binary
//! - **reader**: Reading bundle files through the library API

mod cli;
mod reader;
