//! cnab-deps - CNAB dependencies extension
//!
//! Reads the `io.cnab.dependencies` extension of a CNAB bundle descriptor and
//! turns it into an installation plan that an external installer can drive.
//!
//! # Architecture Overview
//!
//! - A [`bundle::Bundle`] carries untyped extension payloads in its `custom` map
//! - [`extensions::RequiredExtension`] describes one extension: key, schema,
//!   shorthand, and reader
//! - [`extensions::ExtensionRegistry`] holds the extensions a toolchain
//!   recognizes and is passed around explicitly
//! - [`extensions::dependencies`] reads the dependencies payload, orders it for
//!   installation, and names prerequisite installations
//!
//! Resolving bundle references, matching version ranges, and installing
//! bundles are left to the caller.
//!
//! # Example
//!
//! ```rust
//! use cnab_deps::bundle::Bundle;
//! use cnab_deps::extensions::dependencies::{
//!     build_prerequisite_installation_name, has_dependencies, read_dependencies,
//! };
//!
//! let bundle = Bundle::from_json_str(r#"{
//!     "name": "myapp",
//!     "version": "0.1.0",
//!     "custom": {
//!         "io.cnab.dependencies": {
//!             "sequence": ["db", "cache"],
//!             "requires": {
//!                 "db": { "bundle": "example.com/db:1.0" },
//!                 "cache": { "bundle": "example.com/cache:2.0" }
//!             }
//!         }
//!     }
//! }"#)?;
//!
//! assert!(has_dependencies(&bundle));
//! let deps = read_dependencies(&bundle)?;
//! let names: Vec<String> = deps
//!     .list_by_sequence()
//!     .iter()
//!     .map(|dep| build_prerequisite_installation_name("prod", &dep.name))
//!     .collect();
//! assert_eq!(names, vec!["prod-db", "prod-cache"]);
//! # Ok::<(), cnab_deps::core::DepsError>(())
//! ```
//!
//! # Modules
//!
//! - [`bundle`] - Bundle descriptor model and loading
//! - [`extensions`] - Extension descriptors, registry, and the dependencies extension
//! - [`core`] - Error types and user-facing error reporting
//! - [`config`] - Global configuration file
//! - [`cli`] - Command-line interface

pub mod bundle;
pub mod cli;
pub mod config;
pub mod core;
pub mod extensions;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
