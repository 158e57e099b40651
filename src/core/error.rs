//! Error handling for cnab-deps
//!
//! This module provides the error taxonomy for reading the dependencies extension
//! and the user-facing error reporting used by the CLI. It is built around two types:
//! - [`DepsError`] - Enumerated error types for every failure the crate can report
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for terminal display
//!
//! # Error Categories
//!
//! - **Extension data**: [`DepsError::ExtensionNotDefined`], [`DepsError::SerializationError`]
//! - **Extension registration**: [`DepsError::DuplicateExtension`], [`DepsError::UnsupportedExtension`],
//!   [`DepsError::UnsupportedExtensions`]
//! - **Bundle files**: [`DepsError::BundleNotFound`], [`DepsError::BundleParseError`]
//! - **Environment**: [`DepsError::ConfigError`], [`DepsError::IoError`], [`DepsError::SemverError`]
//!
//! [`DepsError::ExtensionNotDefined`] is not a fault. A bundle without the
//! dependencies extension simply has no prerequisites, and callers use
//! [`DepsError::is_not_defined`] to tell that case apart from malformed data.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cnab_deps::core::{DepsError, user_friendly_error};
//!
//! let error = DepsError::ExtensionNotDefined {
//!     key: "io.cnab.dependencies".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for cnab-deps operations.
///
/// Variants carry owned strings rather than source errors so the type stays
/// [`Clone`], which [`user_friendly_error`] relies on when it rebuilds a context
/// from a downcast reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepsError {
    /// The bundle carries no payload under the extension key.
    ///
    /// This is the expected result for bundles without prerequisites.
    #[error("attempted to read extension '{key}' from bundle but none is defined")]
    ExtensionNotDefined {
        /// Extension key that was looked up in the bundle's custom section
        key: String,
    },

    /// The untyped extension payload could not be encoded or decoded.
    ///
    /// `operation` is `marshal` when re-encoding the raw value failed and
    /// `unmarshal` when the bytes did not match the typed shape.
    #[error("could not {operation} the {extension} extension data {content:?}: {reason}")]
    SerializationError {
        /// Which step failed (`marshal` or `unmarshal`)
        operation: String,
        /// Shorthand of the extension being read
        extension: String,
        /// The raw JSON content involved, for diagnostics
        content: String,
        /// Underlying serde error message
        reason: String,
    },

    /// An extension with the same key is already registered.
    #[error("extension '{key}' is already registered")]
    DuplicateExtension {
        /// The conflicting extension key
        key: String,
    },

    /// No registered extension handles the requested key.
    #[error("extension '{key}' is not supported")]
    UnsupportedExtension {
        /// The unknown extension key
        key: String,
    },

    /// A bundle requires several extensions that no registered extension handles.
    #[error("extensions are not supported: {}", .keys.join(", "))]
    UnsupportedExtensions {
        /// The unknown extension keys, in the order the bundle lists them
        keys: Vec<String>,
    },

    /// Bundle file does not exist.
    #[error("bundle file not found: {path}")]
    BundleNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Bundle document is not valid bundle JSON.
    #[error("invalid bundle document in {file}: {reason}")]
    BundleParseError {
        /// File (or `<inline>`) the document came from
        file: String,
        /// Parser error message
        reason: String,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// I/O failure while reading bundle or configuration files
    #[error("I/O error: {message}")]
    IoError {
        /// Rendered [`std::io::Error`]
        message: String,
    },

    /// Bundle version is not a semantic version
    #[error("invalid semantic version '{version}': {reason}")]
    SemverError {
        /// The offending version string
        version: String,
        /// Parser error message
        reason: String,
    },

    /// Catch-all for messages without a dedicated variant
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl DepsError {
    /// Returns true when the error only reports that an extension is absent.
    #[must_use]
    pub const fn is_not_defined(&self) -> bool {
        matches!(self, Self::ExtensionNotDefined { .. })
    }
}

impl From<std::io::Error> for DepsError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}

/// Error wrapper with optional details and an actionable suggestion.
///
/// Used by the CLI to render failures; library code returns [`DepsError`] directly.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: DepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognizes [`DepsError`] anywhere in the `anyhow` chain and attaches tailored
/// suggestions. Other errors are reported with their full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(deps_error) = error.chain().find_map(|cause| cause.downcast_ref::<DepsError>()) {
        return create_error_context(deps_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(DepsError::IoError {
                message: io_error.to_string(),
            })
            .with_suggestion("Check that the file exists and the path is correct");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DepsError::Other {
        message,
    })
}

fn create_error_context(error: DepsError) -> ErrorContext {
    match &error {
        DepsError::ExtensionNotDefined { key } => ErrorContext::new(error.clone())
            .with_details(format!("The bundle's custom section has no '{key}' entry"))
            .with_suggestion("Use 'cnab-deps check' to test for the extension before reading it"),

        DepsError::SerializationError { operation, .. } => ErrorContext::new(error.clone())
            .with_details(format!(
                "The extension payload failed to {operation}. Field types must match the dependencies schema"
            ))
            .with_suggestion(
                "Validate the bundle against https://cnab.io/v1/dependencies.schema.json",
            ),

        DepsError::UnsupportedExtension { key } => ErrorContext::new(error.clone())
            .with_details(format!("No registered extension reads '{key}'"))
            .with_suggestion("Run 'cnab-deps extensions <bundle>' to see which extensions are supported"),

        DepsError::UnsupportedExtensions { keys } => ErrorContext::new(error.clone())
            .with_details(format!("{} required extensions have no registered reader", keys.len()))
            .with_suggestion("Run 'cnab-deps extensions <bundle>' to see which extensions are supported"),

        DepsError::BundleNotFound { path } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check that '{path}' exists and points to a bundle.json file")),

        DepsError::BundleParseError { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check the JSON syntax in {file}")),

        DepsError::ConfigError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Fix or remove the configuration file, or pass --config with a valid path"),

        _ => ErrorContext::new(error),
    }
}
