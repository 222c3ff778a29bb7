#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Nothing in the core catches or retries an error. Every variant aborts the
//! current request build and is handed straight back to the caller.

use crate::params::{ParamLocation, ParamType};
use derive_more::{Display, From};

/// Failure reported by a [`crate::checker::TypeChecker`].
///
/// The core never rewrites this value; it travels to the caller inside
/// [`AppError::TypeCheck`] exactly as the checker produced it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Invalid value for parameter '{name}': {message}")]
pub struct TypeCheckError {
    /// Parameter (or dotted property path) that failed validation.
    pub name: String,
    /// Human readable reason.
    pub message: String,
}

impl TypeCheckError {
    /// Creates a new type-check failure.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl std::error::Error for TypeCheckError {}

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A required parameter had no value after validation.
    #[from(ignore)]
    #[display("Missing required parameter '{_0}'")]
    MissingRequiredParameter(String),

    /// The API description assigns a type the location cannot carry.
    #[from(ignore)]
    #[display("{location} parameter '{name}' cannot carry type {ty}")]
    UnsupportedTypeForLocation {
        /// Parameter name.
        name: String,
        /// Declared location.
        location: ParamLocation,
        /// Declared type.
        ty: ParamType,
    },

    /// The declared location is not handled by this client.
    #[from(ignore)]
    #[display("Unsupported parameter location: {_0}")]
    UnsupportedParameterLocation(String),

    /// A form field is neither a file nor a primitive.
    #[from(ignore)]
    #[display("Form parameter '{_0}' is neither primitive nor file")]
    InvalidFormFieldType(String),

    /// Body and form parameters were mixed on one request.
    #[from(ignore)]
    #[display("Request payload conflict: {_0}")]
    PayloadConflict(String),

    /// A substituted path value cannot be placed under a base URL.
    #[from(ignore)]
    #[display("Invalid path segment: {_0}")]
    InvalidPathSegment(String),

    /// Failure from the type-checking capability, carried verbatim.
    #[display("{_0}")]
    TypeCheck(TypeCheckError),

    /// JSON serialization failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// URL parsing failure.
    #[display("URL Error: {_0}")]
    Url(url::ParseError),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
