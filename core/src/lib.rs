#![deny(missing_docs)]

//! # ParamMap Core
//!
//! Parameter marshalling for generated HTTP API clients.
//!
//! Given a parameter declaration from an API description and a caller-supplied
//! value, the core validates the value, normalizes it for the wire, and writes
//! it into the right region of an outgoing [`WireRequest`]: the URL path, the
//! query string, the body, or the form.
//!
//! No network I/O happens here. The populated request is handed to whatever
//! transport the caller uses.

/// Shared error types.
pub mod error;

/// Parameter declarations, types and runtime values.
pub mod params;

/// Complex type definitions.
pub mod models;

/// Type checking capability.
pub mod checker;

/// The request under construction.
pub mod request;

/// Writes validated values into a request.
pub mod populator;

/// Per-parameter validation.
pub mod validator;

/// Whole-operation request building.
pub mod operation;

pub use checker::{SwaggerTypeChecker, TypeChecker};
pub use error::{AppError, AppResult, TypeCheckError};
pub use models::{ModelDefinition, ModelRegistry};
pub use operation::{Operation, RequestBuilder};
pub use params::{FilePart, ParamDecl, ParamLocation, ParamType, ParamValue, PrimitiveType};
pub use populator::{add_form_param, populate, stringify_body};
pub use request::{FormData, RequestPayload, WireRequest, APP_JSON};
pub use validator::{check_location_type, validate_and_add};
