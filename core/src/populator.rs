#![deny(missing_docs)]

//! # Request Populator
//!
//! Writes an already validated value into the region of the [`WireRequest`]
//! selected by the declaration's location. No I/O, no logging.

use crate::error::{AppError, AppResult};
use crate::params::{value_text, FilePart, ParamDecl, ParamLocation, ParamType, ParamValue};
use crate::request::{WireRequest, APP_JSON};
use serde_json::Value as JsonValue;

/// Header set when a model is serialized into the body.
pub const CONTENT_TYPE: &str = "content-type";

/// Populates `request` with `value` according to `decl.location`.
///
/// # Errors
///
/// * `UnsupportedParameterLocation` for `header` and unknown locations.
/// * `InvalidFormFieldType` for form fields that are neither file nor primitive.
/// * `PayloadConflict` when body and form parameters are mixed.
pub fn populate(decl: &ParamDecl, value: ParamValue, request: &mut WireRequest) -> AppResult<()> {
    match &decl.location {
        ParamLocation::Path => {
            let value = into_json(decl, value)?;
            request.substitute_path(&decl.name, &value_text(&value));
        }
        ParamLocation::Query => {
            let value = into_json(decl, value)?;
            request.set_query(decl.name.clone(), value);
        }
        ParamLocation::Body => {
            let value = into_json(decl, value)?;
            if decl.ty.is_primitive() {
                if let Some(body) = stringify_body(&value)? {
                    request.set_body(body)?;
                }
            } else {
                request.set_header(CONTENT_TYPE, APP_JSON);
                request.set_body(serde_json::to_string(&value)?)?;
            }
        }
        ParamLocation::Form => add_form_param(&decl.name, value, &decl.ty, request)?,
        ParamLocation::Header => {
            return Err(AppError::UnsupportedParameterLocation("header".into()));
        }
        ParamLocation::Other(raw) => {
            return Err(AppError::UnsupportedParameterLocation(raw.clone()));
        }
    }
    Ok(())
}

/// Renders a primitive body value.
///
/// `null` yields no body; strings are used verbatim; anything else becomes JSON text.
pub fn stringify_body(value: &JsonValue) -> AppResult<Option<String>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s.clone())),
        other => Ok(Some(serde_json::to_string(other)?)),
    }
}

/// Attaches a form parameter: files go to the file map, primitives to the field map.
pub fn add_form_param(
    name: &str,
    value: ParamValue,
    ty: &ParamType,
    request: &mut WireRequest,
) -> AppResult<()> {
    match ty {
        ParamType::File => {
            let part = match value {
                ParamValue::File(part) => part,
                ParamValue::Json(JsonValue::String(s)) => FilePart::new(s.into_bytes()),
                _ => {
                    return Err(AppError::General(format!(
                        "Form parameter '{}' expects a file upload",
                        name
                    )))
                }
            };
            request.set_file(name, part)
        }
        ParamType::Primitive(_) => {
            let value = match value {
                ParamValue::Json(v) => v,
                ParamValue::Absent => JsonValue::Null,
                ParamValue::File(_) => return Err(AppError::InvalidFormFieldType(name.into())),
            };
            request.set_form_field(name, value)
        }
        ParamType::Array(_) | ParamType::Complex(_) => {
            Err(AppError::InvalidFormFieldType(name.into()))
        }
    }
}

/// Unwraps the JSON payload of a value bound for path, query or body.
fn into_json(decl: &ParamDecl, value: ParamValue) -> AppResult<JsonValue> {
    match value {
        ParamValue::Json(v) => Ok(v),
        ParamValue::Absent => Ok(JsonValue::Null),
        ParamValue::File(_) => Err(AppError::UnsupportedTypeForLocation {
            name: decl.name.clone(),
            location: decl.location.clone(),
            ty: ParamType::File,
        }),
    }
}
