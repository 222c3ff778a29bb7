#![deny(missing_docs)]

//! # Parameter Validation
//!
//! Decides whether a parameter is sent at all, checks that its location can
//! carry its declared type, runs the type checker, and hands the final value
//! to the [`crate::populator`].

use crate::checker::TypeChecker;
use crate::error::{AppError, AppResult};
use crate::models::ModelRegistry;
use crate::params::{value_text, ParamDecl, ParamLocation, ParamType, ParamValue};
use crate::populator::populate;
use crate::request::WireRequest;
use serde_json::Value as JsonValue;

/// Validates `value` against `decl` and, if it survives, adds it to `request`.
///
/// Optional parameters without a value are skipped before any check runs.
/// Errors from `checker` are returned as [`AppError::TypeCheck`] unchanged.
pub fn validate_and_add<C: TypeChecker + ?Sized>(
    decl: &ParamDecl,
    value: ParamValue,
    request: &mut WireRequest,
    models: &ModelRegistry,
    checker: &C,
) -> AppResult<()> {
    if !decl.required && value.is_absent() {
        return Ok(());
    }

    check_location_type(decl)?;

    let effective_type = match decl.location {
        ParamLocation::Query if value.is_sequence() => ParamType::array_of(decl.ty.clone()),
        _ => decl.ty.clone(),
    };

    let value = checker.check(&decl.name, value, &effective_type, models)?;

    let value = match (&decl.location, value) {
        (ParamLocation::Path, ParamValue::Json(JsonValue::Array(items))) => {
            let joined = items.iter().map(value_text).collect::<Vec<_>>().join(",");
            ParamValue::Json(JsonValue::String(joined))
        }
        (_, value) => value,
    };

    if value.is_absent() {
        if decl.required {
            return Err(AppError::MissingRequiredParameter(decl.name.clone()));
        }
        return Ok(());
    }

    populate(decl, value, request)
}

/// Path parameters carry primitives or arrays of primitives; query parameters carry primitives.
///
/// Other locations are not restricted here.
pub fn check_location_type(decl: &ParamDecl) -> AppResult<()> {
    let supported = match decl.location {
        ParamLocation::Path => decl.ty.is_primitive() || decl.ty.is_primitive_array(),
        ParamLocation::Query => decl.ty.is_primitive(),
        _ => true,
    };
    if supported {
        Ok(())
    } else {
        Err(AppError::UnsupportedTypeForLocation {
            name: decl.name.clone(),
            location: decl.location.clone(),
            ty: decl.ty.clone(),
        })
    }
}
