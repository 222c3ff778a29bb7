#![deny(missing_docs)]

//! # Operation Request Building
//!
//! The calling layer: walks an operation's declared parameters in order and
//! feeds each caller argument through [`validate_and_add`], producing one fully
//! populated [`WireRequest`] or the first error.

use crate::checker::{SwaggerTypeChecker, TypeChecker};
use crate::error::{AppError, AppResult};
use crate::models::ModelRegistry;
use crate::params::{ParamDecl, ParamValue};
use crate::request::WireRequest;
use crate::validator::validate_and_add;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;

/// A single API operation as described by the API document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operation {
    /// HTTP method (`GET`, `POST`, ...).
    pub method: String,
    /// URL template with `{name}` placeholders.
    pub path: String,
    /// Declared parameters, in document order.
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
}

impl Operation {
    /// Creates an operation with no parameters.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            parameters: Vec::new(),
        }
    }

    /// Builder-style parameter declaration.
    pub fn param(mut self, decl: ParamDecl) -> Self {
        self.parameters.push(decl);
        self
    }

    /// Rejects operations that declare the same parameter name twice.
    pub fn ensure_unique_names(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for decl in &self.parameters {
            if !seen.insert(decl.name.as_str()) {
                return Err(AppError::General(format!(
                    "Duplicate parameter '{}' in operation {} {}",
                    decl.name, self.method, self.path
                )));
            }
        }
        Ok(())
    }
}

/// Builds requests for operations against one model registry and type checker.
pub struct RequestBuilder<'a, C: TypeChecker = SwaggerTypeChecker> {
    models: &'a ModelRegistry,
    checker: C,
}

impl<'a> RequestBuilder<'a, SwaggerTypeChecker> {
    /// Uses the stock [`SwaggerTypeChecker`].
    pub fn new(models: &'a ModelRegistry) -> Self {
        Self {
            models,
            checker: SwaggerTypeChecker,
        }
    }
}

impl<'a, C: TypeChecker> RequestBuilder<'a, C> {
    /// Uses a custom type checker.
    pub fn with_checker(models: &'a ModelRegistry, checker: C) -> Self {
        Self { models, checker }
    }

    /// Populates a fresh request from `args`.
    ///
    /// Parameters missing from `args` are treated as absent. Arguments that
    /// match no declaration are ignored with a warning. The first failure
    /// aborts the build; the partial request is dropped.
    pub fn build(
        &self,
        operation: &Operation,
        mut args: IndexMap<String, ParamValue>,
    ) -> AppResult<WireRequest> {
        let span = tracing::debug_span!(
            "build_request",
            method = %operation.method,
            path = %operation.path
        );
        let _enter = span.enter();

        operation.ensure_unique_names()?;

        let mut request = WireRequest::new(&operation.method, &operation.path);
        for decl in &operation.parameters {
            let value = args.shift_remove(&decl.name).unwrap_or_default();
            if value.is_absent() && !decl.required {
                tracing::debug!(param = %decl.name, "optional parameter omitted");
            }
            validate_and_add(decl, value, &mut request, self.models, &self.checker)?;
        }

        for unknown in args.keys() {
            tracing::warn!(param = %unknown, "argument does not match any declared parameter");
        }

        let unresolved = request.unresolved_placeholders();
        if !unresolved.is_empty() {
            tracing::warn!(placeholders = ?unresolved, "URL still contains placeholders");
        }

        Ok(request)
    }
}
