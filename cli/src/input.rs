#![deny(missing_docs)]

//! # Input Documents
//!
//! Reads the operation, argument and model documents given on the command
//! line. Every document may be YAML or JSON.

use crate::error::{CliError, CliResult};
use indexmap::IndexMap;
use parammap_core::{FilePart, ModelRegistry, Operation, ParamValue};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

/// Reads a YAML or JSON document into a JSON value.
pub fn read_document(path: &Path) -> CliResult<JsonValue> {
    if !path.exists() {
        return Err(CliError::General(format!("File not found: {:?}", path)));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Loads an operation description.
pub fn load_operation(path: &Path) -> CliResult<Operation> {
    let doc = read_document(path)?;
    Ok(serde_json::from_value(doc)?)
}

/// Loads model definitions. Accepts a bare definitions map or a document
/// with a `definitions` (Swagger 2.0) or `models` (Swagger 1.2) section.
pub fn load_models(path: Option<&Path>) -> CliResult<ModelRegistry> {
    let Some(path) = path else {
        return Ok(ModelRegistry::new());
    };
    let doc = read_document(path)?;
    let section = doc
        .get("definitions")
        .or_else(|| doc.get("models"))
        .unwrap_or(&doc);
    Ok(ModelRegistry::from_definitions(section)?)
}

/// Loads the caller's arguments.
///
/// Values of file-typed parameters are paths, resolved relative to the
/// arguments file, and are read from disk.
pub fn load_args(
    path: Option<&Path>,
    operation: &Operation,
) -> CliResult<IndexMap<String, ParamValue>> {
    let Some(path) = path else {
        return Ok(IndexMap::new());
    };
    let doc = read_document(path)?;
    let JsonValue::Object(entries) = doc else {
        return Err(CliError::General(format!(
            "Arguments in {:?} must be a mapping of parameter name to value",
            path
        )));
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut args = IndexMap::with_capacity(entries.len());
    for (name, value) in entries {
        let is_file = operation
            .parameters
            .iter()
            .any(|decl| decl.name == name && decl.ty.is_file());
        let value = match value {
            JsonValue::String(file) if is_file => {
                ParamValue::File(read_file_part(&base_dir.join(file))?)
            }
            other => ParamValue::Json(other),
        };
        args.insert(name, value);
    }
    Ok(args)
}

fn read_file_part(path: &Path) -> CliResult<FilePart> {
    let bytes = fs::read(path)
        .map_err(|e| CliError::General(format!("Failed to read upload {:?}: {}", path, e)))?;
    let part = FilePart::new(bytes);
    Ok(match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => part.with_file_name(name),
        None => part,
    })
}
