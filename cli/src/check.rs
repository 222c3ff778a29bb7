#![deny(missing_docs)]

//! # Check Command
//!
//! Lints an operation's declarations without any argument values: every
//! parameter must sit in a supported location with a type that location can
//! carry, and every referenced model must exist.

use crate::error::{CliError, CliResult};
use crate::input::{load_models, load_operation};
use parammap_core::{check_location_type, ModelRegistry, ParamDecl, ParamLocation, ParamType};
use std::path::PathBuf;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Operation description (YAML or JSON).
    #[clap(long)]
    pub operation: PathBuf,

    /// Model definitions.
    #[clap(long)]
    pub models: Option<PathBuf>,
}

/// Returns the problems found in one declaration.
pub fn lint_declaration(decl: &ParamDecl, models: &ModelRegistry) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(e) = check_location_type(decl) {
        problems.push(e.to_string());
    }
    match &decl.location {
        ParamLocation::Header | ParamLocation::Other(_) => {
            problems.push(format!(
                "parameter '{}' uses unsupported location '{}'",
                decl.name, decl.location
            ));
        }
        ParamLocation::Form if !(decl.ty.is_file() || decl.ty.is_primitive()) => {
            problems.push(format!(
                "form parameter '{}' must be a file or a primitive",
                decl.name
            ));
        }
        _ => {}
    }

    let mut pending = vec![&decl.ty];
    while let Some(ty) = pending.pop() {
        match ty {
            ParamType::Array(inner) => pending.push(inner.as_ref()),
            ParamType::Complex(name) if models.get(name).is_none() => {
                problems.push(format!(
                    "parameter '{}' references unknown model '{}'",
                    decl.name, name
                ));
            }
            _ => {}
        }
    }
    problems
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    let operation = load_operation(&args.operation)?;
    operation.ensure_unique_names()?;
    let models = load_models(args.models.as_deref())?;

    let mut failures = 0;
    for decl in &operation.parameters {
        let problems = lint_declaration(decl, &models);
        let marker = if decl.required { "*" } else { "" };
        println!("{}{}\t{}\t{}", decl.name, marker, decl.location, decl.ty);
        for problem in &problems {
            tracing::error!("{}", problem);
        }
        failures += problems.len();
    }

    if failures > 0 {
        return Err(CliError::General(format!(
            "{} problem(s) found in {} {}",
            failures, operation.method, operation.path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parammap_core::{ModelDefinition, PrimitiveType};
    use std::fs;
    use tempfile::tempdir;

    fn string() -> ParamType {
        ParamType::Primitive(PrimitiveType::String)
    }

    #[test]
    fn test_lint_clean_declaration() {
        let decl = ParamDecl::new("q", "query", string(), false);
        assert!(lint_declaration(&decl, &ModelRegistry::new()).is_empty());
    }

    #[test]
    fn test_lint_reports_each_problem() {
        let models = ModelRegistry::new();

        let path_model = ParamDecl::new("pet", "path", ParamType::Complex("Pet".into()), true);
        let problems = lint_declaration(&path_model, &models);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("cannot carry type Pet"));
        assert!(problems[1].contains("unknown model 'Pet'"));

        let header = ParamDecl::new("X-Id", "header", string(), false);
        assert!(lint_declaration(&header, &models)[0].contains("unsupported location 'header'"));

        let form_array = ParamDecl::new("tags", "form", ParamType::array_of(string()), false);
        assert!(lint_declaration(&form_array, &models)[0].contains("file or a primitive"));
    }

    #[test]
    fn test_lint_finds_models_inside_arrays() {
        let decl = ParamDecl::new(
            "pets",
            "body",
            ParamType::array_of(ParamType::Complex("Pet".into())),
            true,
        );
        let missing = lint_declaration(&decl, &ModelRegistry::new());
        assert_eq!(missing.len(), 1);

        let models = ModelRegistry::new().with_model("Pet", ModelDefinition::default());
        assert!(lint_declaration(&decl, &models).is_empty());
    }

    #[test]
    fn test_execute_fails_on_problems() {
        let dir = tempdir().unwrap();
        let op = dir.path().join("op.json");
        fs::write(
            &op,
            r#"{"method": "get", "path": "/x", "parameters": [{"name": "s", "in": "cookie"}]}"#,
        )
        .unwrap();
        let err = execute(&CheckArgs { operation: op, models: None }).unwrap_err();
        assert!(format!("{}", err).contains("1 problem(s)"));
    }
}
