#![deny(missing_docs)]

//! # Type Checking
//!
//! The seam between the validator and whatever validates and coerces values
//! against declared types. The validator only sees the [`TypeChecker`] trait
//! and forwards its errors untouched.
//!
//! [`SwaggerTypeChecker`] is the stock implementation: strict about shapes,
//! lenient about primitives written as strings (`"10"` for an integer).

use crate::error::TypeCheckError;
use crate::models::ModelRegistry;
use crate::params::{ParamType, ParamValue, PrimitiveType};
use serde_json::{Map, Number, Value as JsonValue};

/// Validates a value against its effective type and returns the coerced value.
pub trait TypeChecker {
    /// Checks `value` for parameter `name` against `ty`.
    ///
    /// Returning `ParamValue::Absent` means "no value after coercion".
    fn check(
        &self,
        name: &str,
        value: ParamValue,
        ty: &ParamType,
        models: &ModelRegistry,
    ) -> Result<ParamValue, TypeCheckError>;
}

impl<F> TypeChecker for F
where
    F: Fn(&str, ParamValue, &ParamType, &ModelRegistry) -> Result<ParamValue, TypeCheckError>,
{
    fn check(
        &self,
        name: &str,
        value: ParamValue,
        ty: &ParamType,
        models: &ModelRegistry,
    ) -> Result<ParamValue, TypeCheckError> {
        self(name, value, ty, models)
    }
}

/// Default checker for Swagger primitive, array, model and file types.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaggerTypeChecker;

impl TypeChecker for SwaggerTypeChecker {
    fn check(
        &self,
        name: &str,
        value: ParamValue,
        ty: &ParamType,
        models: &ModelRegistry,
    ) -> Result<ParamValue, TypeCheckError> {
        match value {
            ParamValue::Absent | ParamValue::Json(JsonValue::Null) => Ok(ParamValue::Absent),
            ParamValue::File(part) if ty.is_file() => Ok(ParamValue::File(part)),
            ParamValue::File(_) => Err(TypeCheckError::new(
                name,
                format!("expected {}, got a file upload", ty),
            )),
            ParamValue::Json(v) => check_json(name, v, ty, models).map(ParamValue::Json),
        }
    }
}

fn check_json(
    path: &str,
    value: JsonValue,
    ty: &ParamType,
    models: &ModelRegistry,
) -> Result<JsonValue, TypeCheckError> {
    match ty {
        ParamType::Primitive(p) => check_primitive(path, value, *p),
        ParamType::Array(inner) => match value {
            JsonValue::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| check_json(&format!("{}[{}]", path, i), item, inner, models))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            other => Err(mismatch(path, "array", &other)),
        },
        ParamType::Complex(model) => check_model(path, value, model, models),
        ParamType::File => match value {
            content @ JsonValue::String(_) => Ok(content),
            other => Err(mismatch(path, "a file upload", &other)),
        },
    }
}

fn check_primitive(
    path: &str,
    value: JsonValue,
    ty: PrimitiveType,
) -> Result<JsonValue, TypeCheckError> {
    match (ty, value) {
        (PrimitiveType::String, v @ JsonValue::String(_)) => Ok(v),
        (PrimitiveType::Integer, JsonValue::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(JsonValue::Number(n))
        }
        (PrimitiveType::Integer, JsonValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(|i| JsonValue::Number(i.into()))
            .map_err(|_| TypeCheckError::new(path, format!("'{}' is not an integer", s))),
        (PrimitiveType::Number, v @ JsonValue::Number(_)) => Ok(v),
        (PrimitiveType::Number, JsonValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .ok_or_else(|| TypeCheckError::new(path, format!("'{}' is not a number", s))),
        (PrimitiveType::Boolean, v @ JsonValue::Bool(_)) => Ok(v),
        (PrimitiveType::Boolean, JsonValue::String(s)) => match s.as_str() {
            "true" => Ok(JsonValue::Bool(true)),
            "false" => Ok(JsonValue::Bool(false)),
            _ => Err(TypeCheckError::new(path, format!("'{}' is not a boolean", s))),
        },
        (ty, other) => Err(mismatch(path, ty.as_str(), &other)),
    }
}

fn check_model(
    path: &str,
    value: JsonValue,
    model_name: &str,
    models: &ModelRegistry,
) -> Result<JsonValue, TypeCheckError> {
    let fields = match value {
        JsonValue::Object(fields) => fields,
        other => return Err(mismatch(path, model_name, &other)),
    };
    let model = models
        .get(model_name)
        .ok_or_else(|| TypeCheckError::new(path, format!("unknown model '{}'", model_name)))?;

    for required in &model.required {
        if fields.get(required).map_or(true, JsonValue::is_null) {
            return Err(TypeCheckError::new(
                format!("{}.{}", path, required),
                format!("required property of {} is missing", model_name),
            ));
        }
    }

    let mut checked = Map::with_capacity(fields.len());
    for (key, field) in fields {
        let field = match model.properties.get(&key) {
            Some(prop_ty) if !field.is_null() => {
                check_json(&format!("{}.{}", path, key), field, prop_ty, models)?
            }
            _ => field,
        };
        checked.insert(key, field);
    }
    Ok(JsonValue::Object(checked))
}

fn mismatch(path: &str, expected: &str, got: &JsonValue) -> TypeCheckError {
    TypeCheckError::new(path, format!("expected {}, got {}", expected, kind_of(got)))
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelDefinition;
    use crate::params::FilePart;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn prim(p: PrimitiveType) -> ParamType {
        ParamType::Primitive(p)
    }

    fn check(value: JsonValue, ty: &ParamType) -> Result<ParamValue, TypeCheckError> {
        SwaggerTypeChecker.check("p", ParamValue::Json(value), ty, &ModelRegistry::new())
    }

    #[test]
    fn test_null_and_absent_become_absent() {
        let ty = prim(PrimitiveType::String);
        assert_eq!(check(json!(null), &ty).unwrap(), ParamValue::Absent);
        let out = SwaggerTypeChecker
            .check("p", ParamValue::Absent, &ty, &ModelRegistry::new())
            .unwrap();
        assert_eq!(out, ParamValue::Absent);
    }

    #[test]
    fn test_empty_string_is_kept() {
        let out = check(json!(""), &prim(PrimitiveType::String)).unwrap();
        assert_eq!(out, ParamValue::Json(json!("")));
    }

    #[test]
    fn test_integer_coercion() {
        let ty = prim(PrimitiveType::Integer);
        assert_eq!(check(json!(10), &ty).unwrap(), ParamValue::Json(json!(10)));
        assert_eq!(check(json!("42"), &ty).unwrap(), ParamValue::Json(json!(42)));
        let err = check(json!(1.5), &ty).unwrap_err();
        assert_eq!(err.message, "expected integer, got number");
        let err = check(json!("ten"), &ty).unwrap_err();
        assert_eq!(err.message, "'ten' is not an integer");
    }

    #[test]
    fn test_number_and_boolean_coercion() {
        assert_eq!(
            check(json!("2.5"), &prim(PrimitiveType::Number)).unwrap(),
            ParamValue::Json(json!(2.5))
        );
        assert_eq!(
            check(json!("false"), &prim(PrimitiveType::Boolean)).unwrap(),
            ParamValue::Json(json!(false))
        );
        assert!(check(json!("yes"), &prim(PrimitiveType::Boolean)).is_err());
    }

    #[test]
    fn test_string_rejects_number() {
        let err = check(json!(5), &prim(PrimitiveType::String)).unwrap_err();
        assert_eq!(err.name, "p");
        assert_eq!(err.message, "expected string, got number");
    }

    #[test]
    fn test_array_elementwise() {
        let ty = ParamType::array_of(prim(PrimitiveType::Integer));
        assert_eq!(
            check(json!([1, "2"]), &ty).unwrap(),
            ParamValue::Json(json!([1, 2]))
        );
        let err = check(json!([1, "x"]), &ty).unwrap_err();
        assert_eq!(err.name, "p[1]");
        let err = check(json!(1), &ty).unwrap_err();
        assert_eq!(err.message, "expected array, got number");
    }

    #[test]
    fn test_model_validation() {
        let models = ModelRegistry::new()
            .with_model(
                "Pet",
                ModelDefinition::default()
                    .required_property("name", prim(PrimitiveType::String))
                    .property("age", prim(PrimitiveType::Integer))
                    .property("owner", ParamType::Complex("Owner".into())),
            )
            .with_model(
                "Owner",
                ModelDefinition::default().required_property("id", prim(PrimitiveType::Integer)),
            );
        let ty = ParamType::Complex("Pet".into());

        let ok = SwaggerTypeChecker
            .check(
                "pet",
                ParamValue::Json(json!({"name": "Rex", "age": "3", "extra": true})),
                &ty,
                &models,
            )
            .unwrap();
        assert_eq!(
            ok,
            ParamValue::Json(json!({"name": "Rex", "age": 3, "extra": true}))
        );

        let err = SwaggerTypeChecker
            .check("pet", ParamValue::Json(json!({"age": 3})), &ty, &models)
            .unwrap_err();
        assert_eq!(err.name, "pet.name");

        let err = SwaggerTypeChecker
            .check(
                "pet",
                ParamValue::Json(json!({"name": "Rex", "owner": {}})),
                &ty,
                &models,
            )
            .unwrap_err();
        assert_eq!(err.name, "pet.owner.id");
    }

    #[test]
    fn test_unknown_model() {
        let err = check(json!({}), &ParamType::Complex("Ghost".into())).unwrap_err();
        assert_eq!(err.message, "unknown model 'Ghost'");
    }

    #[test]
    fn test_file_values() {
        let part = FilePart::new(b"abc".to_vec());
        let out = SwaggerTypeChecker
            .check(
                "f",
                ParamValue::File(part.clone()),
                &ParamType::File,
                &ModelRegistry::new(),
            )
            .unwrap();
        assert_eq!(out, ParamValue::File(part.clone()));

        assert_eq!(
            check(json!("abc"), &ParamType::File).unwrap(),
            ParamValue::Json(json!("abc"))
        );
        assert!(check(json!(1), &ParamType::File).is_err());
        assert!(SwaggerTypeChecker
            .check(
                "f",
                ParamValue::File(part),
                &prim(PrimitiveType::String),
                &ModelRegistry::new()
            )
            .is_err());
    }

    #[test]
    fn test_closure_checker() {
        let upper = |_: &str, v: ParamValue, _: &ParamType, _: &ModelRegistry| {
            Ok::<_, TypeCheckError>(match v {
                ParamValue::Json(JsonValue::String(s)) => ParamValue::Json(json!(s.to_uppercase())),
                other => other,
            })
        };
        let out = upper
            .check(
                "p",
                ParamValue::Json(json!("abc")),
                &prim(PrimitiveType::String),
                &ModelRegistry::new(),
            )
            .unwrap();
        assert_eq!(out, ParamValue::Json(json!("ABC")));
    }
}
