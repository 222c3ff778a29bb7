#![deny(missing_docs)]

//! # Model Registry
//!
//! Stores complex type definitions referenced by parameter declarations.
//! The validator and populator never look inside; the registry only travels
//! through to the [`crate::checker::TypeChecker`].

use crate::error::{AppError, AppResult};
use crate::params::{model_name, ParamType, ShimTypeRef};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Definition of a single complex model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelDefinition {
    /// Declared properties in document order.
    pub properties: IndexMap<String, ParamType>,
    /// Names of properties that must be present.
    pub required: Vec<String>,
}

impl ModelDefinition {
    /// Adds a property.
    pub fn property(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }

    /// Adds a required property.
    pub fn required_property(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, ty);
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct ShimModel {
    #[serde(default)]
    properties: IndexMap<String, ShimTypeRef>,
    #[serde(default)]
    required: Vec<String>,
}

/// Registry of complex types, keyed by model name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelDefinition>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a model.
    pub fn insert(&mut self, name: impl Into<String>, model: ModelDefinition) {
        self.models.insert(name.into(), model);
    }

    /// Builder-style [`ModelRegistry::insert`].
    pub fn with_model(mut self, name: impl Into<String>, model: ModelDefinition) -> Self {
        self.insert(name, model);
        self
    }

    /// Looks up a model by bare name or by `#/definitions/Name` reference.
    pub fn get(&self, reference: &str) -> Option<&ModelDefinition> {
        self.models.get(model_name(reference))
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True when no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Builds a registry from a Swagger `definitions` (2.0) or `models` (1.2) object.
    ///
    /// Swagger 1.2 lists `required` on the model; 2.0 does the same, so both
    /// share one shape.
    pub fn from_definitions(definitions: &JsonValue) -> AppResult<Self> {
        let shims: IndexMap<String, ShimModel> = serde_json::from_value(definitions.clone())
            .map_err(|e| AppError::General(format!("Failed to parse model definitions: {}", e)))?;

        let mut registry = Self::new();
        for (name, shim) in shims {
            let mut model = ModelDefinition {
                required: shim.required,
                ..ModelDefinition::default()
            };
            for (prop, descriptor) in shim.properties {
                let context = format!("{}.{}", name, prop);
                let ty = descriptor.resolve(&context).map_err(AppError::General)?;
                model.properties.insert(prop, ty);
            }
            registry.insert(name, model);
        }
        Ok(registry)
    }
}
