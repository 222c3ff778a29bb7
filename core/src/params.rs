#![deny(missing_docs)]

//! # Parameter Declarations & Values
//!
//! Intermediate Representation for operation parameters: where a parameter
//! travels (`ParamLocation`), what it carries (`ParamType`), the immutable
//! declaration (`ParamDecl`) and the caller-supplied runtime value (`ParamValue`).
//!
//! Declarations deserialize from Swagger 1.2 (`paramType`) and Swagger 2.0 (`in`)
//! parameter objects through a local shim, so the rest of the crate only ever
//! matches on closed enums.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// A non-complex, non-file scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
}

impl PrimitiveType {
    /// Parses a Swagger primitive type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The Swagger name of this primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared type of a parameter or model property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A scalar.
    Primitive(PrimitiveType),
    /// A sequence of the inner type.
    Array(Box<ParamType>),
    /// A named model resolved through the [`crate::models::ModelRegistry`].
    Complex(String),
    /// A binary upload.
    File,
}

impl ParamType {
    /// Shorthand for `Array(inner)`.
    pub fn array_of(inner: ParamType) -> Self {
        Self::Array(Box::new(inner))
    }

    /// True for scalar types.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// True for `Array(Primitive(_))`.
    pub fn is_primitive_array(&self) -> bool {
        matches!(self, Self::Array(inner) if inner.is_primitive())
    }

    /// True for file uploads.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::Array(inner) => write!(f, "array:{}", inner),
            Self::Complex(name) => write!(f, "{}", name),
            Self::File => write!(f, "File"),
        }
    }
}

/// Where a parameter travels in the HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ParamLocation {
    /// Substituted into the URL template.
    Path,
    /// Added to the query string.
    Query,
    /// Sent as the request body.
    Body,
    /// Sent as a form field or multipart file (`form` / `formData`).
    Form,
    /// Request header. Declared but not supported by this client.
    Header,
    /// Any location this client does not know about (e.g. `cookie`).
    Other(String),
}

impl From<String> for ParamLocation {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "path" => Self::Path,
            "query" => Self::Query,
            "body" => Self::Body,
            "form" | "formData" => Self::Form,
            "header" => Self::Header,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for ParamLocation {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => f.write_str("path"),
            Self::Query => f.write_str("query"),
            Self::Body => f.write_str("body"),
            Self::Form => f.write_str("form"),
            Self::Header => f.write_str("header"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Static metadata for one operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ShimParameter")]
pub struct ParamDecl {
    /// Parameter name, unique within an operation.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Declared type.
    pub ty: ParamType,
    /// Whether the caller must supply a value.
    pub required: bool,
}

impl ParamDecl {
    /// Creates a declaration.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<ParamLocation>,
        ty: ParamType,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            ty,
            required,
        }
    }
}

/// A binary upload attached to a form parameter.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct FilePart {
    /// File name reported to the server.
    pub file_name: Option<String>,
    /// MIME type of the content.
    pub content_type: Option<String>,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Wraps raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    /// Sets the reported file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The caller-supplied runtime value for one declaration.
///
/// `Absent` is the "no value" marker. It is distinct from `Json("")`,
/// `Json(0)` and every other empty-looking value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamValue {
    /// No value was supplied.
    #[default]
    Absent,
    /// A scalar, sequence or nested structure.
    Json(JsonValue),
    /// A binary upload.
    File(FilePart),
}

impl ParamValue {
    /// True for the "no value" marker and for JSON `null`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent | Self::Json(JsonValue::Null))
    }

    /// True when the value is a JSON sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Json(JsonValue::Array(_)))
    }

    /// Borrows the JSON payload, if any.
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

impl From<JsonValue> for ParamValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<FilePart> for ParamValue {
    fn from(part: FilePart) -> Self {
        Self::File(part)
    }
}

/// Renders a JSON value as the text placed in a URL or CSV list.
///
/// Strings are used verbatim (no quotes); containers fall back to JSON text.
pub fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Strips a JSON pointer prefix such as `#/definitions/` from a model reference.
pub fn model_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// A local shim for type descriptors (`type`, `$ref`, `items`).
///
/// Shared by parameter objects, array items, body schemas and model properties.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ShimTypeRef {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub items: Option<Box<ShimTypeRef>>,
}

impl ShimTypeRef {
    /// Resolves the descriptor into a `ParamType`.
    ///
    /// A missing type defaults to `string`.
    pub(crate) fn resolve(&self, context: &str) -> Result<ParamType, String> {
        if let Some(reference) = &self.reference {
            return Ok(ParamType::Complex(model_name(reference).to_string()));
        }
        match self.schema_type.as_deref() {
            None => Ok(ParamType::Primitive(PrimitiveType::String)),
            Some("array") => {
                let items = self
                    .items
                    .as_ref()
                    .ok_or_else(|| format!("Array type for '{}' is missing 'items'", context))?;
                Ok(ParamType::array_of(items.resolve(context)?))
            }
            Some("file") | Some("File") => Ok(ParamType::File),
            Some(name) => Ok(PrimitiveType::from_name(name)
                .map(ParamType::Primitive)
                .unwrap_or_else(|| ParamType::Complex(name.to_string()))),
        }
    }
}

/// A local shim for Swagger parameter objects.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ShimParameter {
    name: String,
    /// `in` (Swagger 2.0) or `paramType` (Swagger 1.2).
    #[serde(rename = "in", alias = "paramType")]
    location: String,
    #[serde(flatten)]
    descriptor: ShimTypeRef,
    /// Swagger 2.0 body schema.
    schema: Option<ShimTypeRef>,
    #[serde(default)]
    required: bool,
}

impl TryFrom<ShimParameter> for ParamDecl {
    type Error = String;

    fn try_from(shim: ShimParameter) -> Result<Self, Self::Error> {
        if shim.name.is_empty() {
            return Err("Parameter name must not be empty".to_string());
        }
        let ty = match (&shim.schema, &shim.descriptor) {
            (Some(schema), d) if d.schema_type.is_none() && d.reference.is_none() => {
                schema.resolve(&shim.name)?
            }
            (_, descriptor) => descriptor.resolve(&shim.name)?,
        };
        Ok(ParamDecl {
            location: ParamLocation::from(shim.location),
            name: shim.name,
            ty,
            required: shim.required,
        })
    }
}
