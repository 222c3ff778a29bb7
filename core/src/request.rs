#![deny(missing_docs)]

//! # Wire Request
//!
//! The in-progress HTTP request assembled from an operation's parameters.
//!
//! The payload is a single tagged slot: it is either a raw body or form data,
//! never both. Whichever region a parameter touches first claims the slot for
//! the rest of the request.

use crate::error::{AppError, AppResult};
use crate::params::{value_text, FilePart};
use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value as JsonValue;
use url::Url;

/// MIME type used for serialized model bodies.
pub const APP_JSON: &str = "application/json";

/// Characters escaped when substituting a value into a URL path segment.
///
/// `,` is kept literal so comma-joined arrays survive substitution.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Form fields and file attachments. Each map is created on first use.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormData {
    /// Scalar form fields.
    pub fields: Option<IndexMap<String, JsonValue>>,
    /// File attachments.
    pub files: Option<IndexMap<String, FilePart>>,
}

/// What the request carries besides URL, query and headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestPayload {
    /// Nothing set yet.
    #[default]
    Empty,
    /// A raw body.
    Body(String),
    /// Form data (urlencoded or multipart).
    Form(FormData),
}

/// A mutable, exclusively owned request under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    method: String,
    url: String,
    query: IndexMap<String, JsonValue>,
    headers: IndexMap<String, String>,
    payload: RequestPayload,
}

impl WireRequest {
    /// Creates an empty request for `method` against a URL template such as `/pets/{petId}`.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
            query: IndexMap::new(),
            headers: IndexMap::new(),
            payload: RequestPayload::Empty,
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The URL with every substitution applied so far.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters, to be encoded by the transport.
    pub fn query(&self) -> &IndexMap<String, JsonValue> {
        &self.query
    }

    /// Request headers.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The payload slot.
    pub fn payload(&self) -> &RequestPayload {
        &self.payload
    }

    /// The raw body, if the payload is a body.
    pub fn body(&self) -> Option<&str> {
        match &self.payload {
            RequestPayload::Body(body) => Some(body),
            _ => None,
        }
    }

    /// Form fields, if any were set.
    pub fn form_fields(&self) -> Option<&IndexMap<String, JsonValue>> {
        match &self.payload {
            RequestPayload::Form(form) => form.fields.as_ref(),
            _ => None,
        }
    }

    /// File attachments, if any were set.
    pub fn files(&self) -> Option<&IndexMap<String, FilePart>> {
        match &self.payload {
            RequestPayload::Form(form) => form.files.as_ref(),
            _ => None,
        }
    }

    /// Replaces every `{name}` placeholder with the percent-encoded `text`.
    ///
    /// A placeholder that was already substituted is simply not found again.
    /// The dot segments `.` and `..` are escaped whole.
    pub fn substitute_path(&mut self, name: &str, text: &str) {
        let token = format!("{{{}}}", name);
        if self.url.contains(&token) {
            let encoded = match text {
                "." | ".." => text.replace('.', "%2E"),
                _ => utf8_percent_encode(text, PATH_SEGMENT).to_string(),
            };
            self.url = self.url.replace(&token, &encoded);
        }
    }

    /// Sets a query parameter, overwriting any previous value for `name`.
    pub fn set_query(&mut self, name: impl Into<String>, value: JsonValue) {
        self.query.insert(name.into(), value);
    }

    /// Sets a header, overwriting any previous value for `name`.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Sets the raw body.
    ///
    /// Fails if form data was already attached.
    pub fn set_body(&mut self, body: String) -> AppResult<()> {
        if let RequestPayload::Form(_) = self.payload {
            return Err(AppError::PayloadConflict(
                "cannot set a body on a request that already carries form data".into(),
            ));
        }
        self.payload = RequestPayload::Body(body);
        Ok(())
    }

    /// Sets a scalar form field.
    ///
    /// Fails if a body was already set.
    pub fn set_form_field(&mut self, name: impl Into<String>, value: JsonValue) -> AppResult<()> {
        self.form_mut()?
            .fields
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value);
        Ok(())
    }

    /// Attaches a file.
    ///
    /// Fails if a body was already set.
    pub fn set_file(&mut self, name: impl Into<String>, part: FilePart) -> AppResult<()> {
        self.form_mut()?
            .files
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), part);
        Ok(())
    }

    fn form_mut(&mut self) -> AppResult<&mut FormData> {
        if let RequestPayload::Empty = self.payload {
            self.payload = RequestPayload::Form(FormData::default());
        }
        match &mut self.payload {
            RequestPayload::Form(form) => Ok(form),
            _ => Err(AppError::PayloadConflict(
                "cannot add form data to a request that already carries a body".into(),
            )),
        }
    }

    /// Returns every `{name}` token still present in the URL.
    pub fn unresolved_placeholders(&self) -> Vec<String> {
        let mut found = Vec::new();
        let mut rest = self.url.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    found.push(after[..end].to_string());
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        found
    }

    /// Flattens the query mapping into textual pairs.
    ///
    /// Sequence values expand into one pair per element under the same key.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.query.len());
        for (key, value) in &self.query {
            match value {
                JsonValue::Array(items) => {
                    pairs.extend(items.iter().map(|item| (key.clone(), value_text(item))));
                }
                other => pairs.push((key.clone(), value_text(other))),
            }
        }
        pairs
    }

    /// Appends the URL's path segments to `base` and adds the encoded query string.
    ///
    /// The path of `base` is kept whether or not it ends in `/`. Segments are
    /// never resolved as relative references, so a substituted value cannot
    /// change the host or climb out of the base path. A segment that decodes
    /// to `.` or `..` is rejected.
    pub fn encoded_url(&self, base: &str) -> AppResult<Url> {
        let mut url = Url::parse(base)?;
        let segments = self
            .url
            .trim_start_matches('/')
            .split('/')
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
            .collect::<Vec<_>>();
        if let Some(dot) = segments.iter().find(|s| matches!(s.as_str(), "." | "..")) {
            return Err(AppError::InvalidPathSegment(format!(
                "'{}' in {} would be normalized away",
                dot, self.url
            )));
        }

        url.path_segments_mut()
            .map_err(|_| AppError::General(format!("Base URL cannot carry a path: {}", base)))?
            .pop_if_empty()
            .extend(&segments);

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_uppercases_method() {
        let req = WireRequest::new("get", "/pets");
        assert_eq!(req.method(), "GET");
        assert_eq!(req.payload(), &RequestPayload::Empty);
        assert!(req.body().is_none());
        assert!(req.form_fields().is_none());
        assert!(req.files().is_none());
    }

    #[test]
    fn test_substitute_path_encodes_segment() {
        let mut req = WireRequest::new("GET", "/files/{path}/meta/{path}");
        req.substitute_path("path", "a b/c?");
        assert_eq!(req.url(), "/files/a%20b%2Fc%3F/meta/a%20b%2Fc%3F");
    }

    #[test]
    fn test_substitute_path_keeps_commas_and_utf8() {
        let mut req = WireRequest::new("GET", "/tags/{ids}/{name}");
        req.substitute_path("ids", "a,b,c");
        req.substitute_path("name", "café");
        assert_eq!(req.url(), "/tags/a,b,c/caf%C3%A9");
    }

    #[test]
    fn test_substitute_path_twice_is_noop() {
        let mut req = WireRequest::new("GET", "/pets/{petId}");
        req.substitute_path("petId", "1");
        req.substitute_path("petId", "2");
        assert_eq!(req.url(), "/pets/1");
    }

    #[test]
    fn test_body_then_form_conflicts() {
        let mut req = WireRequest::new("POST", "/pets");
        req.set_body("{}".into()).unwrap();
        let err = req.set_form_field("name", json!("Rex")).unwrap_err();
        assert!(matches!(err, AppError::PayloadConflict(_)));
        let err = req.set_file("img", FilePart::new(vec![1])).unwrap_err();
        assert!(matches!(err, AppError::PayloadConflict(_)));
        assert_eq!(req.body(), Some("{}"));
    }

    #[test]
    fn test_form_then_body_conflicts() {
        let mut req = WireRequest::new("POST", "/pets");
        req.set_form_field("name", json!("Rex")).unwrap();
        assert!(matches!(
            req.set_body("x".into()),
            Err(AppError::PayloadConflict(_))
        ));
        assert!(req.body().is_none());
    }

    #[test]
    fn test_form_maps_are_lazy() {
        let mut req = WireRequest::new("POST", "/upload");
        req.set_file("doc", FilePart::new(b"pdf".to_vec())).unwrap();
        assert!(req.form_fields().is_none());
        assert_eq!(req.files().unwrap().len(), 1);

        req.set_form_field("title", json!("Report")).unwrap();
        assert_eq!(req.form_fields().unwrap().get("title"), Some(&json!("Report")));
    }

    #[test]
    fn test_unresolved_placeholders() {
        let mut req = WireRequest::new("GET", "/a/{x}/b/{y}");
        req.substitute_path("x", "1");
        assert_eq!(req.unresolved_placeholders(), vec!["y".to_string()]);
    }

    #[test]
    fn test_query_pairs_and_encoded_url() {
        let mut req = WireRequest::new("GET", "/pets/{petId}");
        req.substitute_path("petId", "7");
        req.set_query("tags", json!(["a b", "c"]));
        req.set_query("limit", json!(10));

        assert_eq!(
            req.query_pairs(),
            vec![
                ("tags".to_string(), "a b".to_string()),
                ("tags".to_string(), "c".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );

        let url = req.encoded_url("https://api.example.com/v1/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/pets/7?tags=a+b&tags=c&limit=10"
        );
    }

    #[test]
    fn test_encoded_url_keeps_base_path_without_trailing_slash() {
        let mut req = WireRequest::new("GET", "/pets/{petId}");
        req.substitute_path("petId", "7");
        let url = req.encoded_url("https://api.example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/pets/7");
    }

    #[test]
    fn test_encoded_url_colon_value_keeps_host() {
        let mut req = WireRequest::new("GET", "/{ns}/items");
        req.substitute_path("ns", "urn:x");
        assert_eq!(req.url(), "/urn%3Ax/items");
        let url = req.encoded_url("https://api.example.com/v1/").unwrap();
        assert_eq!(url.host_str(), Some("api.example.com"));
        assert_eq!(url.path(), "/v1/urn:x/items");
    }

    #[test]
    fn test_dot_segment_values_are_rejected() {
        let mut req = WireRequest::new("GET", "/files/{name}/meta");
        req.substitute_path("name", "..");
        assert_eq!(req.url(), "/files/%2E%2E/meta");
        let err = req.encoded_url("https://api.example.com/v1/").unwrap_err();
        assert!(matches!(err, AppError::InvalidPathSegment(_)));

        let mut req = WireRequest::new("GET", "/files/{name}");
        req.substitute_path("name", "..hidden");
        let url = req.encoded_url("https://api.example.com/v1").unwrap();
        assert_eq!(url.path(), "/v1/files/..hidden");
    }

    #[test]
    fn test_encoded_url_rejects_relative_base() {
        let req = WireRequest::new("GET", "/pets");
        let err = req.encoded_url("not a url").unwrap_err();
        assert!(matches!(err, AppError::Url(_)));
    }
}
