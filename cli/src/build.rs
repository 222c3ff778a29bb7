#![deny(missing_docs)]

//! # Build Command
//!
//! Populates a request for one operation from a file of arguments and prints
//! the result as JSON. Nothing is sent over the network.

use crate::error::CliResult;
use crate::input::{load_args, load_models, load_operation};
use indexmap::IndexMap;
use parammap_core::{RequestBuilder, WireRequest};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

/// Arguments for the build command.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Operation description (YAML or JSON) with `method`, `path` and `parameters`.
    #[clap(long)]
    pub operation: PathBuf,

    /// Argument values keyed by parameter name. File parameters take a path.
    #[clap(long)]
    pub args: Option<PathBuf>,

    /// Model definitions (`definitions` / `models` section or a bare map).
    #[clap(long)]
    pub models: Option<PathBuf>,

    /// Base URL used to render the full request URL.
    #[clap(long, env = "PARAMMAP_BASE_URL")]
    pub base_url: Option<String>,
}

/// Metadata of an attached file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    /// Reported file name.
    pub file_name: Option<String>,
    /// MIME type.
    pub content_type: Option<String>,
    /// Content length in bytes.
    pub size: usize,
}

/// JSON view of a populated request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSummary {
    /// HTTP method.
    pub method: String,
    /// URL after path substitution.
    pub url: String,
    /// Base URL + path + encoded query, when a base URL was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    /// Query parameters.
    pub query: IndexMap<String, JsonValue>,
    /// Headers.
    pub headers: IndexMap<String, String>,
    /// Raw body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Form fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<IndexMap<String, JsonValue>>,
    /// Attached files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<IndexMap<String, FileSummary>>,
}

impl RequestSummary {
    /// Summarizes `request`, rendering the full URL against `base_url` if given.
    pub fn from_request(request: &WireRequest, base_url: Option<&str>) -> CliResult<Self> {
        let full_url = base_url
            .map(|base| request.encoded_url(base).map(|u| u.to_string()))
            .transpose()?;
        Ok(Self {
            method: request.method().to_string(),
            url: request.url().to_string(),
            full_url,
            query: request.query().clone(),
            headers: request.headers().clone(),
            body: request.body().map(str::to_string),
            form: request.form_fields().cloned(),
            files: request.files().map(|files| {
                files
                    .iter()
                    .map(|(name, part)| {
                        let summary = FileSummary {
                            file_name: part.file_name.clone(),
                            content_type: part.content_type.clone(),
                            size: part.bytes.len(),
                        };
                        (name.clone(), summary)
                    })
                    .collect()
            }),
        })
    }
}

/// Builds the request and returns its summary.
pub fn run(args: &BuildArgs) -> CliResult<RequestSummary> {
    let operation = load_operation(&args.operation)?;
    let models = load_models(args.models.as_deref())?;
    let values = load_args(args.args.as_deref(), &operation)?;

    tracing::info!(method = %operation.method, path = %operation.path, "building request");
    let request = RequestBuilder::new(&models).build(&operation, values)?;
    RequestSummary::from_request(&request, args.base_url.as_deref())
}

/// Executes the build command, printing the summary to stdout.
pub fn execute(args: &BuildArgs) -> CliResult<()> {
    let summary = run(args)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
