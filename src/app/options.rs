//! CLI option conversion.

use std::time::Duration;

use anyhow::{Context, Result};
use http::Method;

use crate::body::RequestBody;
use crate::config::Opt;
use crate::fetch::RequestOptions;

/// Builds [`RequestOptions`] from command-line options.
///
/// Headers are given as `Name: value` and query parameters as `name=value`;
/// both may repeat. With `--json`, `--data` must be a JSON document.
///
/// # Errors
///
/// Returns an error for an invalid method, a malformed header or query
/// parameter, or `--json` data that does not parse.
pub fn build_request_options(opt: &Opt) -> Result<RequestOptions> {
    let method = Method::from_bytes(opt.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid method {:?}", opt.method))?;

    let mut options = RequestOptions::new(opt.url.as_str())
        .method(method)
        .follow_redirect(opt.follow_redirect)
        .max_redirects(opt.max_redirects)
        .disable_throw(opt.disable_throw)
        .reject_unauthorized(!opt.insecure)
        .disable_user_agent(opt.no_user_agent);

    for header in &opt.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("header must look like `Name: value`, got {header:?}"))?;
        options = options
            .try_header(name.trim(), value.trim())
            .with_context(|| format!("invalid header {header:?}"))?;
    }

    for pair in &opt.query {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("query parameter must look like `name=value`, got {pair:?}"))?;
        options = options.query(name, value);
    }

    if let Some(path) = &opt.socket_path {
        options = options.socket_path(path.clone());
    }
    if let Some(ms) = opt.timeout_ms {
        options = options.timeout(Duration::from_millis(ms));
    }
    if let Some(max) = opt.max_response {
        options = options.max_response(max);
    }

    if let Some(data) = &opt.data {
        let body = if opt.json {
            let value: serde_json::Value =
                serde_json::from_str(data).context("--data is not valid JSON")?;
            RequestBody::Json(value)
        } else {
            RequestBody::Text(data.clone())
        };
        options = options.data(body);
    }

    Ok(options)
}
