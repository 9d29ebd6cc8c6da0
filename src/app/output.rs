//! Terminal rendering of results.

use http::HeaderMap;

use crate::body::ResponseData;
use crate::error_handling::Error;
use crate::fetch::Response;

/// Renders a response body, optionally preceded by status, chain and headers.
pub fn render_response(response: &Response, include_headers: bool) -> String {
    let mut out = String::new();
    if include_headers {
        out.push_str(&status_line(response.status));
        for location in &response.locations {
            out.push_str(&format!("> {location}\n"));
        }
        out.push_str(&header_lines(&response.headers));
        out.push('\n');
    }
    out.push_str(&render_data(&response.data));
    out
}

/// Renders a failure: its stable name and message, the redirect chain and,
/// for status failures, the response body.
pub fn render_error(error: &Error) -> String {
    let mut out = format!("{}: {}\n", error.error_type().name(), error);
    out.push_str(&format!("url: {}\n", error.url()));
    if let Some(redirected) = error.redirected_url() {
        out.push_str(&format!("redirected url: {redirected}\n"));
    }
    for location in error.locations() {
        out.push_str(&format!("> {location}\n"));
    }
    if let Some(response) = error.response() {
        let body = render_data(&response.data);
        if !body.is_empty() {
            out.push_str(&body);
            if !body.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

fn status_line(status: http::StatusCode) -> String {
    format!(
        "{} {}\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
}

fn header_lines(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            format!(
                "{}: {}\n",
                name,
                value.to_str().unwrap_or("<non-utf8 value>")
            )
        })
        .collect()
}

fn render_data(data: &ResponseData) -> String {
    match data {
        ResponseData::Json(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        ResponseData::Text(text) => text.clone(),
        ResponseData::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
