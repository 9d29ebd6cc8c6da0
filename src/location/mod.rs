//! URL and redirect-location resolution.
//!
//! Turns a URL, or a `/`-path meant for a local socket, into a
//! [`ResolvedLocation`] and merges the caller's extra query parameters into
//! the query string that goes on the wire.

use std::path::{Path, PathBuf};

use url::form_urlencoded;
use url::Url;

use crate::config::LOCAL_SOCKET_HOST;
use crate::error_handling::RequestError;

/// A query parameter value: a single scalar or a list of scalars.
///
/// Scalars of any `Display` type are stringified on conversion, so
/// `QueryValue::from(1)` and `QueryValue::from("1")` are equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value.
    One(String),
    /// Several values for the same key, in order.
    Many(Vec<String>),
}

impl QueryValue {
    /// Values in insertion order.
    pub fn values(&self) -> &[String] {
        match self {
            QueryValue::One(value) => std::slice::from_ref(value),
            QueryValue::Many(values) => values,
        }
    }
}

macro_rules! query_value_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::One(value.to_string())
                }
            }

            impl From<Vec<$ty>> for QueryValue {
                fn from(values: Vec<$ty>) -> Self {
                    QueryValue::Many(values.into_iter().map(|v| v.to_string()).collect())
                }
            }
        )*
    };
}

query_value_from_scalar!(String, &str, bool, i32, i64, u16, u32, u64, usize, f64);

/// A URL (or socket path) broken into the parts needed to dispatch one attempt.
///
/// Created fresh for every hop. Only `url` is ever rewritten afterwards, when a
/// redirect inherits the previous hop's origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// Scheme including the trailing colon (`http:`, `https:`).
    pub protocol: String,
    /// Host name; `None` for local-socket paths.
    pub hostname: Option<String>,
    /// Explicit port; `None` when the URL uses the scheme default.
    pub port: Option<u16>,
    /// Local socket the request goes to; only set for `/`-paths.
    pub socket_path: Option<PathBuf>,
    /// Percent-encoded path, always starting with `/`.
    pub pathname: String,
    /// Merged query string without the leading `?`; empty when there is none.
    pub query: String,
    /// Fragment including the leading `#`; empty when there is none.
    pub hash: String,
    /// The location as it is recorded in the chain.
    ///
    /// For absolute URLs this is the normalized input URL; for `/`-paths it is
    /// the input string untouched. Extra query parameters are never folded in.
    pub url: String,
}

impl ResolvedLocation {
    /// Path plus merged query, as sent in the request line.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.pathname.clone()
        } else {
            format!("{}?{}", self.pathname, self.query)
        }
    }

    /// True when the attempt must go over the local socket rather than the network.
    pub fn is_local_socket(&self) -> bool {
        self.hostname.is_none() && self.socket_path.is_some()
    }

    /// `{protocol}//{hostname}[:{port}]`, or `None` without a hostname.
    pub fn origin(&self) -> Option<String> {
        let hostname = self.hostname.as_deref()?;
        Some(match self.port {
            Some(port) => format!("{}//{}:{}", self.protocol, hostname, port),
            None => format!("{}//{}", self.protocol, hostname),
        })
    }
}

/// Parses a URL or `/`-path into a [`ResolvedLocation`].
///
/// # Arguments
///
/// * `url` - Absolute URL, or a path starting with `/`
/// * `extra_query` - Parameters merged into the URL's own query
/// * `socket_path` - Local socket attached to `/`-paths
///
/// # Errors
///
/// Returns [`RequestError::InvalidLocation`] when `url` is neither an absolute
/// URL nor a `/`-path.
pub fn parse_location(
    url: &str,
    extra_query: &[(String, QueryValue)],
    socket_path: Option<&Path>,
) -> Result<ResolvedLocation, RequestError> {
    match Url::parse(url) {
        Ok(parsed) => Ok(resolve(&parsed, extra_query, None)),
        Err(_) if url.starts_with('/') => {
            let synthetic = format!("http://{}{}", LOCAL_SOCKET_HOST, url);
            let parsed = Url::parse(&synthetic).map_err(|_| RequestError::InvalidLocation {
                url: url.to_string(),
            })?;
            let mut location = resolve(&parsed, extra_query, Some(url));
            location.socket_path = socket_path.map(Path::to_path_buf);
            Ok(location)
        }
        Err(_) => Err(RequestError::InvalidLocation {
            url: url.to_string(),
        }),
    }
}

fn resolve(
    parsed: &Url,
    extra_query: &[(String, QueryValue)],
    socket_original: Option<&str>,
) -> ResolvedLocation {
    let query = merge_query(parsed.query(), extra_query);
    let hash = match parsed.fragment() {
        Some(fragment) if !fragment.is_empty() => format!("#{fragment}"),
        _ => String::new(),
    };

    match socket_original {
        Some(original) => ResolvedLocation {
            protocol: "http:".to_string(),
            hostname: None,
            port: None,
            socket_path: None,
            pathname: parsed.path().to_string(),
            query,
            hash,
            url: original.to_string(),
        },
        None => ResolvedLocation {
            protocol: format!("{}:", parsed.scheme()),
            hostname: parsed
                .host_str()
                .filter(|host| !host.is_empty())
                .map(str::to_string),
            port: parsed.port(),
            socket_path: None,
            pathname: parsed.path().to_string(),
            query,
            hash,
            url: parsed.to_string(),
        },
    }
}

/// Merges extra parameters into an existing query string.
///
/// A key that is not yet present is set; a key that already exists keeps its
/// values and gains the new ones after them. Repeated values keep the order in
/// which they were added. The result is `application/x-www-form-urlencoded`
/// without a leading `?`.
pub fn merge_query(base: Option<&str>, extra_query: &[(String, QueryValue)]) -> String {
    let mut pairs: Vec<(String, String)> = base
        .map(|query| {
            form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    for (key, value) in extra_query {
        for item in value.values() {
            pairs.push((key.clone(), item.clone()));
        }
    }

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

#[cfg(test)]
mod tests;
