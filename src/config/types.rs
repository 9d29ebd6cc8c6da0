//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::DEFAULT_MAX_REDIRECTS;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options for issuing a single logical request.
///
/// # Examples
///
/// ```bash
/// # Follow redirects and cap the body at 1 MiB
/// hoprequest https://example.com -L --max-response 1048576
///
/// # POST JSON to a server listening on a Unix socket
/// hoprequest /api/login -X POST --socket-path /tmp/app.sock --json -d '{"user":"a"}'
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hoprequest",
    about = "Issue one HTTP(S) request, following redirects safely"
)]
pub struct Opt {
    /// Absolute URL, or a `/`-path when used with --socket-path
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Treat --data as a JSON document instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Extra request header, as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Extra query parameter, as `name=value` (repeatable)
    #[arg(short, long = "query")]
    pub query: Vec<String>,

    /// Local socket to send `/`-path requests to
    #[arg(long)]
    pub socket_path: Option<PathBuf>,

    /// Follow 3xx responses
    #[arg(short = 'L', long)]
    pub follow_redirect: bool,

    /// Maximum number of redirect hops
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Timeout in milliseconds for headers and for the body read
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Maximum response body size in bytes
    #[arg(long)]
    pub max_response: Option<usize>,

    /// Print non-2xx responses instead of failing
    #[arg(long)]
    pub disable_throw: bool,

    /// Accept any TLS certificate
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Do not send the default User-Agent header
    #[arg(long)]
    pub no_user_agent: bool,

    /// Print response headers before the body
    #[arg(short = 'i', long)]
    pub include: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}
