//! Logger initialization.
//!
//! Sets up `env_logger` with a coloured plain format or JSON lines.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate only.
/// The quiet defaults for hyper and rustls apply only when `RUST_LOG` is
/// unset, so `RUST_LOG=hyper=trace` still works alongside `--log-level debug`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug hoprequest http://localhost:8080/hello
/// hoprequest http://localhost:8080/hello --log-level debug --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = rust_log
        .as_deref()
        .filter(|directives| !directives.trim().is_empty());

    if directives.is_none() {
        builder.filter_level(level);
    }
    for (module, filter) in dependency_filters(directives) {
        builder.filter_module(module, *filter);
    }
    builder.filter_module("hoprequest", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(|buf, record| {
                let level = record.level();
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    level_marker(level),
                    record.target().cyan(),
                    colored_level(level),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Default levels for noisy dependencies, skipped when `RUST_LOG` is set.
fn dependency_filters(rust_log: Option<&str>) -> &'static [(&'static str, LevelFilter)] {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => &[],
        _ => &[
            ("hyper", LevelFilter::Info),
            ("hyper_util", LevelFilter::Info),
            ("rustls", LevelFilter::Warn),
        ],
    }
}

fn json_line(timestamp_ms: i64, level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": timestamp_ms,
        "level": level.to_string(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

fn colored_level(level: Level) -> ColoredString {
    match level {
        Level::Error => level.to_string().red(),
        Level::Warn => level.to_string().yellow(),
        Level::Info => level.to_string().green(),
        Level::Debug => level.to_string().blue(),
        Level::Trace => level.to_string().purple(),
    }
}

fn level_marker(level: Level) -> &'static str {
    match level {
        Level::Error => "❌",
        Level::Warn => "⚠️",
        Level::Info => "✔️",
        Level::Debug => "🔍",
        Level::Trace => "🔬",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(1_700_000_000_000, Level::Debug, "hoprequest::fetch", "say \"hi\"");
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "DEBUG");
        assert_eq!(parsed["target"], "hoprequest::fetch");
        assert_eq!(parsed["msg"], "say \"hi\"");
    }

    #[test]
    fn test_dependency_filters_yield_to_rust_log() {
        assert!(dependency_filters(Some("hyper=trace")).is_empty());
        assert!(dependency_filters(Some("rustls=debug,hoprequest=info")).is_empty());

        let defaults = dependency_filters(None);
        assert!(defaults.contains(&("hyper", LevelFilter::Info)));
        assert!(defaults.contains(&("rustls", LevelFilter::Warn)));
        assert_eq!(dependency_filters(Some("  ")), defaults);
    }

    #[test]
    fn test_level_marker_distinct() {
        let markers: std::collections::HashSet<_> = [
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ]
        .into_iter()
        .map(level_marker)
        .collect();
        assert_eq!(markers.len(), 5);
    }

    #[test]
    fn test_second_init_fails_gracefully() {
        // Only one logger per process; whichever call comes second must error, not panic.
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(first.is_err() || second.is_err());
    }
}
