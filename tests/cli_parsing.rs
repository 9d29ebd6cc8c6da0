//! Tests for CLI parsing and its conversion into request options.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hoprequest::app::build_request_options;
use hoprequest::config::{LogFormat, LogLevel, Opt, DEFAULT_MAX_REDIRECTS};
use hoprequest::RequestBody;

#[test]
fn test_cli_minimal_parsing() {
    let opt = Opt::try_parse_from(["hoprequest", "https://example.com/"])
        .expect("Should parse a bare URL");

    assert_eq!(opt.url, "https://example.com/");
    // LogLevel and LogFormat don't implement PartialEq, so we compare via conversion
    assert_eq!(
        log::LevelFilter::from(opt.log_level.clone()),
        log::LevelFilter::from(LogLevel::Warn)
    );
    match opt.log_format {
        LogFormat::Plain => {}
        _ => panic!("Should be Plain format"),
    }
    assert_eq!(opt.max_redirects, DEFAULT_MAX_REDIRECTS);
    assert!(!opt.include);
}

#[test]
fn test_cli_socket_post() {
    let args = vec![
        "hoprequest",
        "/api/login",
        "--socket-path",
        "/tmp/app.sock",
        "-X",
        "POST",
        "--json",
        "-d",
        r#"{"userName":"hello"}"#,
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ];
    let opt = Opt::try_parse_from(args).expect("Should parse socket POST");
    assert_eq!(opt.socket_path, Some(PathBuf::from("/tmp/app.sock")));
    assert_eq!(
        log::LevelFilter::from(opt.log_level.clone()),
        log::LevelFilter::Debug
    );
    match opt.log_format {
        LogFormat::Json => {}
        _ => panic!("Should be Json format"),
    }

    let options = build_request_options(&opt).expect("Should build options");
    assert_eq!(options.url, "/api/login");
    assert_eq!(options.method, http::Method::POST);
    assert_eq!(
        options.data,
        Some(RequestBody::Json(serde_json::json!({ "userName": "hello" })))
    );
}

#[test]
fn test_cli_redirect_and_limits() {
    let opt = Opt::try_parse_from([
        "hoprequest",
        "http://localhost:8080/redirect",
        "-L",
        "--max-redirects",
        "2",
        "--timeout-ms",
        "250",
        "--max-response",
        "1024",
        "--disable-throw",
        "-i",
    ])
    .expect("Should parse limits");

    let options = build_request_options(&opt).expect("Should build options");
    assert!(options.follow_redirect);
    assert_eq!(options.max_redirects, 2);
    assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    assert_eq!(options.max_response, Some(1024));
    assert!(options.disable_throw);
    assert!(opt.include);
}

#[test]
fn test_cli_rejects_invalid_log_level() {
    let result = Opt::try_parse_from(["hoprequest", "http://localhost/", "--log-level", "loud"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_requires_url() {
    assert!(Opt::try_parse_from(["hoprequest"]).is_err());
}

#[test]
fn test_cli_invalid_method() {
    let opt = Opt::try_parse_from(["hoprequest", "http://localhost/", "-X", "BAD METHOD"])
        .expect("clap accepts any method string");
    assert!(build_request_options(&opt).is_err());
}
