// Location resolver tests.

use std::path::Path;

use super::*;

fn extra(pairs: &[(&str, QueryValue)]) -> Vec<(String, QueryValue)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_parse_absolute_url() {
    let location = parse_location("http://localhost:6363/hello?format=txt&otherQ=1", &[], None)
        .expect("absolute url should parse");
    assert_eq!(location.protocol, "http:");
    assert_eq!(location.hostname.as_deref(), Some("localhost"));
    assert_eq!(location.port, Some(6363));
    assert_eq!(location.pathname, "/hello");
    assert_eq!(location.query, "format=txt&otherQ=1");
    assert_eq!(location.hash, "");
    assert_eq!(location.url, "http://localhost:6363/hello?format=txt&otherQ=1");
    assert!(location.socket_path.is_none());
    assert!(!location.is_local_socket());
}

#[test]
fn test_parse_default_port_is_none() {
    let location = parse_location("https://example.com/", &[], None).unwrap();
    assert_eq!(location.protocol, "https:");
    assert_eq!(location.port, None);
    assert_eq!(location.origin().as_deref(), Some("https://example.com"));
}

#[test]
fn test_parse_keeps_fragment_out_of_request_line() {
    let location = parse_location(
        "http://localhost:6363/hello?otherQ=1#hashs",
        &extra(&[("format", "txt".into())]),
        None,
    )
    .unwrap();
    assert_eq!(location.hash, "#hashs");
    assert_eq!(location.path_and_query(), "/hello?otherQ=1&format=txt");
    assert_eq!(location.url, "http://localhost:6363/hello?otherQ=1#hashs");
}

#[test]
fn test_parse_socket_path() {
    let socket = Path::new("/tmp/socket.2222");
    let location = parse_location("/hello?format=txt&otherQ=1", &[], Some(socket)).unwrap();
    assert_eq!(location.protocol, "http:");
    assert!(location.hostname.is_none());
    assert_eq!(location.port, None);
    assert_eq!(location.socket_path.as_deref(), Some(socket));
    assert_eq!(location.url, "/hello?format=txt&otherQ=1");
    assert_eq!(location.path_and_query(), "/hello?format=txt&otherQ=1");
    assert!(location.is_local_socket());
    assert!(location.origin().is_none());
}

#[test]
fn test_parse_path_without_socket_has_no_target() {
    let location = parse_location("/hey", &[], None).unwrap();
    assert!(location.hostname.is_none());
    assert!(location.socket_path.is_none());
}

#[test]
fn test_parse_relative_path_is_invalid() {
    for input in ["anyurl", "hello/world", "", "../up"] {
        let err = parse_location(input, &[], None).unwrap_err();
        assert!(
            matches!(err, RequestError::InvalidLocation { ref url } if url == input),
            "{input:?} should be an invalid location"
        );
        assert_eq!(err.to_string(), format!("Bad url {input}"));
    }
}

#[test]
fn test_parse_unknown_scheme_keeps_protocol() {
    let location = parse_location("ftp://files.example.com/a", &[], None).unwrap();
    assert_eq!(location.protocol, "ftp:");
    assert_eq!(location.hostname.as_deref(), Some("files.example.com"));
}

#[test]
fn test_merge_query_sets_new_keys() {
    let merged = merge_query(
        None,
        &extra(&[("format", "txt".into()), ("otherQ", 1.into())]),
    );
    assert_eq!(merged, "format=txt&otherQ=1");
}

#[test]
fn test_merge_query_appends_to_existing_key() {
    let merged = merge_query(Some("otherQ=1"), &extra(&[("otherQ", 2.into())]));
    assert_eq!(merged, "otherQ=1&otherQ=2");
}

#[test]
fn test_merge_query_lists_keep_order() {
    let merged = merge_query(
        Some("a=0"),
        &extra(&[("a", vec![1, 2].into()), ("b", vec!["x", "y"].into())]),
    );
    assert_eq!(merged, "a=0&a=1&a=2&b=x&b=y");
}

#[test]
fn test_merge_query_encodes_values() {
    let merged = merge_query(None, &extra(&[("q", "a b&c".into())]));
    assert_eq!(merged, "q=a+b%26c");
}

#[test]
fn test_resolving_twice_does_not_duplicate() {
    let query = extra(&[("format", "txt".into()), ("otherQ", "1".into())]);
    let first = parse_location("http://localhost:6363/hello", &query, None).unwrap();
    let second = parse_location(&first.url, &query, None).unwrap();
    assert_eq!(first.query, "format=txt&otherQ=1");
    assert_eq!(second.query, first.query);
}

#[test]
fn test_query_value_from_scalars() {
    assert_eq!(QueryValue::from(true), QueryValue::One("true".to_string()));
    assert_eq!(QueryValue::from(7u16).values(), ["7".to_string()]);
    assert_eq!(
        QueryValue::from(vec![1, 2]).values(),
        ["1".to_string(), "2".to_string()]
    );
}
