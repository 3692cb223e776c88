use std::collections::HashMap;

use super::request_executor::{build_headers, build_url, DEFAULT_USER_AGENT};

#[test]
fn test_build_url() {
    let base_url = "https://cloudcode-pa.googleapis.com/v1internal";

    let url1 = build_url(base_url, "generateContent", None);
    assert_eq!(url1, "https://cloudcode-pa.googleapis.com/v1internal:generateContent");

    let url2 = build_url(base_url, "streamGenerateContent", Some("alt=sse"));
    assert_eq!(
        url2,
        "https://cloudcode-pa.googleapis.com/v1internal:streamGenerateContent?alt=sse"
    );

    let url3 = build_url(base_url, "streamGenerateContent", Some("?alt=sse"));
    assert_eq!(url3, url2);

    let url4 = build_url(base_url, "countTokens", Some(""));
    assert_eq!(url4, "https://cloudcode-pa.googleapis.com/v1internal:countTokens");
}

#[test]
fn test_build_headers() {
    let mut extra = HashMap::new();
    extra.insert("x-goog-user-project".to_string(), "proj".to_string());

    let headers = build_headers("tok-123", &extra).unwrap();
    assert_eq!(headers["authorization"], "Bearer tok-123");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["user-agent"], DEFAULT_USER_AGENT);
    assert_eq!(headers["x-goog-user-project"], "proj");
}

#[test]
fn test_invalid_token_is_credential_error() {
    let err = build_headers("bad\ntoken", &HashMap::new()).unwrap_err();
    assert!(matches!(err, gravitate_types::ProxyError::Credentials { .. }));
}
