//! Response header sanitizing for re-framed upstream bodies.

use axum::http::{header, HeaderMap};

/// Copy upstream headers, dropping the framing ones a re-encoded body invalidates.
pub fn sanitize_upstream_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = upstream.clone();
    headers.remove(header::CONTENT_ENCODING);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_strips_encoding_and_length() {
        let mut upstream = HeaderMap::new();
        upstream.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        upstream.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        upstream.insert("retry-after", HeaderValue::from_static("3"));

        let cleaned = sanitize_upstream_headers(&upstream);
        assert!(cleaned.get(header::CONTENT_ENCODING).is_none());
        assert!(cleaned.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(cleaned.get(header::CONTENT_TYPE).map(|v| v.as_bytes()), Some(&b"application/json"[..]));
        assert_eq!(cleaned.get("retry-after").map(|v| v.as_bytes()), Some(&b"3"[..]));
    }
}
