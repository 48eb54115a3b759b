//! Text rendering of request and response heads.

use reqwest::header::{HeaderMap, HOST};
use reqwest::{Method, StatusCode, Url, Version};

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

fn write_headers(out: &mut Vec<u8>, headers: &HeaderMap) {
    for (name, value) in headers {
        out.extend_from_slice(name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
}

/// `METHOD /path?query HTTP/x.y`, a `Host` line, then the headers.
pub fn request_head(
    method: &Method,
    url: &Url,
    version: Version,
    headers: &HeaderMap,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(256);
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    let request_line = format!("{} {} {}\r\n", method, target, version_str(version));
    out.extend_from_slice(request_line.as_bytes());

    if !headers.contains_key(HOST) {
        if let Some(host) = url.host_str() {
            let line = match url.port() {
                Some(port) => format!("Host: {host}:{port}\r\n"),
                None => format!("Host: {host}\r\n"),
            };
            out.extend_from_slice(line.as_bytes());
        }
    }
    write_headers(&mut out, headers);
    out
}

/// `HTTP/x.y CODE Reason`, then the headers.
pub fn response_head(version: Version, status: StatusCode, headers: &HeaderMap) -> Vec<u8> {
    let mut out = Vec::with_capacity(256);
    let status_line = match status.canonical_reason() {
        Some(reason) => format!("{} {} {}\r\n", version_str(version), status.as_u16(), reason),
        None => format!("{} {}\r\n", version_str(version), status.as_u16()),
    };
    out.extend_from_slice(status_line.as_bytes());
    write_headers(&mut out, headers);
    out
}

/// Body bytes followed by a line break separating it from the next record.
pub fn body(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.extend_from_slice(bytes);
    out.extend_from_slice(b"\r\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn request_head_includes_target_and_host() {
        let url = Url::parse("http://example.com:8080/items?page=2").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-env", HeaderValue::from_static("prod"));

        let head = request_head(&Method::GET, &url, Version::HTTP_11, &headers);
        assert_eq!(
            String::from_utf8(head).unwrap(),
            "GET /items?page=2 HTTP/1.1\r\nHost: example.com:8080\r\nx-env: prod\r\n\r\n"
        );
    }

    #[test]
    fn explicit_host_header_is_not_duplicated() {
        let url = Url::parse("https://example.com/").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("override.test"));

        let head = request_head(&Method::POST, &url, Version::HTTP_11, &headers);
        let head = String::from_utf8(head).unwrap();
        assert_eq!(head.matches("host").count() + head.matches("Host").count(), 1);
        assert!(head.starts_with("POST / HTTP/1.1\r\n"));
    }

    #[test]
    fn response_head_has_status_line() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("5"));
        let head = response_head(Version::HTTP_2, StatusCode::NOT_FOUND, &headers);
        assert_eq!(
            String::from_utf8(head).unwrap(),
            "HTTP/2.0 404 Not Found\r\ncontent-length: 5\r\n\r\n"
        );
    }

    #[test]
    fn body_is_terminated() {
        assert_eq!(body(b"hello"), b"hello\r\n");
    }
}
