//! Per-call request builder.
//!
//! # Responsibilities
//! - Start from a snapshot of the client's common headers, protocol version,
//!   timeout and transport handle
//! - Collect method, URL, extra headers and body
//! - Convert into a `reqwest::Request` and run it through the transport
//!
//! # Design Decisions
//! - Builder errors (bad JSON, bad header) are kept and reported by `send`,
//!   so chains stay infallible
//! - Headers are applied in insertion order with case-insensitive
//!   replacement, so request-level headers override common ones

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url, Version};
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::http::Response;
use crate::transport::TransportHandle;

/// A request being assembled. Obtained from [`Client::r`](crate::Client::r).
#[derive(Debug)]
pub struct Request {
    transport: TransportHandle,
    method: Method,
    url: Option<String>,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
    version: Version,
    timeout: Option<Duration>,
    error: Option<ClientError>,
}

impl Request {
    pub(crate) fn new(
        transport: TransportHandle,
        headers: Vec<(String, String)>,
        version: Version,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            method: Method::GET,
            url: None,
            headers,
            body: None,
            version,
            timeout,
            error: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the method from its name, e.g. `"PROPFIND"`.
    pub fn method_name(mut self, method: &str) -> Self {
        match Method::from_bytes(method.to_ascii_uppercase().as_bytes()) {
            Ok(m) => self.method = m,
            Err(_) => self.error = Some(ClientError::InvalidMethod(method.to_string())),
        }
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn get(self, url: impl Into<String>) -> Self {
        self.method(Method::GET).url(url)
    }

    pub fn post(self, url: impl Into<String>) -> Self {
        self.method(Method::POST).url(url)
    }

    pub fn put(self, url: impl Into<String>) -> Self {
        self.method(Method::PUT).url(url)
    }

    pub fn patch(self, url: impl Into<String>) -> Self {
        self.method(Method::PATCH).url(url)
    }

    pub fn delete(self, url: impl Into<String>) -> Self {
        self.method(Method::DELETE).url(url)
    }

    pub fn head(self, url: impl Into<String>) -> Self {
        self.method(Method::HEAD).url(url)
    }

    /// Set a header for this request only, replacing any common header of
    /// the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the body and default the content type to JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                if self.header_value(CONTENT_TYPE.as_str()).is_none() {
                    self.headers.push((
                        CONTENT_TYPE.as_str().to_string(),
                        "application/json".to_string(),
                    ));
                }
                self.body = Some(Bytes::from(bytes));
            }
            Err(e) => self.error = Some(ClientError::Json(e)),
        }
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Override the client timeout. `Duration::ZERO` disables it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Effective value of `name`, matching case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn protocol_version(&self) -> Version {
        self.version
    }

    pub fn timeout_value(&self) -> Option<Duration> {
        self.timeout
    }

    fn build(self) -> ClientResult<(TransportHandle, reqwest::Request)> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let raw = self.url.ok_or(ClientError::MissingUrl)?;
        let url = Url::parse(&raw)?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let invalid = |reason: String| ClientError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid(e.to_string()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(header_name, header_value);
        }

        let mut request = reqwest::Request::new(self.method, url);
        *request.headers_mut() = headers;
        *request.version_mut() = self.version;
        *request.timeout_mut() = self.timeout;
        if let Some(body) = self.body {
            *request.body_mut() = Some(reqwest::Body::from(body));
        }
        Ok((self.transport, request))
    }

    /// Send the request and buffer the response.
    pub async fn send(self) -> ClientResult<Response> {
        let (transport, request) = self.build()?;
        transport.round_trip(request).await
    }
}
