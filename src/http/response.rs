//! Buffered responses.
//!
//! # Responsibilities
//! - Hold status, version, headers and the final URL of an exchange
//! - Hold the body, unless the transport discarded it
//! - Decode the body as text or JSON on demand
//!
//! # Design Decisions
//! - Bodies are fully read by the transport so dumps see them; `Response`
//!   is plain data and cheap to clone (`Bytes`)

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url, Version};
use serde::de::DeserializeOwned;

use crate::error::ClientResult;

/// A completed response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    url: Url,
    body: Bytes,
    discarded: bool,
}

impl Response {
    pub(crate) fn new(
        status: StatusCode,
        version: Version,
        headers: HeaderMap,
        url: Url,
        body: Bytes,
        discarded: bool,
    ) -> Self {
        Self {
            status,
            version,
            headers,
            url,
            body,
            discarded,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// URL after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// True if the body was read and dropped by the transport.
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }
}
