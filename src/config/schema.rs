//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a client.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dump::DumpPreset;

/// Root configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Connection pool and protocol settings.
    pub transport: TransportConfig,

    /// Headers added to every request.
    pub headers: HashMap<String, String>,

    /// Shorthand for the `User-Agent` common header.
    pub user_agent: Option<String>,

    /// Request/response dump settings.
    pub dump: DumpConfig,

    /// Response processing toggles.
    pub response: ResponseConfig,

    /// Composite preset applied after everything else.
    pub mode: ClientMode,
}

/// Timeout configuration. Zero disables the corresponding timeout.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time for request/response in seconds.
    pub request_secs: u64,

    /// Connection establishment (TCP + TLS handshake) timeout in seconds.
    pub connect_secs: u64,

    /// Idle pooled connection lifetime in seconds.
    pub idle_secs: u64,
}

impl TimeoutConfig {
    pub fn request(&self) -> Option<Duration> {
        non_zero_secs(self.request_secs)
    }

    pub fn connect(&self) -> Option<Duration> {
        non_zero_secs(self.connect_secs)
    }

    pub fn idle(&self) -> Option<Duration> {
        non_zero_secs(self.idle_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 120,
            connect_secs: 10,
            idle_secs: 90,
        }
    }
}

/// Connection pool and protocol settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransportConfig {
    /// Negotiate HTTP/2 over TLS when the server offers it.
    pub http2: bool,

    /// Maximum idle connections kept per host.
    pub max_idle_per_host: usize,

    /// Proxy selection.
    pub proxy: ProxyPolicy,

    /// Keep a cookie jar across requests.
    pub cookies: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            http2: true,
            max_idle_per_host: 100,
            proxy: ProxyPolicy::Environment,
            cookies: true,
        }
    }
}

/// How outgoing connections pick a proxy.
///
/// Serialized as `"env"`, `"none"` or a proxy URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ProxyPolicy {
    /// Honour `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY`.
    #[default]
    Environment,
    /// Always connect directly.
    Disabled,
    /// Route everything through this proxy URL.
    Url(String),
}

impl From<String> for ProxyPolicy {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "env" | "environment" | "" => ProxyPolicy::Environment,
            "none" | "off" => ProxyPolicy::Disabled,
            _ => ProxyPolicy::Url(raw),
        }
    }
}

impl From<ProxyPolicy> for String {
    fn from(policy: ProxyPolicy) -> Self {
        match policy {
            ProxyPolicy::Environment => "env".to_string(),
            ProxyPolicy::Disabled => "none".to_string(),
            ProxyPolicy::Url(url) => url,
        }
    }
}

impl fmt::Display for ProxyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyPolicy::Environment => f.write_str("env"),
            ProxyPolicy::Disabled => f.write_str("none"),
            ProxyPolicy::Url(url) => f.write_str(url),
        }
    }
}

/// Dump configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DumpConfig {
    /// Arm the dump hook at construction.
    pub enabled: bool,

    /// Which parts of each exchange to capture.
    pub preset: DumpPreset,

    /// Write records from a background worker.
    pub async_mode: bool,

    /// `"stdout"`, `"stderr"` or a file path.
    pub output: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            preset: DumpPreset::All,
            async_mode: false,
            output: "stdout".to_string(),
        }
    }
}

/// Response processing toggles.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResponseConfig {
    /// Decode textual bodies to UTF-8 using their declared charset.
    pub auto_decode_text: bool,

    /// Read and drop response bodies instead of keeping them.
    pub discard_body: bool,
}

/// Composite client presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    #[default]
    Normal,
    Debug,
    Test,
}
