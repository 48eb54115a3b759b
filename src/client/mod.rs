//! Client facade.
//!
//! # Data Flow
//! ```text
//! Client::new() / Client::from_config(&ClientConfig)
//!     → options.rs (headers, timeout, proxy, response options, modes)
//!     → dump.rs (shared DumpOptions, arm/disarm the transport hook)
//!     → Client::r() → http::Request → transport round trip
//! ```
//!
//! # Responsibilities
//! - Own one transport and the defaults copied into every request
//! - Materialise dump options lazily and arm the dump hook at most once
//! - Produce independent copies through `Clone`
//!
//! # Design Decisions
//! - Configuration calls take `&mut self`, return `&mut Self` and never fail;
//!   problems go to the client's `Logger`
//! - Dump options are shared with the hook, so toggling presets on an armed
//!   client takes effect on the next exchange without re-arming

pub mod default;
mod dump;
mod options;

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::Version;

use crate::config::{ClientConfig, ClientMode};
use crate::dump::{DumpOptions, OutputTarget};
use crate::error::ClientResult;
use crate::http::Request;
use crate::observability::logging::{nop_logger, Logger};
use crate::transport::{ResponseOption, Transport};

pub use default::{default_client, set_default_client};
pub use options::{USER_AGENT_CHROME, USER_AGENT_FIREFOX};

/// A configurable HTTP client.
///
/// ```no_run
/// # async fn run() -> reqkit::ClientResult<()> {
/// let mut client = reqkit::Client::new();
/// client.user_agent("reqkit/0.1").dump_only_head();
///
/// let resp = client.r().get("https://example.com/").send().await?;
/// println!("{}", resp.status());
/// # Ok(())
/// # }
/// ```
pub struct Client {
    transport: Transport,
    dump_options: Option<Arc<RwLock<DumpOptions>>>,
    common_headers: HashMap<String, String>,
    logger: Arc<dyn Logger>,
    timeout: Option<Duration>,
}

impl Client {
    /// Client with default settings: no-op logger, HTTP/2 allowed, 90 s idle
    /// pool timeout, 100 idle connections per host, 10 s connect timeout,
    /// 2 minute request timeout, proxy from the environment, and a cookie jar
    /// that refuses cookies scoped to a public suffix.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialised, like
    /// `reqwest::Client::new`. Use [`Client::from_config`] to handle that
    /// case.
    pub fn new() -> Self {
        Self::from_config(&ClientConfig::default())
            .expect("failed to initialise HTTP transport")
    }

    /// Build a client from a validated config.
    ///
    /// A dump output that cannot be opened is logged and leaves dumping off;
    /// only transport construction errors are returned.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = Transport::new(config.transport.clone(), config.timeouts.clone())?;
        let mut client = Self {
            transport,
            dump_options: None,
            common_headers: HashMap::new(),
            logger: nop_logger(),
            timeout: config.timeouts.request(),
        };

        client.common_headers(config.headers.clone());
        if let Some(ua) = &config.user_agent {
            client.user_agent(ua.clone());
        }

        let mut response = Vec::new();
        if config.response.auto_decode_text {
            response.push(ResponseOption::AutoDecodeTextContent);
        }
        if config.response.discard_body {
            response.push(ResponseOption::DiscardResponseBody);
        }
        client.response_options(response);

        if config.dump.enabled {
            let target = OutputTarget::parse(&config.dump.output);
            match target.open() {
                Ok(output) => {
                    client.dump_preset(config.dump.preset).dump_to(output);
                    if config.dump.async_mode {
                        client.dump_async();
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        output = %config.dump.output,
                        error = %e,
                        "Failed to open dump output"
                    );
                    crate::logf!(client.logger, "create dump file error: {}", e);
                }
            }
        }

        match config.mode {
            ClientMode::Normal => {}
            ClientMode::Debug => {
                client.debug_mode();
            }
            ClientMode::Test => {
                client.test_mode();
            }
        }

        tracing::debug!(
            mode = ?config.mode,
            dump = client.is_dump_enabled(),
            headers = client.common_headers.len(),
            "Client constructed from config"
        );
        Ok(client)
    }

    /// Start a request seeded with this client's common headers, protocol
    /// version, timeout and a snapshot of its transport.
    pub fn r(&self) -> Request {
        let mut headers: Vec<(String, String)> = self
            .common_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();
        Request::new(self.transport.handle(), headers, Version::HTTP_11, self.timeout)
    }

    /// Alias of [`Client::r`].
    pub fn new_request(&self) -> Request {
        self.r()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn get_logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Client {
    /// Independent copy: its own connection pool, dump options and header
    /// map. The logger and cookie jar are shared. An armed source yields an
    /// armed copy reading its own options.
    fn clone(&self) -> Self {
        let mut transport = self.transport.clone();
        let dump_options = self
            .dump_options
            .as_ref()
            .map(|shared| Arc::new(RwLock::new(read_shared(shared).clone())));

        if self.transport.is_dump_enabled() {
            if let Some(options) = &dump_options {
                transport.attach_dump(Arc::clone(options));
            }
        }

        Self {
            transport,
            dump_options,
            common_headers: self.common_headers.clone(),
            logger: Arc::clone(&self.logger),
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport)
            .field("dump_options", &self.dump_options_snapshot())
            .field("common_headers", &self.common_headers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn read_shared(options: &RwLock<DumpOptions>) -> RwLockReadGuard<'_, DumpOptions> {
    options.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_shared(options: &RwLock<DumpOptions>) -> RwLockWriteGuard<'_, DumpOptions> {
    options.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProxyPolicy, TransportConfig};
    use crate::dump::{DumpBuffer, DumpPreset};

    pub(super) fn client() -> Client {
        let config = ClientConfig {
            transport: TransportConfig {
                proxy: ProxyPolicy::Disabled,
                ..TransportConfig::default()
            },
            ..ClientConfig::default()
        };
        Client::from_config(&config).unwrap()
    }

    #[test]
    fn new_client_defaults() {
        let c = client();
        assert_eq!(c.get_timeout(), Some(Duration::from_secs(120)));
        assert!(!c.is_dump_enabled());
        assert!(c.dump_options_snapshot().is_none());
        assert!(c.common_header_map().is_empty());
        assert!(!c.get_logger().enabled());
        assert!(c.transport().config().http2);
    }

    #[test]
    fn clone_keeps_values_but_not_identity() {
        let mut source = client();
        source.common_header("X-Env", "prod").dump_only_head();

        let mut copy = source.clone();
        assert_eq!(copy.common_header_map(), source.common_header_map());
        assert_eq!(
            copy.dump_options_snapshot().unwrap().flags(),
            source.dump_options_snapshot().unwrap().flags()
        );
        assert!(copy.is_dump_enabled());

        copy.common_header("X-Env", "staging").dump_only_body();
        assert_eq!(source.get_common_header("X-Env"), Some("prod"));
        assert_eq!(
            source.dump_options_snapshot().unwrap().flags(),
            (true, false, true, false)
        );

        source.common_header("X-Source", "1");
        assert_eq!(copy.get_common_header("X-Source"), None);
    }

    #[test]
    fn clone_hook_reads_its_own_options() {
        let mut source = client();
        source.dump(true);
        let copy = source.clone();

        let source_hook = source.transport().dumper().unwrap();
        let copy_hook = copy.transport().dumper().unwrap();
        assert!(!source_hook.same_hook(copy_hook));
        assert!(copy_hook.reads(copy.dump_options.as_ref().unwrap()));
    }

    #[test]
    fn clone_of_unarmed_client_stays_unarmed() {
        let mut source = client();
        source.dump_only_request().dump(false);
        let copy = source.clone();
        assert!(!copy.is_dump_enabled());
        assert_eq!(copy.dump_options_snapshot().unwrap().flags(), (true, true, false, false));
    }

    #[test]
    fn request_is_seeded_from_client() {
        let mut c = client();
        c.common_header("X-Env", "prod").timeout(Duration::from_secs(7));
        let req = c.r();
        assert_eq!(req.header_value("x-env"), Some("prod"));
        assert_eq!(req.timeout_value(), Some(Duration::from_secs(7)));
        assert_eq!(req.protocol_version(), Version::HTTP_11);

        // Later client changes do not reach an existing request.
        c.common_header("X-Env", "staging");
        assert_eq!(req.header_value("X-Env"), Some("prod"));
    }

    #[test]
    fn from_config_applies_every_section() {
        let buffer_file = tempfile::NamedTempFile::new().unwrap();
        let mut config = ClientConfig::default();
        config.transport.proxy = ProxyPolicy::Disabled;
        config.timeouts.request_secs = 0;
        config.headers.insert("X-Team".into(), "core".into());
        config.user_agent = Some("reqkit-test/1.0".into());
        config.response.discard_body = true;
        config.dump.enabled = true;
        config.dump.preset = DumpPreset::Response;
        config.dump.async_mode = true;
        config.dump.output = buffer_file.path().display().to_string();

        let c = Client::from_config(&config).unwrap();
        assert_eq!(c.get_timeout(), None);
        assert_eq!(c.get_common_header("X-Team"), Some("core"));
        assert_eq!(c.get_common_header("User-Agent"), Some("reqkit-test/1.0"));
        assert!(c.response_option_state().discard_body);
        assert!(c.is_dump_enabled());

        let opts = c.dump_options_snapshot().unwrap();
        assert_eq!(opts.flags(), (false, false, true, true));
        assert!(opts.async_mode);
    }

    #[test]
    fn from_config_with_unopenable_dump_output_leaves_dump_off() {
        let mut config = ClientConfig::default();
        config.transport.proxy = ProxyPolicy::Disabled;
        config.dump.enabled = true;
        config.dump.output = "/nonexistent-dir/reqkit/dump.log".into();

        let c = Client::from_config(&config).unwrap();
        assert!(!c.is_dump_enabled());
    }

    #[test]
    fn from_config_test_mode() {
        let mut config = ClientConfig::default();
        config.transport.proxy = ProxyPolicy::Disabled;
        config.mode = ClientMode::Test;

        let c = Client::from_config(&config).unwrap();
        assert!(c.is_dump_enabled());
        assert!(c.response_option_state().discard_body);
        assert_eq!(c.get_common_header("User-Agent"), Some(USER_AGENT_CHROME));
    }

    #[test]
    fn debug_output_does_not_expose_writer() {
        let mut c = client();
        c.dump_to(DumpBuffer::new());
        let text = format!("{c:?}");
        assert!(text.contains("Client"));
        assert!(text.contains("dump_options"));
    }
}
