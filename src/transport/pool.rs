//! Connection pool ownership.
//!
//! # Responsibilities
//! - Build the pooled `reqwest::Client` from transport and timeout settings
//! - Own the cookie jar, shared with every copy of the transport
//! - Hold the response options and the optional dump hook
//! - Rebuild the pool when the proxy policy changes
//! - Deep-copy into an independent pool on clone

use std::sync::{Arc, RwLock};

use crate::config::{ProxyPolicy, TimeoutConfig, TransportConfig};
use crate::dump::{DumpOptions, Dumper};
use crate::error::{ClientError, ClientResult};
use crate::transport::cookies::CookieJar;
use crate::transport::exchange::TransportHandle;
use crate::transport::response_options::{ResponseOption, ResponseOptionState};

/// Owns a connection pool plus the hooks applied to every exchange.
///
/// Safe to share across many in-flight requests through [`Transport::handle`].
pub struct Transport {
    http: reqwest::Client,
    config: TransportConfig,
    timeouts: TimeoutConfig,
    cookie_jar: Option<Arc<CookieJar>>,
    response_options: ResponseOptionState,
    dumper: Option<Dumper>,
}

impl Transport {
    /// Build a transport with its own pool.
    pub fn new(config: TransportConfig, timeouts: TimeoutConfig) -> ClientResult<Self> {
        let cookie_jar = config.cookies.then(|| Arc::new(CookieJar::new()));
        let http = build_pool(&config, &timeouts, cookie_jar.as_ref())?;

        tracing::debug!(
            http2 = config.http2,
            max_idle_per_host = config.max_idle_per_host,
            proxy = %config.proxy,
            cookies = config.cookies,
            "Transport initialized"
        );

        Ok(Self {
            http,
            config,
            timeouts,
            cookie_jar,
            response_options: ResponseOptionState::default(),
            dumper: None,
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn cookie_jar(&self) -> Option<&Arc<CookieJar>> {
        self.cookie_jar.as_ref()
    }

    /// Attach the dump hook reading `options` live.
    ///
    /// Returns false, leaving the current hook untouched, if a hook is
    /// already attached.
    pub fn attach_dump(&mut self, options: Arc<RwLock<DumpOptions>>) -> bool {
        if self.dumper.is_some() {
            return false;
        }
        self.dumper = Some(Dumper::new(options));
        tracing::debug!("Dump hook attached");
        true
    }

    /// Remove the dump hook. Requests already created keep theirs.
    pub fn detach_dump(&mut self) {
        if self.dumper.take().is_some() {
            tracing::debug!("Dump hook detached");
        }
    }

    pub fn is_dump_enabled(&self) -> bool {
        self.dumper.is_some()
    }

    pub fn dumper(&self) -> Option<&Dumper> {
        self.dumper.as_ref()
    }

    /// Apply response options in order.
    pub fn apply_response_options<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = ResponseOption>,
    {
        self.response_options.apply_all(options);
    }

    pub fn response_options(&self) -> ResponseOptionState {
        self.response_options
    }

    /// Switch proxy policy, rebuilding the pool.
    ///
    /// On failure the previous pool and policy stay in place.
    pub fn set_proxy(&mut self, proxy: ProxyPolicy) -> ClientResult<()> {
        let mut config = self.config.clone();
        config.proxy = proxy;
        let http = build_pool(&config, &self.timeouts, self.cookie_jar.as_ref())?;
        self.http = http;
        self.config = config;
        tracing::debug!(proxy = %self.config.proxy, "Transport proxy updated");
        Ok(())
    }

    /// Snapshot used by a request for its whole lifetime.
    pub fn handle(&self) -> TransportHandle {
        TransportHandle::new(self.http.clone(), self.response_options, self.dumper.clone())
    }

    /// Copy with an independent pool.
    ///
    /// The cookie jar is shared. The copy starts with no dump hook; its
    /// owner arms it with its own options.
    pub fn try_clone(&self) -> ClientResult<Self> {
        let http = build_pool(&self.config, &self.timeouts, self.cookie_jar.as_ref())?;
        Ok(Self {
            http,
            config: self.config.clone(),
            timeouts: self.timeouts.clone(),
            cookie_jar: self.cookie_jar.clone(),
            response_options: self.response_options,
            dumper: None,
        })
    }
}

impl Clone for Transport {
    /// See [`Transport::try_clone`]. If a new pool cannot be built, the copy
    /// shares the source pool.
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                "Failed to build independent pool, sharing the source pool"
            );
            Self {
                http: self.http.clone(),
                config: self.config.clone(),
                timeouts: self.timeouts.clone(),
                cookie_jar: self.cookie_jar.clone(),
                response_options: self.response_options,
                dumper: None,
            }
        })
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .field("timeouts", &self.timeouts)
            .field("response_options", &self.response_options)
            .field("dump_enabled", &self.is_dump_enabled())
            .finish()
    }
}

fn build_pool(
    config: &TransportConfig,
    timeouts: &TimeoutConfig,
    cookie_jar: Option<&Arc<CookieJar>>,
) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(config.max_idle_per_host)
        .pool_idle_timeout(timeouts.idle());

    if let Some(connect) = timeouts.connect() {
        builder = builder.connect_timeout(connect);
    }
    if !config.http2 {
        builder = builder.http1_only();
    }

    builder = match &config.proxy {
        ProxyPolicy::Environment => builder,
        ProxyPolicy::Disabled => builder.no_proxy(),
        ProxyPolicy::Url(url) => {
            let proxy = reqwest::Proxy::all(url.as_str())
                .map_err(|e| ClientError::Build(format!("invalid proxy '{url}': {e}")))?;
            builder.proxy(proxy)
        }
    };

    if let Some(jar) = cookie_jar {
        builder = builder.cookie_provider(Arc::clone(jar));
    }

    builder.build().map_err(|e| ClientError::Build(e.to_string()))
}
