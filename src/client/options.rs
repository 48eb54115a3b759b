//! Fluent configuration of headers, timeouts, proxy, response handling and
//! the composite debug/test modes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::client::Client;
use crate::config::ProxyPolicy;
use crate::observability::logging::{Logger, WriterLogger};
use crate::transport::{ResponseOption, ResponseOptionState};

/// Desktop Chrome browser signature.
pub const USER_AGENT_CHROME: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36"
);

/// Desktop Firefox browser signature.
pub const USER_AGENT_FIREFOX: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

impl Client {
    /// Replace the diagnostic logger. `None` keeps the current one.
    pub fn logger(&mut self, logger: Option<Arc<dyn Logger>>) -> &mut Self {
        if let Some(logger) = logger {
            self.logger = logger;
        }
        self
    }

    /// Set a header sent with every request. Setting a key again, in any
    /// letter case, replaces its value.
    pub fn common_header(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        let key = key.into();
        self.common_headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.common_headers.insert(key, value.into());
        self
    }

    pub fn common_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.common_header(key, value);
        }
        self
    }

    pub fn user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.common_header("User-Agent", user_agent)
    }

    /// Bound the whole round trip of each request. Zero disables the bound.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Change how connections pick a proxy. An unusable proxy is logged and
    /// the previous policy kept.
    pub fn proxy(&mut self, proxy: ProxyPolicy) -> &mut Self {
        if let Err(e) = self.transport.set_proxy(proxy) {
            tracing::warn!(error = %e, "Proxy change rejected");
            crate::logf!(self.logger, "set proxy error: {}", e);
        }
        self
    }

    /// Apply response options in order; later ones win.
    pub fn response_options<I>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = ResponseOption>,
    {
        self.transport.apply_response_options(options);
        self
    }

    pub fn auto_decode_text_content(&mut self) -> &mut Self {
        self.response_options([ResponseOption::AutoDecodeTextContent])
    }

    pub fn auto_discard_response_body(&mut self) -> &mut Self {
        self.response_options([ResponseOption::DiscardResponseBody])
    }

    /// Decode text bodies, dump every exchange, log to stdout and present a
    /// browser user agent.
    pub fn debug_mode(&mut self) -> &mut Self {
        self.auto_decode_text_content()
            .dump(true)
            .logger(Some(Arc::new(WriterLogger::stdout())))
            .user_agent(USER_AGENT_CHROME)
    }

    /// [`Client::debug_mode`] plus response-body discarding, so responses are
    /// dumped without being kept.
    pub fn test_mode(&mut self) -> &mut Self {
        self.debug_mode().auto_discard_response_body()
    }

    /// Value of a common header, matching `key` case-insensitively.
    pub fn get_common_header(&self, key: &str) -> Option<&str> {
        self.common_headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn common_header_map(&self) -> &HashMap<String, String> {
        &self.common_headers
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn response_option_state(&self) -> ResponseOptionState {
        self.transport.response_options()
    }
}
