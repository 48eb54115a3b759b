//! Cookie storage that refuses cookies scoped to a public suffix.
//!
//! A `Set-Cookie` with `Domain=co.uk` sent by `evil.co.uk` would otherwise be
//! replayed to every other `.co.uk` site. The jar checks domain attributes
//! against the bundled public suffix list and drops such cookies.

use std::sync::{LazyLock, PoisonError, RwLock};

use reqwest::header::HeaderValue;
use url::Url;

static PUBLIC_SUFFIXES: LazyLock<Option<publicsuffix::List>> = LazyLock::new(|| {
    match include_str!("../../data/public_suffix_list.dat").parse::<publicsuffix::List>() {
        Ok(list) => Some(list),
        Err(e) => {
            tracing::warn!(error = %e, "Public suffix list unusable, cookie domains unchecked");
            None
        }
    }
});

/// Cookie jar shared by a client and its copies.
#[derive(Debug)]
pub struct CookieJar(RwLock<cookie_store::CookieStore>);

impl CookieJar {
    pub fn new() -> Self {
        let store = cookie_store::CookieStore::new_with_public_suffix(PUBLIC_SUFFIXES.clone());
        Self(RwLock::new(store))
    }

    /// Store one `Set-Cookie` value as if `url` had sent it.
    ///
    /// Returns false when the cookie is rejected.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) -> bool {
        let mut store = self.0.write().unwrap_or_else(PoisonError::into_inner);
        match store.parse(cookie, url) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, url = %url, "Cookie rejected");
                false
            }
        }
    }

    /// The `Cookie` header value to send to `url`, if any cookie matches.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let store = self.0.read().unwrap_or_else(PoisonError::into_inner);
        let header = store
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        (!header.is_empty()).then_some(header)
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for value in cookie_headers {
            match std::str::from_utf8(value.as_bytes()) {
                Ok(cookie) => {
                    self.add_cookie_str(cookie, url);
                }
                Err(_) => tracing::debug!(url = %url, "Skipping non-UTF-8 Set-Cookie"),
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.cookie_header(url).and_then(|header| HeaderValue::from_str(&header).ok())
    }
}
