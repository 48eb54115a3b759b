//! Process-wide default client.
//!
//! Built lazily on first access. Replacing it never disturbs callers that
//! already hold the previous client.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::client::Client;

static DEFAULT_CLIENT: LazyLock<ArcSwap<Client>> =
    LazyLock::new(|| ArcSwap::from_pointee(Client::new()));

/// The current default client.
pub fn default_client() -> Arc<Client> {
    DEFAULT_CLIENT.load_full()
}

/// Replace the default client. `None` keeps the current one.
pub fn set_default_client(client: Option<Client>) {
    if let Some(client) = client {
        DEFAULT_CLIENT.store(Arc::new(client));
        tracing::debug!("Default client replaced");
    }
}
