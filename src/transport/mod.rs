//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Client
//!     → pool.rs (Transport: pooled reqwest client, response options, dump hook)
//!         cookies.rs (CookieJar: public-suffix aware, shared across copies)
//!     → Transport::handle() snapshot taken by each Request
//!     → exchange.rs (dump request → send → dump response → read body)
//!     → http::Response
//! ```
//!
//! # Design Decisions
//! - TLS, HTTP/2 negotiation and connection reuse are reqwest's job
//! - Cookies go through our own jar so domain attributes naming a public
//!   suffix are refused
//! - A handle clones the pool handle, so concurrent requests share
//!   connections while each keeps its own option snapshot
//! - Cloning a `Transport` builds a fresh pool

pub mod cookies;
pub mod exchange;
pub mod pool;
pub mod response_options;

pub use cookies::CookieJar;
pub use exchange::TransportHandle;
pub use pool::Transport;
pub use response_options::{ResponseOption, ResponseOptionState};
