//! reqkit: a configurable HTTP client with request/response dump control.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ────────────┬─────────────────────────────────┐
//!   (headers, timeout, │ r()                             │ dump_* / dump(bool)
//!    logger, modes)    ▼                                 ▼
//!                   Request ──send()──▶ Transport ──▶ Dumper ──▶ DumpOutput
//!                                       (reqwest pool, (live      (stdout, file,
//!                                        cookie jar,    options,   buffer, writer)
//!                                        proxy,         sync or
//!                                        response       async)
//!                                        options)
//!                                           │
//!                                           ▼
//!                                        Response
//! ```
//!
//! Configuration calls chain on `&mut Client` and never fail. A `Client`
//! clone is fully independent apart from the shared logger and cookie jar.

pub mod client;
pub mod config;
pub mod dump;
pub mod error;
pub mod http;
pub mod observability;
pub mod transport;

pub use client::{
    default_client, set_default_client, Client, USER_AGENT_CHROME, USER_AGENT_FIREFOX,
};
pub use config::{load_config, ClientConfig, ProxyPolicy};
pub use dump::{DumpBuffer, DumpOptions, DumpOutput, DumpPreset};
pub use error::{ClientError, ClientResult};
pub use http::{Request, Response};
pub use observability::{Logger, NopLogger, TracingLogger, WriterLogger};
pub use transport::{CookieJar, ResponseOption};
