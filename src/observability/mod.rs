//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Library internals
//!     → tracing events with structured fields (transport, dump worker, config)
//!
//! Client configuration problems (unopenable dump file, bad proxy)
//!     → Logger capability held by the client
//!         → NopLogger (default) | WriterLogger | TracingLogger
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber; binaries call `init_tracing`
//! - Request/response capture lives in `dump`, not here

pub mod logging;

pub use logging::{init_tracing, nop_logger, Logger, NopLogger, TracingLogger, WriterLogger};
