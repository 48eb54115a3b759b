//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated)
//!     → Client::from_config builds transport, headers, dump, mode
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A config only seeds a client; later fluent calls still override it

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ClientConfig, ClientMode, DumpConfig, ProxyPolicy, ResponseConfig, TimeoutConfig,
    TransportConfig,
};
pub use validation::{validate_config, ValidationError};
