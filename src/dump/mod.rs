//! Request/response dump subsystem.
//!
//! # Data Flow
//! ```text
//! Client dump_* call
//!     → options.rs (mutate shared DumpOptions in place)
//!     → dumper.rs (hook armed once on the transport)
//!
//! Each exchange on an armed transport:
//!     → dumper snapshot of the live options
//!     → format.rs (render heads, frame bodies)
//!     → output.rs sink, inline or via the async worker
//! ```
//!
//! # Design Decisions
//! - Options live behind `Arc<RwLock<_>>` shared by client and hook, so
//!   toggling flags never requires re-arming
//! - Disabling drops the hook but keeps the options for the next arm

pub mod dumper;
pub mod format;
pub mod options;
pub mod output;

pub use dumper::Dumper;
pub use options::{DumpOptions, DumpPreset};
pub use output::{DumpBuffer, DumpOutput, OutputTarget};
