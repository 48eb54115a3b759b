//! Request building and response buffering.
//!
//! # Data Flow
//! ```text
//! Client::r()
//!     → request.rs (method, URL, headers, body on top of client defaults)
//!     → Request::send → transport round trip
//!     → response.rs (status, headers, buffered body)
//! ```

pub mod request;
pub mod response;

pub use request::Request;
pub use response::Response;
