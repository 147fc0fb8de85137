//! # RON SDK Domain
//!
//! Pure types shared by every layer of the RON app-plane SDK.
//!
//! This crate contains:
//! - The classified error model (`SdkError`, `ErrorKind`, stable codes)
//! - The wire envelope (`AppResponse<T>`, `Problem`)
//! - Transport-neutral request/response descriptions
//! - Validated client configuration (`SdkConfig` + builder)
//! - Protocol constants and defaults
//!
//! ## Architecture
//! - No dependencies on other SDK crates
//! - No I/O, no async runtime

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::{SdkConfig, SdkConfigBuilder};
pub use errors::{codes, BoxedError, ErrorKind, SdkError, SdkResult};
pub use types::*;
