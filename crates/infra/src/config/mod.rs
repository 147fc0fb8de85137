//! Configuration loading
//!
//! Layers `RON_SDK_*` environment variables onto an
//! [`SdkConfigBuilder`](ron_sdk_domain::SdkConfigBuilder) without overriding
//! anything the caller set explicitly.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env, apply_process_env, from_env, load_from_env};
