//! Environment configuration loader
//!
//! Applies environment variables to a [`SdkConfigBuilder`]. Every variable
//! only fills a field the builder has not set, so explicit settings always
//! win regardless of the order in which they were applied.
//!
//! ## Environment Variables
//! - `RON_SDK_GATEWAY_ADDR`: Gateway base address (trimmed, ignored if blank)
//! - `RON_SDK_OVERALL_TIMEOUT_MS`: Overall request timeout in milliseconds
//! - `RON_SDK_CONNECT_TIMEOUT_MS`: Connect timeout in milliseconds
//! - `RON_SDK_READ_TIMEOUT_MS`: Read timeout in milliseconds
//! - `RON_SDK_WRITE_TIMEOUT_MS`: Write timeout in milliseconds
//! - `RON_SDK_INSECURE_HTTP`: Allow plain HTTP (`1`/`true`/`yes`/`on`)
//! - `RON_SDK_MAX_RETRIES`: Retry budget for idempotent calls
//! - `RON_SDK_MAX_RESPONSE_BYTES`: Response body limit (`<= 0` = unlimited)
//!
//! Timeouts must be positive integers. Unparsable or out-of-range values are
//! ignored and reported at `debug` level. Values are never logged.

use std::collections::HashMap;

use ron_sdk_domain::{SdkConfig, SdkConfigBuilder, SdkResult};
use tracing::debug;

pub const ENV_GATEWAY_ADDR: &str = "RON_SDK_GATEWAY_ADDR";
pub const ENV_OVERALL_TIMEOUT_MS: &str = "RON_SDK_OVERALL_TIMEOUT_MS";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "RON_SDK_CONNECT_TIMEOUT_MS";
pub const ENV_READ_TIMEOUT_MS: &str = "RON_SDK_READ_TIMEOUT_MS";
pub const ENV_WRITE_TIMEOUT_MS: &str = "RON_SDK_WRITE_TIMEOUT_MS";
pub const ENV_INSECURE_HTTP: &str = "RON_SDK_INSECURE_HTTP";
pub const ENV_MAX_RETRIES: &str = "RON_SDK_MAX_RETRIES";
pub const ENV_MAX_RESPONSE_BYTES: &str = "RON_SDK_MAX_RESPONSE_BYTES";

/// Fresh builder pre-populated from the process environment.
pub fn from_env() -> SdkConfigBuilder {
    let mut builder = SdkConfigBuilder::new();
    apply_process_env(&mut builder);
    builder
}

/// Build a configuration from the process environment alone.
///
/// # Errors
/// Returns a config error if the resulting configuration is invalid (for
/// example `RON_SDK_GATEWAY_ADDR` is unset)
pub fn load_from_env() -> SdkResult<SdkConfig> {
    from_env().build()
}

/// Apply the process environment to an existing builder.
///
/// Variables whose name or value is not valid Unicode are skipped.
pub fn apply_process_env(builder: &mut SdkConfigBuilder) {
    let vars: HashMap<String, String> = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter(|(key, _)| key.starts_with("RON_SDK_"))
        .collect();
    apply_env(builder, &vars);
}

/// Apply `vars` to `builder`, filling only unset fields.
pub fn apply_env(builder: &mut SdkConfigBuilder, vars: &HashMap<String, String>) {
    if !builder.has_base_url() {
        if let Some(addr) = vars.get(ENV_GATEWAY_ADDR).map(|s| s.trim()).filter(|s| !s.is_empty())
        {
            debug!(var = ENV_GATEWAY_ADDR, "Gateway address present in environment");
            builder.set_base_url(addr);
        }
    }

    if !builder.has_overall_timeout() {
        if let Some(ms) = env_millis(vars, ENV_OVERALL_TIMEOUT_MS) {
            builder.set_overall_timeout_ms(ms);
        }
    }
    if !builder.has_connect_timeout() {
        if let Some(ms) = env_millis(vars, ENV_CONNECT_TIMEOUT_MS) {
            builder.set_connect_timeout_ms(ms);
        }
    }
    if !builder.has_read_timeout() {
        if let Some(ms) = env_millis(vars, ENV_READ_TIMEOUT_MS) {
            builder.set_read_timeout_ms(ms);
        }
    }
    if !builder.has_write_timeout() {
        if let Some(ms) = env_millis(vars, ENV_WRITE_TIMEOUT_MS) {
            builder.set_write_timeout_ms(ms);
        }
    }

    if !builder.has_allow_insecure_http() {
        if let Some(value) = vars.get(ENV_INSECURE_HTTP) {
            builder.set_allow_insecure_http(env_bool(value));
        }
    }

    if !builder.has_max_retries() {
        if let Some(retries) = env_parse::<u32>(vars, ENV_MAX_RETRIES) {
            builder.set_max_retries(retries);
        }
    }
    if !builder.has_max_response_bytes() {
        if let Some(max_bytes) = env_parse::<i64>(vars, ENV_MAX_RESPONSE_BYTES) {
            builder.set_max_response_bytes(max_bytes);
        }
    }
}

fn env_parse<T: std::str::FromStr>(vars: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = vars.get(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(var = key, "Ignoring unparsable environment value");
            None
        }
    }
}

fn env_millis(vars: &HashMap<String, String>, key: &str) -> Option<i64> {
    let ms = env_parse::<i64>(vars, key)?;
    if ms <= 0 {
        debug!(var = key, "Ignoring non-positive timeout");
        return None;
    }
    Some(ms)
}

fn env_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
