//! Integration tests for client configuration precedence
//!
//! Explicit builder values and explicit configs always beat `RON_SDK_*`
//! variables; the environment only fills what is unset.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use once_cell::sync::Lazy;
use ron_sdk_domain::{codes, SdkConfig, SdkConfigBuilder};
use ron_sdk_infra::config::loader::{ENV_GATEWAY_ADDR, ENV_MAX_RETRIES, ENV_READ_TIMEOUT_MS};
use ron_sdk_infra::{RonClient, RonClientBuilder};

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

#[test]
fn test_missing_base_url_fails_build() {
    let err = RonClient::builder().build().unwrap_err();
    assert_eq!(err.code(), codes::CONFIG_MISSING_BASE_URL);
    assert!(err.is_config());

    let err = RonClientBuilder::new().env_vars(HashMap::new()).build().unwrap_err();
    assert_eq!(err.code(), codes::CONFIG_MISSING_BASE_URL);
}

#[test]
fn test_environment_fills_unset_fields() {
    let client = RonClientBuilder::new()
        .env_vars(env(&[
            (ENV_GATEWAY_ADDR, "https://env.example.com"),
            (ENV_READ_TIMEOUT_MS, "1500"),
            (ENV_MAX_RETRIES, "2"),
        ]))
        .build()
        .unwrap();

    assert_eq!(client.config().base_url(), "https://env.example.com");
    assert_eq!(client.config().read_timeout(), Duration::from_millis(1500));
    assert_eq!(client.retry_policy().max_retries(), 2);
}

#[test]
fn test_explicit_base_url_beats_environment_in_any_order() {
    let vars = env(&[(ENV_GATEWAY_ADDR, "https://env.example.com")]);

    let before = RonClientBuilder::new()
        .base_url("https://explicit.example.com")
        .env_vars(vars.clone())
        .build()
        .unwrap();
    let after = RonClientBuilder::new()
        .env_vars(vars)
        .base_url("https://explicit.example.com")
        .build()
        .unwrap();

    assert_eq!(before.config().base_url(), "https://explicit.example.com");
    assert_eq!(after.config().base_url(), "https://explicit.example.com");
}

#[test]
fn test_explicit_config_wins_outright() {
    let config = SdkConfig::builder()
        .base_url("https://config.example.com")
        .read_timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let client = RonClientBuilder::new()
        .env_vars(env(&[
            (ENV_GATEWAY_ADDR, "https://env.example.com"),
            (ENV_READ_TIMEOUT_MS, "9999"),
            (ENV_MAX_RETRIES, "4"),
        ]))
        .config(config)
        .build()
        .unwrap();

    assert_eq!(client.config().base_url(), "https://config.example.com");
    assert_eq!(client.config().read_timeout(), Duration::from_secs(2));
    assert_eq!(client.retry_policy().max_retries(), 0);
}

#[test]
fn test_invalid_and_insecure_addresses_rejected() {
    let err = RonClient::builder().base_url("not a url").build().unwrap_err();
    assert_eq!(err.code(), codes::CONFIG_INVALID_URL);

    let err = RonClient::builder().base_url("http://plain.example.com").build().unwrap_err();
    assert_eq!(err.code(), codes::CONFIG_INSECURE_HTTP_DISABLED);

    let client = RonClient::builder()
        .config_builder(SdkConfigBuilder::new().allow_insecure_http(true))
        .base_url("http://plain.example.com")
        .build()
        .unwrap();
    assert!(client.config().allow_insecure_http());
}

#[test]
fn test_config_builder_keeps_earlier_base_url() {
    let partial = SdkConfigBuilder::new().allow_insecure_http(true).max_retries(2);

    let client = RonClient::builder()
        .base_url("http://plain.example.com")
        .config_builder(partial)
        .build()
        .unwrap();

    assert_eq!(client.config().base_url(), "http://plain.example.com");
    assert!(client.config().allow_insecure_http());
    assert_eq!(client.retry_policy().max_retries(), 2);

    let client = RonClient::builder()
        .base_url("https://first.example.com")
        .config_builder(SdkConfigBuilder::new().base_url("https://second.example.com"))
        .build()
        .unwrap();
    assert_eq!(client.config().base_url(), "https://second.example.com");
}

#[test]
fn test_from_env_reads_process_environment() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    std::env::set_var(ENV_GATEWAY_ADDR, "https://process.example.com/");
    std::env::set_var(ENV_MAX_RETRIES, "1");

    let result = RonClientBuilder::from_env().build();

    std::env::remove_var(ENV_GATEWAY_ADDR);
    std::env::remove_var(ENV_MAX_RETRIES);

    let client = result.expect("client should build from process env");
    assert_eq!(client.config().base_url(), "https://process.example.com/");
    assert_eq!(client.retry_policy().max_retries(), 1);
}
