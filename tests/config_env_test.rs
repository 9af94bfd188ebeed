//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides. Note that Config::from_env() also loads
//! from .env file via dotenvy, so these tests focus on override behavior.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use incident_triage::config::{AuthScheme, Config, LogFormat};
use incident_triage::AppError;
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_config_loads_without_credential() {
    // A missing credential is reported at generation time, not here
    env::set_var("GENERATOR_CREDENTIAL_VAR", "INCIDENT_TRIAGE_TEST_NO_SUCH_KEY");

    let result = Config::from_env();
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(
        result.unwrap().generator.credential_var,
        "INCIDENT_TRIAGE_TEST_NO_SUCH_KEY"
    );

    env::remove_var("GENERATOR_CREDENTIAL_VAR");
}

#[test]
#[serial]
fn test_config_custom_generator() {
    env::set_var("GENERATOR_BASE_URL", "https://llm.internal.test");
    env::set_var("GENERATOR_MODEL", "custom-model");
    env::set_var("GENERATOR_AUTH_SCHEME", "bearer");

    let config = Config::from_env().unwrap();
    assert_eq!(config.generator.base_url, "https://llm.internal.test");
    assert_eq!(config.generator.model, "custom-model");
    assert_eq!(config.generator.auth_scheme, AuthScheme::Bearer);

    env::remove_var("GENERATOR_BASE_URL");
    env::remove_var("GENERATOR_MODEL");
    env::remove_var("GENERATOR_AUTH_SCHEME");
}

#[test]
#[serial]
fn test_config_invalid_auth_scheme_is_error() {
    env::set_var("GENERATOR_AUTH_SCHEME", "kerberos");

    let result = Config::from_env();
    assert!(matches!(result, Err(AppError::Config { .. })));

    env::remove_var("GENERATOR_AUTH_SCHEME");
}

#[test]
#[serial]
fn test_config_generation_parameters() {
    env::set_var("GENERATION_TEMPERATURE", "0.2");
    env::set_var("GENERATION_MAX_TOKENS", "300");

    let config = Config::from_env().unwrap();
    assert_eq!(config.generation.temperature, 0.2);
    assert_eq!(config.generation.max_tokens, 300);

    env::remove_var("GENERATION_TEMPERATURE");
    env::remove_var("GENERATION_MAX_TOKENS");
}

#[test]
#[serial]
fn test_config_temperature_is_clamped() {
    env::set_var("GENERATION_TEMPERATURE", "9.5");

    let config = Config::from_env().unwrap();
    assert_eq!(config.generation.temperature, 2.0);

    env::remove_var("GENERATION_TEMPERATURE");
}

#[test]
#[serial]
fn test_config_invalid_number_uses_default() {
    env::set_var("GENERATION_MAX_TOKENS", "not-a-number");
    env::set_var("REQUEST_TIMEOUT_MS", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.generation.max_tokens, 1024);
    assert_eq!(config.request.timeout_ms, 30000);

    env::remove_var("GENERATION_MAX_TOKENS");
    env::remove_var("REQUEST_TIMEOUT_MS");
}

#[test]
#[serial]
fn test_config_custom_timeout() {
    env::set_var("REQUEST_TIMEOUT_MS", "60000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 60000);

    env::remove_var("REQUEST_TIMEOUT_MS");
}

#[test]
#[serial]
fn test_config_json_log_format() {
    env::set_var("LOG_FORMAT", "JSON");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    env::remove_var("LOG_FORMAT");
}
