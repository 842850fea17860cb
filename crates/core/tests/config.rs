//! Tests for client configuration and the TOML file form.

use narwhal_core::{
    Config, ConfigFile,
    config::{DEFAULT_HOST, expand_env_vars},
};
use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

#[test]
fn defaults_point_at_the_public_api() {
    let config = Config::new("sk-test");
    assert_eq!(config.scheme, "https");
    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, 443);
    assert_eq!(config.base_path, "");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert!(config.organization.is_none());
    assert_eq!(config.token(), "sk-test");
}

#[test]
fn builder_overrides_every_field() {
    let config = Config::new("sk-test")
        .organization("org-1")
        .scheme("http")
        .host("localhost")
        .port(11434)
        .base_path("/openai")
        .timeout(Duration::from_secs(5));

    assert_eq!(config.organization.as_deref(), Some("org-1"));
    assert_eq!(
        config.url("/v1/models").unwrap().as_str(),
        "http://localhost:11434/openai/v1/models"
    );
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn token_provider_is_asked_every_time() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let config = Config::new(move || format!("sk-{}", counter.fetch_add(1, Ordering::SeqCst)));

    assert_eq!(config.token(), "sk-0");
    assert_eq!(config.token(), "sk-1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn debug_hides_the_token() {
    let config = Config::new("sk-secret");
    let debug = format!("{config:?}");
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("api.openai.com"));
}

#[test]
fn config_file_applies_defaults() {
    let file = ConfigFile::from_toml(r#"api_key = "sk-file""#).unwrap();
    assert_eq!(file.host, DEFAULT_HOST);
    assert_eq!(file.port, 443);
    assert_eq!(file.timeout_secs, 60);

    let config = file.into_config();
    assert_eq!(config.token(), "sk-file");
    assert_eq!(config.url("/v1/models").unwrap().as_str(), "https://api.openai.com/v1/models");
}

#[test]
fn config_file_expands_env_vars() {
    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var("NARWHAL_TEST_CONFIG_KEY", "sk-from-env") };
    let file = ConfigFile::from_toml(
        r#"
api_key = "${NARWHAL_TEST_CONFIG_KEY}"
organization = "org-9"
scheme = "http"
host = "127.0.0.1"
port = 8080
base_path = "/v2"
timeout_secs = 3
"#,
    )
    .unwrap();
    assert_eq!(file.api_key, "sk-from-env");

    let config = file.into_config();
    assert_eq!(config.organization.as_deref(), Some("org-9"));
    assert_eq!(config.timeout, Duration::from_secs(3));
    assert_eq!(
        config.url("/chat").unwrap().as_str(),
        "http://127.0.0.1:8080/v2/chat"
    );
}

#[test]
fn config_file_requires_api_key() {
    assert!(ConfigFile::from_toml("host = \"example.com\"").is_err());
}

#[test]
fn config_file_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_key = \"sk-disk\"\nport = 9000").unwrap();
    let config = ConfigFile::load(file.path()).unwrap();
    assert_eq!(config.api_key, "sk-disk");
    assert_eq!(config.port, 9000);
}

#[test]
fn missing_config_file_is_an_error() {
    let err = ConfigFile::load(std::path::Path::new("/no/such/narwhal.toml")).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn unset_env_vars_are_errors() {
    let err = expand_env_vars("key = \"${NARWHAL_TEST_DEFINITELY_UNSET}\"").unwrap_err();
    assert!(err.to_string().contains("NARWHAL_TEST_DEFINITELY_UNSET"), "{err}");

    let err =
        ConfigFile::from_toml(r#"api_key = "${NARWHAL_TEST_DEFINITELY_UNSET}""#).unwrap_err();
    assert!(format!("{err:#}").contains("is not set"), "{err:#}");
}

#[test]
fn unterminated_reference_is_an_error() {
    assert!(expand_env_vars("key = \"${NARWHAL_TEST").is_err());
}

#[test]
fn text_without_references_is_unchanged() {
    assert_eq!(expand_env_vars("plain $text {x}").unwrap(), "plain $text {x}");
}
