use std::collections::HashMap;

use courtside_api::config::{ApiConfig, DEFAULT_SESSION_TTL_HOURS};
use courtside_core::availability::SlotWindow;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing::Level;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| values.get(key).cloned()
}

const DATABASE_URL: (&str, &str) = ("DATABASE_URL", "postgres://localhost/courtside");

#[test]
fn test_defaults() {
    let config = ApiConfig::from_lookup(lookup_from(&[DATABASE_URL])).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.database_max_connections, 5);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
    assert_eq!(config.slot_window, SlotWindow::default());
}

#[test]
fn test_overrides() {
    let config = ApiConfig::from_lookup(lookup_from(&[
        DATABASE_URL,
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("DATABASE_MAX_CONNECTIONS", "12"),
        ("LOG_LEVEL", "debug"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://courtside.app,"),
        ("API_REQUEST_TIMEOUT_SECONDS", "5"),
        ("SESSION_TTL_HOURS", "2"),
        ("SLOTS_OPEN_HOUR", "8"),
        ("SLOTS_CLOSE_HOUR", "23"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.database_max_connections, 12);
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://courtside.app".to_string()
        ])
    );
    assert_eq!(config.request_timeout, 5);
    assert_eq!(config.session_ttl_hours, 2);
    assert_eq!(config.slot_window, SlotWindow::new(8, 23).unwrap());
}

#[test]
fn test_unknown_log_level_falls_back_to_info() {
    let config =
        ApiConfig::from_lookup(lookup_from(&[DATABASE_URL, ("LOG_LEVEL", "chatty")])).unwrap();

    assert_eq!(config.log_level, Level::INFO);
}

#[test]
fn test_database_url_is_required() {
    let err = ApiConfig::from_lookup(lookup_from(&[])).unwrap_err();

    assert!(err.to_string().contains("DATABASE_URL"));
}

#[rstest]
#[case("API_PORT", "not-a-port")]
#[case("API_PORT", "70000")]
#[case("DATABASE_MAX_CONNECTIONS", "-1")]
#[case("SESSION_TTL_HOURS", "0")]
#[case("SLOTS_OPEN_HOUR", "22")]
#[case("SLOTS_CLOSE_HOUR", "25")]
fn test_invalid_values_are_rejected(#[case] key: &str, #[case] value: &str) {
    let result = ApiConfig::from_lookup(lookup_from(&[DATABASE_URL, (key, value)]));

    assert!(result.is_err(), "{}={} should be rejected", key, value);
}
