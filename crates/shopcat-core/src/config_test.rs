use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_maps_known_names() {
    for (raw, expected) in [
        ("development", Environment::Development),
        ("test", Environment::Test),
        ("production", Environment::Production),
        ("staging", Environment::Development),
    ] {
        assert_eq!(parse_environment(raw), expected, "input {raw}");
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.output_dir, std::path::PathBuf::from("./output"));
    assert_eq!(cfg.scraper_request_timeout_secs, 30);
    assert_eq!(cfg.scraper_user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.scraper_rate_limit_ms, 1000);
    assert_eq!(cfg.scraper_default_max_products, 100);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCAT_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPCAT_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_rate_limit_override() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_SCRAPER_RATE_LIMIT_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scraper_rate_limit_ms, 250);
}

#[test]
fn build_app_config_fails_with_invalid_rate_limit() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_SCRAPER_RATE_LIMIT_MS", "fast");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCAT_SCRAPER_RATE_LIMIT_MS"),
        "expected InvalidEnvVar(SHOPCAT_SCRAPER_RATE_LIMIT_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_max_products_and_output_dir() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_SCRAPER_DEFAULT_MAX_PRODUCTS", "500");
    map.insert("SHOPCAT_OUTPUT_DIR", "/tmp/shopcat");
    map.insert("SHOPCAT_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scraper_default_max_products, 500);
    assert_eq!(cfg.output_dir, std::path::PathBuf::from("/tmp/shopcat"));
    assert_eq!(cfg.env, Environment::Production);
}

#[test]
fn build_app_config_fails_with_negative_max_products() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_SCRAPER_DEFAULT_MAX_PRODUCTS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCAT_SCRAPER_DEFAULT_MAX_PRODUCTS"
    ));
}

#[test]
fn build_app_config_trims_numeric_values() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_SCRAPER_REQUEST_TIMEOUT_SECS", " 12 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scraper_request_timeout_secs, 12);
}

#[test]
fn invalid_value_is_quoted_in_the_reason() {
    let mut map = HashMap::new();
    map.insert("SHOPCAT_SCRAPER_REQUEST_TIMEOUT_SECS", "soon");
    let err = build_app_config(lookup_from_map(&map)).unwrap_err();
    assert!(err.to_string().contains("\"soon\""), "{err}");
}
