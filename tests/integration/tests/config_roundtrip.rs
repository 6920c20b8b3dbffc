//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use std::path::Path;
use stockwise_core::config::Config;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stockwise.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.port, config.server.port);
    assert_eq!(loaded.server.cors, config.server.cors);
    assert_eq!(loaded.retrieval.k, config.retrieval.k);
    assert_eq!(loaded.openai.chat_model, config.openai.chat_model);
    assert_eq!(loaded.index.store_dir, config.index.store_dir);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stockwise.json5");

    let mut config = Config::default();
    config.server.port = 9090;
    config.retrieval.k = 3;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.port, 9090);
    assert_eq!(loaded.retrieval.k, 3);
}

#[test]
fn test_json5_file_with_comments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stockwise.json5");
    std::fs::write(
        &path,
        r#"{
            // smaller answers
            retrieval: { k: 4 },
            server: { port: 8080, },
        }"#,
    )
    .unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.retrieval.k, 4);
    assert_eq!(loaded.server.port, 8080);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/stockwise.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}

#[test]
fn test_saved_config_never_leaks_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stockwise.json5");

    let mut config = Config::default();
    config.openai.api_key = Some("sk-test-secret".into());
    config.redacted().save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("sk-test-secret"));
}
