//! Layered configuration loading against real files

use dispatch_core::config::{ConfigLoader, ConfigurationError, RegistryConfig};
use dispatch_core::{CoercionMode, MethodDescriptor, MethodRegistry};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_toml_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "dispatch.toml",
        "suggest_methods = false\nnamespace_separator = \"::\"\n",
    );

    let config = ConfigLoader::new().without_env().with_file(&path).load().unwrap();
    assert!(!config.suggest_methods);
    assert_eq!(config.namespace_separator, "::");
    assert!(config.lenient_coercion);
}

#[test]
fn test_yaml_and_json_files() {
    let dir = TempDir::new().unwrap();
    let yaml = write(&dir, "dispatch.yaml", "lenient_coercion: false\n");
    let json_file = write(&dir, "dispatch.json", r#"{"namespace_separator": "/"}"#);

    let from_yaml = ConfigLoader::new().without_env().with_file(&yaml).load().unwrap();
    assert_eq!(from_yaml.coercion_mode(), CoercionMode::Strict);

    let from_json = ConfigLoader::new()
        .without_env()
        .with_file(&json_file)
        .load()
        .unwrap();
    assert_eq!(from_json.namespace_separator, "/");
}

#[test]
fn test_empty_separator_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "dispatch.toml", "namespace_separator = \"\"\n");

    let err = ConfigLoader::new()
        .without_env()
        .with_file(&path)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidValue { ref field, .. } if field == "namespace_separator"));
}

#[test]
fn test_malformed_file_is_load_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "dispatch.toml", "suggest_methods = [not toml\n");

    let err = ConfigLoader::new()
        .without_env()
        .with_file(&path)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::LoadError { .. }));
}

#[test]
fn test_loaded_config_drives_registry() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "dispatch.toml",
        "namespace_separator = \"/\"\nsuggest_methods = false\n",
    );
    let config = ConfigLoader::new().without_env().with_file(&path).load().unwrap();
    assert_ne!(config, RegistryConfig::default());

    let mut registry = MethodRegistry::from_config(config);
    registry.register(
        MethodDescriptor::builder("ping")
            .namespace("health")
            .handler(|_| Ok("pong".to_string()))
            .build()
            .unwrap(),
    );

    assert_eq!(registry.invoke("health/ping", &json!([])).unwrap(), json!("pong"));
    assert!(registry
        .invoke("health.ping", &json!([]))
        .unwrap_err()
        .suggestions()
        .is_none());
}
