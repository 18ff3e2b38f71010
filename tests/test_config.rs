use eventkit::config::{BindingMode, Config, HttpConfig};
use eventkit::error::Error;

#[test]
fn test_config_default() {
    let cfg = Config::default();
    assert_eq!(cfg.http.mode, BindingMode::Binary);
    assert_eq!(cfg.http.format, "application/cloudevents+json");
    assert!(!cfg.http.include_attributes_in_headers);
}

#[test]
fn test_config_empty_document_uses_defaults() {
    let cfg = Config::from_yaml_str("{}").unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_structured_mode() {
    let cfg = Config::from_yaml_str(
        "http:\n  mode: structured\n  include_attributes_in_headers: true\n",
    )
    .unwrap();

    assert_eq!(
        cfg.http,
        HttpConfig {
            mode: BindingMode::Structured,
            include_attributes_in_headers: true,
            ..HttpConfig::default()
        }
    );
}

#[test]
fn test_config_custom_format() {
    let cfg = Config::from_yaml_str("http:\n  format: application/cloudevents+xml\n").unwrap();
    assert_eq!(cfg.http.format, "application/cloudevents+xml");
    assert_eq!(cfg.http.mode, BindingMode::Binary);
}

#[test]
fn test_config_unknown_mode_is_rejected() {
    let result = Config::from_yaml_str("http:\n  mode: batched\n");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_config_from_path() {
    let path = std::env::temp_dir().join(format!("eventkit-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "http:\n  mode: structured\n").unwrap();

    let cfg = Config::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.http.mode, BindingMode::Structured);
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_path("/nonexistent/eventkit.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::from_yaml_str("http:\n  mode: structured\n").unwrap();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}
