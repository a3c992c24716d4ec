//! Unit tests for configuration loading

use mesh_gateway::config::{Settings, StoreSettings};
use std::io::Write;

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let settings = Settings::load_from_path("does/not/exist.toml").unwrap();

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.gateway.health_check_timeout_ms, 5000);
    assert_eq!(settings.backends.len(), 2);
    assert_eq!(settings.backends["user"].health_check_path, "/health");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_from_file() {
    let file = toml_file(
        r#"
[server]
port = 9090

[logging]
level = "debug"
format = "pretty"

[gateway]
forward_timeout_ms = 0
health_check_timeout_ms = 1500

[backends.user]
url = "http://localhost:5000"

[backends.product]
url = "http://localhost:5001"
health_check_path = "/healthz"
display_name = "Catalog"
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9090);
    assert_eq!(settings.logging.format, "pretty");
    assert_eq!(settings.gateway.forward_timeout_ms, 0);
    assert_eq!(settings.gateway.health_check_timeout_ms, 1500);

    let product = &settings.backends["product"];
    assert_eq!(product.url, "http://localhost:5001");
    assert_eq!(product.health_check_path, "/healthz");
    assert_eq!(product.display_name_for("product"), "Catalog");
    assert_eq!(product.service_id_for("product"), "product-service");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_extra_backend_from_file() {
    let file = toml_file(
        r#"
[backends.inventory]
url = "http://localhost:5002"
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.backends.len(), 3);
    assert_eq!(settings.backends["inventory"].url, "http://localhost:5002");
    assert!(settings.backends.contains_key("user"));
}

#[test]
fn test_environment_overrides_file() {
    let file = toml_file(
        r#"
[backends.user]
url = "http://localhost:5000"
"#,
    );

    std::env::set_var("MESH_GATEWAY__BACKENDS__USER__URL", "http://10.0.0.7:5000");
    let settings = Settings::load_from_path(file.path());
    std::env::remove_var("MESH_GATEWAY__BACKENDS__USER__URL");

    assert_eq!(settings.unwrap().backends["user"].url, "http://10.0.0.7:5000");
}

#[test]
fn test_store_settings_defaults() {
    let settings = StoreSettings::load_from_path("product-service", 5001, "missing.toml").unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5001);
    assert_eq!(settings.logging.level, "info");
}
