//! Integration tests for configuration loading

use occupancy_dashboard::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[server]
port = 8080
page_path = "web/dashboard.html"

[store]
uri = "mongodb://db-host:27017"
database = "test-db"
people_collection = "people"
vip_collection = "vip"
front_collection = "front"
people_doc_id = "people_doc"
vehicle_doc_id = "vehicle_doc"

[people]
designated_stream = "stream_3"

[vehicles]
motorcycle = 1
car = 3
truck = 8
bus = 15
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.port(), 8080);
    assert_eq!(config.page_path(), "web/dashboard.html");
    assert_eq!(config.store().database, "test-db");
    assert_eq!(config.store().people_collection, "people");
    assert_eq!(config.store().people_doc_id, "people_doc");
    assert_eq!(config.designated_stream(), "stream_3");
    assert_eq!(config.multipliers().car, 3);
    assert_eq!(config.multipliers().bus, 15);
}

#[test]
fn test_partial_file_fills_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[server]\nport = 9000\n").unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.port(), 9000);
    assert_eq!(config.designated_stream(), "stream_0");
    assert_eq!(config.store().people_doc_id, "full_dashboard_data");
    assert_eq!(config.multipliers().truck, 10);
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.port(), 5000);
    assert_eq!(config.store().vehicle_doc_id, "vehicle_count_data");
}
