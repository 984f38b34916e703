use boardsync::config::Config;
use boardsync::core::reader::FetchOptions;
use boardsync::errors::AppError;
use boardsync::models::Domain;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

#[test]
fn test_partial_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boardsync.conf");
    fs::write(
        &path,
        "database: /tmp/bs.sqlite\napi_key: abc\nboards:\n  materials: \"1234567890\"\npage_size: 100\n",
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();

    assert_eq!(cfg.database, "/tmp/bs.sqlite");
    assert_eq!(cfg.api_url, "https://api.monday.com/v2");
    assert_eq!(cfg.page_size, 100);
    assert_eq!(cfg.page_delay_ms, 1000);
    assert_eq!(cfg.write_delay_ms, 200);
    assert_eq!(cfg.views.materials, "material_master_v");
    assert_eq!(cfg.views.customers, "customer_master_v");
    assert_eq!(cfg.board_for(Domain::Materials).unwrap(), "1234567890");
    assert!(cfg.notify_to.is_none());

    let fetch = FetchOptions::from(&cfg);
    assert_eq!(fetch.page_size, 100);
    assert_eq!(fetch.rate_limit_backoff, Duration::from_secs(5));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::load_from(&dir.path().join("absent.conf")).unwrap();
    assert_eq!(cfg.max_rate_limit_retries, 5);
    assert!(cfg.api_key.is_empty());
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.conf");
    fs::write(&path, "database: [unterminated\n").unwrap();

    assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
}

#[test]
fn test_environment_overrides() {
    let mut cfg = Config::default();
    let env: HashMap<&str, &str> = HashMap::from([
        ("MONDAY_API_KEY", "from-env"),
        ("BOARDSYNC_CUSTOMERS_BOARD", "998877"),
        ("BOARDSYNC_NOTIFY_TO", "ops@example.com"),
        ("BOARDSYNC_DATABASE", "  "),
    ]);
    let before = cfg.database.clone();

    cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.api_key, "from-env");
    assert_eq!(cfg.board_for(Domain::Customers).unwrap(), "998877");
    assert_eq!(cfg.notify_to.as_deref(), Some("ops@example.com"));
    // blank values are ignored
    assert_eq!(cfg.database, before);
}

#[test]
fn test_unconfigured_board_is_an_error() {
    let cfg = Config::default();
    assert!(matches!(
        cfg.board_for(Domain::Materials),
        Err(AppError::MissingBoard(ref d)) if d == "materials"
    ));
}

#[test]
fn test_masked_yaml_hides_the_key() {
    let mut cfg = Config::default();
    cfg.api_key = "eyJhbGciOiJIUzI1NiJ9.secret.wxyz".into();

    let yaml = cfg.to_masked_yaml().unwrap();
    assert!(yaml.contains("****wxyz"));
    assert!(!yaml.contains("secret"));
}

#[test]
fn test_domain_mapping_uses_configured_view() {
    let mut cfg = Config::default();
    cfg.views.customers = "crm_customers_v".into();

    let mapping = Domain::Customers.mapping(cfg.view_for(Domain::Customers));
    assert_eq!(mapping.source_view, "crm_customers_v");
    assert_eq!(mapping.key_column, "customer_code");
    assert_eq!(Domain::Materials.mapping(cfg.view_for(Domain::Materials)).source_view, "material_master_v");
}
