use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use ubl_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("ubl_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> ubl_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = ubl_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config should load.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.capture.index_names, vec!["products".to_string(), "articles".to_string()]);
	assert_eq!(cfg.capture.index_filter.mode, "off");
	assert_eq!(cfg.capture.store.naming, "target_index");
	assert_eq!(cfg.capture.store.default_name, "default");
	assert_eq!(cfg.storage.postgres.as_ref().map(|pg| pg.pool_max_conns), Some(4));
	assert_eq!(cfg.worker.max_attempts, 8);
}

#[test]
fn minimal_config_uses_defaults() {
	let payload = "\
[service]
log_level = \"debug\"

[capture]
"
	.to_string();
	let cfg = load_payload(payload).expect("Minimal config should load.");

	assert!(cfg.capture.index_names.is_empty());
	assert_eq!(cfg.capture.index_filter.mode, "off");
	assert_eq!(cfg.capture.store.naming, "target_index");
	assert_eq!(cfg.capture.store.default_name, "default");
	assert!(cfg.storage.postgres.is_none());
	assert_eq!(cfg.worker.poll_interval_ms, 500);
	assert_eq!(cfg.worker.lease_seconds, 30);
}

#[test]
fn index_names_are_split_trimmed_and_deduplicated() {
	let names = Value::Array(vec![
		Value::String(" products , articles".to_string()),
		Value::String("products".to_string()),
		Value::String("  ".to_string()),
		Value::String("logs,".to_string()),
	]);
	let cfg = load_payload(sample_toml_with(&["capture"], "index_names", names))
		.expect("Config should load.");

	assert_eq!(
		cfg.capture.index_names,
		vec!["products".to_string(), "articles".to_string(), "logs".to_string()]
	);
}

#[test]
fn index_filter_mode_is_normalized() {
	let cfg = load_payload(sample_toml_with(
		&["capture", "index_filter"],
		"mode",
		Value::String(" ALL ".to_string()),
	))
	.expect("Config should load.");

	assert_eq!(cfg.capture.index_filter.mode, "all");
}

#[test]
fn index_filter_mode_must_be_known() {
	expect_validation(
		sample_toml_with(&["capture", "index_filter"], "mode", Value::String("some".to_string())),
		"capture.index_filter.mode must be one of off, all, or any.",
	);
}

#[test]
fn active_index_filter_requires_index_names() {
	let mut value: Value = toml::from_str(&sample_toml_with(
		&["capture", "index_filter"],
		"mode",
		Value::String("any".to_string()),
	))
	.expect("Failed to parse config.");

	value
		.get_mut("capture")
		.and_then(Value::as_table_mut)
		.expect("Config must include [capture].")
		.insert("index_names".to_string(), Value::Array(Vec::new()));

	expect_validation(
		toml::to_string(&value).expect("Failed to render config."),
		"capture.index_names must be non-empty when capture.index_filter.mode is not off.",
	);
}

#[test]
fn inactive_index_filter_allows_empty_index_names() {
	let cfg = load_payload(sample_toml_with(&["capture"], "index_names", Value::Array(Vec::new())))
		.expect("Config should load.");

	assert!(cfg.capture.index_names.is_empty());
}

#[test]
fn store_naming_must_be_known() {
	expect_validation(
		sample_toml_with(&["capture", "store"], "naming", Value::String("tenant".to_string())),
		"capture.store.naming must be one of fixed or target_index.",
	);
}

#[test]
fn blank_default_store_name_is_rejected() {
	expect_validation(
		sample_toml_with(&["capture", "store"], "default_name", Value::String("   ".to_string())),
		"capture.store.default_name must be non-empty.",
	);
}

#[test]
fn postgres_pool_must_have_connections() {
	expect_validation(
		sample_toml_with(&["storage", "postgres"], "pool_max_conns", Value::Integer(0)),
		"storage.postgres.pool_max_conns must be greater than zero.",
	);
}

#[test]
fn worker_limits_must_be_positive() {
	expect_validation(
		sample_toml_with(&["worker"], "lease_seconds", Value::Integer(0)),
		"worker.lease_seconds must be greater than zero.",
	);
	expect_validation(
		sample_toml_with(&["worker"], "max_attempts", Value::Integer(-1)),
		"worker.max_attempts must be greater than zero.",
	);
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("ubl_config_test_missing.toml");
	let err = ubl_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}
