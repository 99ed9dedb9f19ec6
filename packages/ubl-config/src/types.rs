use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub capture: Capture,
	#[serde(default)]
	pub storage: Storage,
	#[serde(default)]
	pub worker: Worker,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Capture {
	/// Index names eligible for capture. Entries may also be comma-separated lists.
	#[serde(default)]
	pub index_names: Vec<String>,
	#[serde(default)]
	pub index_filter: IndexFilter,
	#[serde(default)]
	pub store: Store,
}

#[derive(Debug, Deserialize)]
pub struct IndexFilter {
	/// One of "off", "all" or "any".
	#[serde(default = "default_index_filter_mode")]
	pub mode: String,
}
impl Default for IndexFilter {
	fn default() -> Self {
		Self { mode: default_index_filter_mode() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Store {
	/// One of "fixed" or "target_index".
	#[serde(default = "default_store_naming")]
	pub naming: String,
	#[serde(default = "default_store_name")]
	pub default_name: String,
}
impl Default for Store {
	fn default() -> Self {
		Self { naming: default_store_naming(), default_name: default_store_name() }
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct Storage {
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Worker {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_lease_seconds")]
	pub lease_seconds: i64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: i32,
	/// Completed outbox rows older than this are purged.
	#[serde(default = "default_done_retention_hours")]
	pub done_retention_hours: i64,
}
impl Default for Worker {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			lease_seconds: default_lease_seconds(),
			max_attempts: default_max_attempts(),
			done_retention_hours: default_done_retention_hours(),
		}
	}
}

fn default_index_filter_mode() -> String {
	"off".to_string()
}

fn default_store_naming() -> String {
	"target_index".to_string()
}

fn default_store_name() -> String {
	"default".to_string()
}

fn default_poll_interval_ms() -> u64 {
	500
}

fn default_lease_seconds() -> i64 {
	30
}

fn default_max_attempts() -> i32 {
	8
}

fn default_done_retention_hours() -> i64 {
	24
}
