mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Capture, Config, IndexFilter, Postgres, Service, Storage, Store, Worker};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let filter_mode = cfg.capture.index_filter.mode.as_str();

	if !matches!(filter_mode, "off" | "all" | "any") {
		return Err(Error::Validation {
			message: "capture.index_filter.mode must be one of off, all, or any.".to_string(),
		});
	}
	if filter_mode != "off" && cfg.capture.index_names.is_empty() {
		return Err(Error::Validation {
			message: "capture.index_names must be non-empty when capture.index_filter.mode is not off."
				.to_string(),
		});
	}
	if !matches!(cfg.capture.store.naming.as_str(), "fixed" | "target_index") {
		return Err(Error::Validation {
			message: "capture.store.naming must be one of fixed or target_index.".to_string(),
		});
	}
	if cfg.capture.store.default_name.is_empty() {
		return Err(Error::Validation {
			message: "capture.store.default_name must be non-empty.".to_string(),
		});
	}

	if let Some(postgres) = cfg.storage.postgres.as_ref() {
		if postgres.dsn.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.postgres.dsn must be non-empty.".to_string(),
			});
		}
		if postgres.pool_max_conns == 0 {
			return Err(Error::Validation {
				message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
			});
		}
	}

	if cfg.worker.poll_interval_ms == 0 {
		return Err(Error::Validation {
			message: "worker.poll_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.worker.lease_seconds <= 0 {
		return Err(Error::Validation {
			message: "worker.lease_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.worker.max_attempts <= 0 {
		return Err(Error::Validation {
			message: "worker.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.worker.done_retention_hours <= 0 {
		return Err(Error::Validation {
			message: "worker.done_retention_hours must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

pub fn normalize(cfg: &mut Config) {
	let mut index_names = Vec::new();

	for name in cfg.capture.index_names.iter().flat_map(|entry| entry.split(',')) {
		let name = name.trim();

		if !name.is_empty() && !index_names.iter().any(|known: &String| known == name) {
			index_names.push(name.to_string());
		}
	}

	cfg.capture.index_names = index_names;
	cfg.capture.index_filter.mode = cfg.capture.index_filter.mode.trim().to_ascii_lowercase();
	cfg.capture.store.naming = cfg.capture.store.naming.trim().to_ascii_lowercase();
	cfg.capture.store.default_name = cfg.capture.store.default_name.trim().to_string();
}
