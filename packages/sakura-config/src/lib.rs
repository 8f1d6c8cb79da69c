mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, DeliveryMode, Index, Ingest, Notify, Outbox, Search, Service, Sqlite, Storage};

use std::{fs, path::Path};

/// Smallest per-thread indexing budget the index writer accepts.
pub const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;
/// Largest per-thread indexing budget the index writer accepts.
pub const MAX_WRITER_HEAP_BYTES: usize = 4_000_000_000;

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
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.sqlite.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.sqlite.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.sqlite.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.sqlite.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !(MIN_WRITER_HEAP_BYTES..=MAX_WRITER_HEAP_BYTES).contains(&cfg.index.writer_heap_bytes) {
		return Err(Error::Validation {
			message: format!(
				"index.writer_heap_bytes must be in the range {MIN_WRITER_HEAP_BYTES}-{MAX_WRITER_HEAP_BYTES}."
			),
		});
	}
	if cfg.index.load_batch_size == 0 {
		return Err(Error::Validation {
			message: "index.load_batch_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_text.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.default_text must be non-empty.".to_string(),
		});
	}
	if cfg.notify.endpoint.trim().is_empty() {
		return Err(Error::Validation {
			message: "notify.endpoint must be non-empty.".to_string(),
		});
	}
	if cfg.notify.max_frame_bytes == 0 {
		return Err(Error::Validation {
			message: "notify.max_frame_bytes must be greater than zero.".to_string(),
		});
	}
	if cfg.outbox.poll_interval_ms == 0 {
		return Err(Error::Validation {
			message: "outbox.poll_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.outbox.claim_lease_seconds <= 0 {
		return Err(Error::Validation {
			message: "outbox.claim_lease_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.outbox.base_backoff_ms <= 0 {
		return Err(Error::Validation {
			message: "outbox.base_backoff_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.outbox.max_backoff_ms < cfg.outbox.base_backoff_ms {
		return Err(Error::Validation {
			message: "outbox.max_backoff_ms must be greater than or equal to outbox.base_backoff_ms."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.notify.endpoint = cfg.notify.endpoint.trim().to_string();

	if let Some(endpoint) = cfg.notify.endpoint.strip_prefix("tcp://") {
		cfg.notify.endpoint = endpoint.to_string();
	}
}
