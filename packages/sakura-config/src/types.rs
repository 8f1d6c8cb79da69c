use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub index: Index,
	pub search: Search,
	pub notify: Notify,
	#[serde(default)]
	pub ingest: Ingest,
	#[serde(default)]
	pub outbox: Outbox,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub sqlite: Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sqlite {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_busy_timeout_ms")]
	pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Index {
	/// Memory budget handed to the single indexing thread.
	pub writer_heap_bytes: usize,
	/// Number of answer rows fetched per snapshot window.
	pub load_batch_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Query text used when a request carries none.
	pub default_text: String,
	pub default_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notify {
	/// `host:port` of the notification endpoint.
	pub endpoint: String,
	/// Upper bound for one request/reply round trip. Zero waits forever.
	pub timeout_ms: u64,
	#[serde(default = "default_max_frame_bytes")]
	pub max_frame_bytes: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ingest {
	pub delivery: DeliveryMode,
}

/// How an ingested answer reaches the notification endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DeliveryMode {
	/// Commit only after the endpoint acknowledges the record.
	#[default]
	Synchronous,
	/// Queue the notification in the same transaction and deliver it later.
	Outbox,
}
impl FromStr for DeliveryMode {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"synchronous" => Ok(Self::Synchronous),
			"outbox" => Ok(Self::Outbox),
			_ => Err(Error::Validation {
				message: format!(
					"ingest.delivery must be one of synchronous or outbox, got {value:?}."
				),
			}),
		}
	}
}
impl TryFrom<String> for DeliveryMode {
	type Error = Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Outbox {
	pub poll_interval_ms: u64,
	pub claim_lease_seconds: i64,
	pub base_backoff_ms: i64,
	pub max_backoff_ms: i64,
}
impl Default for Outbox {
	fn default() -> Self {
		Self {
			poll_interval_ms: 500,
			claim_lease_seconds: 30,
			base_backoff_ms: 500,
			max_backoff_ms: 30_000,
		}
	}
}

fn default_busy_timeout_ms() -> u64 {
	5_000
}

fn default_max_frame_bytes() -> u32 {
	1_048_576
}
