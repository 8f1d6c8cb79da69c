pub mod codec;
pub mod responder;

mod error;

pub use error::{Error, Result};
pub use responder::serve;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::{net::TcpStream, time};

/// One answer record as carried over the notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMessage {
	pub id: i64,
	pub question_id: i64,
	pub answer_id: i64,
	pub question: String,
	pub answer: String,
	pub star: i64,
}
impl AnswerMessage {
	pub fn encode(&self) -> Result<Vec<u8>> {
		codec::encode(self)
	}

	pub fn decode(bytes: &[u8]) -> Result<Self> {
		codec::decode(bytes)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
	Ack { message: String },
	Reject { reason: String },
}

/// Request/reply client for the notification endpoint.
///
/// Every request opens a fresh connection, writes one frame and waits for exactly one reply
/// frame.
#[derive(Debug, Clone)]
pub struct Client {
	endpoint: String,
	timeout_ms: u64,
	max_frame_bytes: u32,
}
impl Client {
	pub fn new(cfg: &sakura_config::Notify) -> Self {
		Self::with_endpoint(cfg.endpoint.clone(), cfg.timeout_ms, cfg.max_frame_bytes)
	}

	pub fn with_endpoint(endpoint: impl Into<String>, timeout_ms: u64, max_frame_bytes: u32) -> Self {
		Self { endpoint: endpoint.into(), timeout_ms, max_frame_bytes }
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Sends `message` and returns the acknowledgement text.
	///
	/// A `Reject` reply is reported as [`Error::Rejected`].
	pub async fn request(&self, message: &AnswerMessage) -> Result<String> {
		let reply = if self.timeout_ms == 0 {
			self.round_trip(message).await?
		} else {
			time::timeout(Duration::from_millis(self.timeout_ms), self.round_trip(message))
				.await
				.map_err(|_| Error::Timeout { timeout_ms: self.timeout_ms })??
		};

		match reply {
			Reply::Ack { message: ack } => {
				tracing::debug!(endpoint = %self.endpoint, answer_id = message.answer_id, "Notification acknowledged.");

				Ok(ack)
			},
			Reply::Reject { reason } => Err(Error::Rejected { reason }),
		}
	}

	async fn round_trip(&self, message: &AnswerMessage) -> Result<Reply> {
		let body = message.encode()?;
		let mut stream = TcpStream::connect(self.endpoint.as_str())
			.await
			.map_err(|err| Error::Connect { endpoint: self.endpoint.clone(), source: err })?;

		codec::write_frame(&mut stream, &body, self.max_frame_bytes).await?;

		let reply = codec::read_frame(&mut stream, self.max_frame_bytes).await?;

		codec::decode(&reply)
	}
}
