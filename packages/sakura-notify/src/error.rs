pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to connect to notification endpoint {endpoint}: {source}.")]
	Connect { endpoint: String, source: std::io::Error },
	#[error("Failed to send notification frame: {0}.")]
	Send(std::io::Error),
	#[error("Failed to receive notification frame: {0}.")]
	Receive(std::io::Error),
	#[error("Notification frame of {len} bytes exceeds the limit of {max} bytes.")]
	FrameTooLarge { len: usize, max: u32 },
	#[error("Failed to encode or decode notification payload: {0}.")]
	Codec(#[from] bincode::Error),
	#[error("Notification endpoint rejected the message: {reason}.")]
	Rejected { reason: String },
	#[error("Notification round trip exceeded {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
}
