pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Notification failed: {message}")]
	Notification { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Index error: {message}")]
	Index { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<sakura_storage::Error> for Error {
	fn from(err: sakura_storage::Error) -> Self {
		match err {
			sakura_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sakura_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			sakura_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<sakura_index::Error> for Error {
	fn from(err: sakura_index::Error) -> Self {
		Self::Index { message: err.to_string() }
	}
}

impl From<sakura_notify::Error> for Error {
	fn from(err: sakura_notify::Error) -> Self {
		Self::Notification { message: err.to_string() }
	}
}
