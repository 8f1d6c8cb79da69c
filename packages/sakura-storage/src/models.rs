use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Answer {
	pub id: i64,
	pub question_id: i64,
	pub answer_id: i64,
	pub question: String,
	pub answer: String,
	pub star: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Label {
	pub id: i64,
	pub question_id: i64,
	pub label: String,
}

/// An answer row that has not been assigned a row id yet.
#[derive(Debug, Clone)]
pub struct NewAnswer {
	pub question_id: i64,
	pub answer_id: i64,
	pub question: String,
	pub answer: String,
	pub star: i64,
}

/// Timestamps are unix milliseconds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationOutboxEntry {
	pub outbox_id: Uuid,
	pub answer_id: i64,
	pub payload: Vec<u8>,
	pub status: String,
	pub attempts: i64,
	pub last_error: Option<String>,
	pub available_at: i64,
	pub created_at: i64,
	pub updated_at: i64,
}
