use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use sakura_config::DeliveryMode;
use sakura_notify::AnswerMessage;
use sakura_storage::{db::Db, models::NewAnswer, outbox, queries};

use crate::{Error, Notifier, Result};

pub const MAX_LABEL_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
	pub question_id: i64,
	pub answer_id: i64,
	pub question: String,
	pub answer: String,
	pub star: i64,
	/// Written only when the question has no earlier answers.
	#[serde(default)]
	pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
	pub row_id: i64,
	pub answer_id: i64,
	pub delivery: DeliveryMode,
	pub outbox_id: Option<Uuid>,
	/// Acknowledgement text, present for synchronous delivery.
	pub reply: Option<String>,
}

pub struct IngestWriter {
	db: Db,
	notifier: Arc<dyn Notifier>,
	delivery: DeliveryMode,
}
impl IngestWriter {
	pub fn new(db: Db, notifier: Arc<dyn Notifier>, delivery: DeliveryMode) -> Self {
		Self { db, notifier, delivery }
	}

	pub async fn ingest(&self, req: IngestRequest) -> Result<IngestResponse> {
		validate(&req)?;

		let mut tx = self.db.pool.begin().await?;

		if queries::answer_exists_tx(&mut tx, req.answer_id).await? {
			return Err(Error::Conflict {
				message: format!("Answer {} already exists.", req.answer_id),
			});
		}

		let new_question = !queries::question_exists_tx(&mut tx, req.question_id).await?;
		let row_id = queries::insert_answer_tx(
			&mut tx,
			&NewAnswer {
				question_id: req.question_id,
				answer_id: req.answer_id,
				question: req.question.clone(),
				answer: req.answer.clone(),
				star: req.star,
			},
		)
		.await?;

		if new_question {
			queries::insert_labels_tx(&mut tx, req.question_id, &req.labels).await?;
		}

		let message = AnswerMessage {
			id: row_id,
			question_id: req.question_id,
			answer_id: req.answer_id,
			question: req.question,
			answer: req.answer,
			star: req.star,
		};

		match self.delivery {
			DeliveryMode::Synchronous => match self.notifier.notify(&message).await {
				Ok(reply) => {
					tx.commit().await?;

					tracing::info!(
						answer_id = message.answer_id,
						row_id,
						"Answer committed after acknowledgement."
					);

					Ok(IngestResponse {
						row_id,
						answer_id: message.answer_id,
						delivery: self.delivery,
						outbox_id: None,
						reply: Some(reply),
					})
				},
				Err(err) => {
					if let Err(rollback_err) = tx.rollback().await {
						tracing::error!(error = %rollback_err, "Failed to roll back ingestion.");
					}

					tracing::warn!(
						answer_id = message.answer_id,
						error = %err,
						"Notification failed. Ingestion rolled back."
					);

					Err(err.into())
				},
			},
			DeliveryMode::Outbox => {
				let payload = message.encode()?;
				let outbox_id =
					outbox::enqueue(&mut *tx, message.answer_id, &payload, OffsetDateTime::now_utc())
						.await?;

				tx.commit().await?;

				tracing::info!(
					answer_id = message.answer_id,
					row_id,
					%outbox_id,
					"Answer committed with queued notification."
				);

				Ok(IngestResponse {
					row_id,
					answer_id: message.answer_id,
					delivery: self.delivery,
					outbox_id: Some(outbox_id),
					reply: None,
				})
			},
		}
	}
}

fn validate(req: &IngestRequest) -> Result<()> {
	for (name, value) in
		[("question_id", req.question_id), ("answer_id", req.answer_id), ("star", req.star)]
	{
		if value < 0 {
			return Err(Error::InvalidRequest { message: format!("{name} must be non-negative.") });
		}
	}

	for label in &req.labels {
		if label.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "labels must be non-empty.".to_string() });
		}
		if label.chars().count() > MAX_LABEL_CHARS {
			return Err(Error::InvalidRequest {
				message: format!("labels must be at most {MAX_LABEL_CHARS} characters."),
			});
		}
	}

	Ok(())
}
