use std::{future::Future, time::Duration as StdDuration};

use time::{Duration, OffsetDateTime};
use tokio::time as tokio_time;
use uuid::Uuid;

use sakura_notify::{AnswerMessage, Client};
use sakura_storage::{db::Db, models::NotificationOutboxEntry, outbox};

use crate::Result;

const MAX_OUTBOX_ERROR_CHARS: usize = 1_024;
const MAX_BACKOFF_EXPONENT: u32 = 6;

pub struct WorkerState {
	pub db: Db,
	pub client: Client,
	pub outbox: sakura_config::Outbox,
}

/// What one dispatch pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
	Idle,
	Delivered { outbox_id: Uuid },
	Failed { outbox_id: Uuid, attempts: i64 },
}

/// Polls the outbox until `shutdown` resolves.
pub async fn run_worker<S>(state: WorkerState, shutdown: S) -> Result<()>
where
	S: Future<Output = ()>,
{
	let poll_interval = StdDuration::from_millis(state.outbox.poll_interval_ms);

	tokio::pin!(shutdown);

	loop {
		let idle = match process_outbox_once(&state).await {
			Ok(dispatch) => dispatch == Dispatch::Idle,
			Err(err) => {
				tracing::error!(error = %err, "Notification outbox processing failed.");

				true
			},
		};

		// Drain due jobs back to back and only sleep once the queue is idle.
		if !idle {
			continue;
		}

		tokio::select! {
			_ = &mut shutdown => {
				tracing::info!("Outbox dispatcher stopping.");

				return Ok(());
			},
			_ = tokio_time::sleep(poll_interval) => {},
		}
	}
}

pub async fn process_outbox_once(state: &WorkerState) -> Result<Dispatch> {
	let now = OffsetDateTime::now_utc();
	let Some(job) = outbox::claim_next_job(&state.db, now, state.outbox.claim_lease_seconds).await?
	else {
		return Ok(Dispatch::Idle);
	};

	match deliver(&state.client, &job).await {
		Ok(reply) => {
			outbox::mark_done(&state.db, job.outbox_id, OffsetDateTime::now_utc()).await?;

			tracing::info!(
				outbox_id = %job.outbox_id,
				answer_id = job.answer_id,
				%reply,
				"Notification delivered."
			);

			Ok(Dispatch::Delivered { outbox_id: job.outbox_id })
		},
		Err(err) => {
			let attempts = job.attempts.saturating_add(1);
			let now = OffsetDateTime::now_utc();
			let available_at = now + backoff_for_attempt(attempts, &state.outbox);
			let error_text = truncate_outbox_error(&err.to_string());

			outbox::mark_failed(&state.db, job.outbox_id, attempts, &error_text, available_at, now)
				.await?;

			tracing::error!(
				outbox_id = %job.outbox_id,
				answer_id = job.answer_id,
				attempts,
				error = %err,
				"Notification delivery failed."
			);

			Ok(Dispatch::Failed { outbox_id: job.outbox_id, attempts })
		},
	}
}

async fn deliver(client: &Client, job: &NotificationOutboxEntry) -> sakura_notify::Result<String> {
	let message = AnswerMessage::decode(&job.payload)?;

	client.request(&message).await
}

fn backoff_for_attempt(attempt: i64, cfg: &sakura_config::Outbox) -> Duration {
	let exp = attempt.max(1).saturating_sub(1).min(i64::from(MAX_BACKOFF_EXPONENT)) as u32;
	let base = cfg.base_backoff_ms.saturating_mul(1 << exp);

	Duration::milliseconds(base.min(cfg.max_backoff_ms))
}

/// Bounds `last_error`. Reject reasons come from the remote endpoint and have no length limit.
fn truncate_outbox_error(text: &str) -> String {
	let mut out = text.split_whitespace().collect::<Vec<_>>().join(" ");

	if out.chars().count() > MAX_OUTBOX_ERROR_CHARS {
		out = out.chars().take(MAX_OUTBOX_ERROR_CHARS).collect();
		out.push_str("...");
	}

	out
}
