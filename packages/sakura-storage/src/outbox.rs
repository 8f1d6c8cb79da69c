use sqlx::{Executor, Sqlite};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, db::Db, models::NotificationOutboxEntry};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_FAILED: &str = "FAILED";
pub const STATUS_DONE: &str = "DONE";

const SELECT_COLUMNS: &str = "\
SELECT
	outbox_id,
	answer_id,
	payload,
	status,
	attempts,
	last_error,
	available_at,
	created_at,
	updated_at
FROM notification_outbox";

/// Unix milliseconds, the timestamp unit of the outbox table.
pub fn unix_millis(at: OffsetDateTime) -> i64 {
	(at.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Records a pending notification inside the caller's transaction and returns its id.
pub async fn enqueue<'e, E>(
	executor: E,
	answer_id: i64,
	payload: &[u8],
	now: OffsetDateTime,
) -> Result<Uuid>
where
	E: Executor<'e, Database = Sqlite>,
{
	let outbox_id = Uuid::new_v4();
	let now = unix_millis(now);

	sqlx::query(
		"\
INSERT INTO notification_outbox (
	outbox_id,
	answer_id,
	payload,
	status,
	attempts,
	available_at,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, 'PENDING', 0, $4, $4, $4)",
	)
	.bind(outbox_id)
	.bind(answer_id)
	.bind(payload)
	.bind(now)
	.execute(executor)
	.await?;

	Ok(outbox_id)
}

/// Claims the oldest due job by pushing its `available_at` past the lease.
///
/// The update only lands when `available_at` still holds the value that was read, so two
/// dispatchers racing for one row cannot both win it. A lost race reports no job.
pub async fn claim_next_job(
	db: &Db,
	now: OffsetDateTime,
	lease_seconds: i64,
) -> Result<Option<NotificationOutboxEntry>> {
	let now_ms = unix_millis(now);
	let sql = format!(
		"{SELECT_COLUMNS}
WHERE status IN ('PENDING', 'FAILED') AND available_at <= $1
ORDER BY available_at ASC, created_at ASC
LIMIT 1"
	);
	let row = sqlx::query_as::<_, NotificationOutboxEntry>(&sql)
		.bind(now_ms)
		.fetch_optional(&db.pool)
		.await?;
	let Some(mut job) = row else {
		return Ok(None);
	};
	let lease_until = now_ms + lease_seconds.saturating_mul(1_000);
	let claimed = sqlx::query(
		"\
UPDATE notification_outbox
SET available_at = $1,
	updated_at = $2
WHERE outbox_id = $3 AND status = $4 AND available_at = $5",
	)
	.bind(lease_until)
	.bind(now_ms)
	.bind(job.outbox_id)
	.bind(job.status.as_str())
	.bind(job.available_at)
	.execute(&db.pool)
	.await?;

	if claimed.rows_affected() == 0 {
		return Ok(None);
	}

	job.available_at = lease_until;
	job.updated_at = now_ms;

	Ok(Some(job))
}

pub async fn mark_done(db: &Db, outbox_id: Uuid, now: OffsetDateTime) -> Result<()> {
	sqlx::query(
		"UPDATE notification_outbox SET status = 'DONE', last_error = NULL, updated_at = $1 WHERE outbox_id = $2",
	)
	.bind(unix_millis(now))
	.bind(outbox_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn mark_failed(
	db: &Db,
	outbox_id: Uuid,
	attempts: i64,
	error_text: &str,
	available_at: OffsetDateTime,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE notification_outbox
SET status = 'FAILED',
	attempts = $1,
	last_error = $2,
	available_at = $3,
	updated_at = $4
WHERE outbox_id = $5",
	)
	.bind(attempts)
	.bind(error_text)
	.bind(unix_millis(available_at))
	.bind(unix_millis(now))
	.bind(outbox_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_entry(db: &Db, outbox_id: Uuid) -> Result<Option<NotificationOutboxEntry>> {
	let sql = format!("{SELECT_COLUMNS}\nWHERE outbox_id = $1");
	let entry = sqlx::query_as::<_, NotificationOutboxEntry>(&sql)
		.bind(outbox_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(entry)
}
