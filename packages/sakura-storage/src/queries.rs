use sqlx::{Executor, Sqlite, Transaction};

use crate::{
	Error, Result,
	db::Db,
	models::{Answer, Label, NewAnswer},
};

/// Reads the whole label table in row order.
pub async fn fetch_labels(db: &Db) -> Result<Vec<Label>> {
	let labels = sqlx::query_as::<_, Label>("SELECT id, question_id, label FROM label ORDER BY id")
		.fetch_all(&db.pool)
		.await?;

	Ok(labels)
}

/// Reads one window of answers ordered by row id.
pub async fn fetch_answer_window(db: &Db, offset: i64, limit: i64) -> Result<Vec<Answer>> {
	if offset < 0 || limit < 0 {
		return Err(Error::InvalidArgument(format!(
			"Answer window bounds must be non-negative, got offset {offset} and limit {limit}."
		)));
	}

	let answers = sqlx::query_as::<_, Answer>(
		"\
SELECT
	id,
	question_id,
	answer_id,
	question,
	answer,
	star
FROM answer
ORDER BY id
LIMIT $1 OFFSET $2",
	)
	.bind(limit)
	.bind(offset)
	.fetch_all(&db.pool)
	.await?;

	Ok(answers)
}

pub async fn answer_exists_tx(tx: &mut Transaction<'_, Sqlite>, answer_id: i64) -> Result<bool> {
	exists_exec(&mut **tx, "SELECT 1 FROM answer WHERE answer_id = $1 LIMIT 1", answer_id).await
}

pub async fn question_exists_tx(
	tx: &mut Transaction<'_, Sqlite>,
	question_id: i64,
) -> Result<bool> {
	exists_exec(&mut **tx, "SELECT 1 FROM answer WHERE question_id = $1 LIMIT 1", question_id)
		.await
}

/// Inserts one answer and returns its row id.
pub async fn insert_answer(db: &Db, answer: &NewAnswer) -> Result<i64> {
	insert_answer_exec(&db.pool, answer).await
}

pub async fn insert_answer_tx(tx: &mut Transaction<'_, Sqlite>, answer: &NewAnswer) -> Result<i64> {
	insert_answer_exec(&mut **tx, answer).await
}

pub async fn insert_labels(db: &Db, question_id: i64, labels: &[String]) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	insert_labels_tx(&mut tx, question_id, labels).await?;

	tx.commit().await?;

	Ok(())
}

pub async fn insert_labels_tx(
	tx: &mut Transaction<'_, Sqlite>,
	question_id: i64,
	labels: &[String],
) -> Result<()> {
	for label in labels {
		sqlx::query("INSERT INTO label (question_id, label) VALUES ($1, $2)")
			.bind(question_id)
			.bind(label.as_str())
			.execute(&mut **tx)
			.await?;
	}

	Ok(())
}

async fn exists_exec<'e, E>(executor: E, sql: &'static str, id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Sqlite>,
{
	let row: Option<i64> = sqlx::query_scalar(sql).bind(id).fetch_optional(executor).await?;

	Ok(row.is_some())
}

async fn insert_answer_exec<'e, E>(executor: E, answer: &NewAnswer) -> Result<i64>
where
	E: Executor<'e, Database = Sqlite>,
{
	let result = sqlx::query(
		"\
INSERT INTO answer (
	question_id,
	answer_id,
	question,
	answer,
	star
)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(answer.question_id)
	.bind(answer.answer_id)
	.bind(answer.question.as_str())
	.bind(answer.answer.as_str())
	.bind(answer.star)
	.execute(executor)
	.await
	.map_err(|err| match err.as_database_error() {
		Some(db_err) if db_err.is_unique_violation() =>
			Error::Conflict(format!("Answer {} already exists.", answer.answer_id)),
		_ => Error::Sqlx(err),
	})?;

	Ok(result.last_insert_rowid())
}
