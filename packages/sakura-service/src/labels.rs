use std::collections::HashMap;

use sakura_storage::{db::Db, models::Label, queries};

use crate::Result;

/// Question id to its labels, in label row order. Duplicates are kept.
pub type LabelsByQuestion = HashMap<i64, Vec<String>>;

/// Scans the label table once.
pub async fn aggregate_labels(db: &Db) -> Result<LabelsByQuestion> {
	let rows = queries::fetch_labels(db).await?;

	Ok(group_labels(rows))
}

fn group_labels(rows: impl IntoIterator<Item = Label>) -> LabelsByQuestion {
	let mut grouped = LabelsByQuestion::new();

	for row in rows {
		grouped.entry(row.question_id).or_default().push(row.label);
	}

	grouped
}
