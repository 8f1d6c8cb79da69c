use sakura_index::{AnswerIndex, IndexBuilder, ScoringPayload};
use sakura_storage::{db::Db, models::Answer, queries};

use crate::{
	Error, Result,
	hydration::{HydratedItem, HydrationCache},
	labels::{self, LabelsByQuestion},
};

/// The searchable index together with the records its hits resolve to.
pub struct Catalog {
	pub index: AnswerIndex,
	pub cache: HydrationCache,
}
impl Catalog {
	pub fn new(index: AnswerIndex, cache: HydrationCache) -> Self {
		Self { index, cache }
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
	pub answers: u64,
	pub windows: u64,
	pub labeled_questions: usize,
}

/// Builds the catalog from the current contents of the store.
///
/// Labels are aggregated before the first answer is read, so labels written during the load
/// are not seen. Answers are read in row id windows until a window comes back empty.
pub async fn load_snapshot(db: &Db, cfg: &sakura_config::Index) -> Result<(Catalog, LoadReport)> {
	let labels = labels::aggregate_labels(db).await?;
	let mut builder = IndexBuilder::new(cfg)?;
	let mut cache = HydrationCache::default();
	let mut report = LoadReport { labeled_questions: labels.len(), ..LoadReport::default() };
	let batch = i64::from(cfg.load_batch_size);
	let mut offset = 0_i64;

	loop {
		let window = queries::fetch_answer_window(db, offset, batch).await?;

		if window.is_empty() {
			break;
		}

		report.windows += 1;

		for answer in window {
			let item = hydrate(answer, &labels)?;
			let text = format!("{} {}", item.question_text, item.answer_text);

			builder.index_document(
				item.answer_id,
				&text,
				&ScoringPayload::Popularity { star_count: item.star_count },
				&item.labels,
			)?;
			cache.insert(item);

			report.answers += 1;
		}

		tracing::debug!(offset, windows = report.windows, "Snapshot window indexed.");

		offset += batch;
	}

	let index = builder.flush()?;

	tracing::info!(
		answers = report.answers,
		windows = report.windows,
		labeled_questions = report.labeled_questions,
		cached = cache.len(),
		"Snapshot loaded."
	);

	Ok((Catalog::new(index, cache), report))
}

fn hydrate(answer: Answer, labels: &LabelsByQuestion) -> Result<HydratedItem> {
	let star_count = u64::try_from(answer.star).map_err(|_| Error::Storage {
		message: format!("Answer {} has a negative star count {}.", answer.answer_id, answer.star),
	})?;

	Ok(HydratedItem {
		question_id: answer.question_id,
		answer_id: answer.answer_id,
		question_text: answer.question,
		answer_text: answer.answer,
		star_count,
		labels: labels.get(&answer.question_id).cloned().unwrap_or_default(),
	})
}
