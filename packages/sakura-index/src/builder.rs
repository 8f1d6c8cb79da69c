use tantivy::{
	Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
	tokenizer::{LowerCaser, TextAnalyzer},
};

use crate::{
	AnswerIndex, Result,
	schema::{self, AnswerFields},
	scoring::ScoringPayload,
	tokenizer::WordTokenizer,
};

/// Collects answer documents in memory. [`IndexBuilder::flush`] turns it into a searchable
/// [`AnswerIndex`].
pub struct IndexBuilder {
	index: Index,
	fields: AnswerFields,
	writer: IndexWriter,
	documents: u64,
}
impl IndexBuilder {
	pub fn new(cfg: &sakura_config::Index) -> Result<Self> {
		let (schema, fields) = schema::build_schema();
		let index = Index::create_in_ram(schema);

		index.tokenizers().register(
			schema::WORD_TOKENIZER,
			TextAnalyzer::builder(WordTokenizer).filter(LowerCaser).build(),
		);

		// A single indexing thread keeps segment layout, and so tie order, stable across loads.
		let writer: IndexWriter = index.writer_with_num_threads(1, cfg.writer_heap_bytes)?;

		Ok(Self { index, fields, writer, documents: 0 })
	}

	/// Adds one document. A document already indexed under `answer_id` is replaced.
	pub fn index_document(
		&mut self,
		answer_id: i64,
		text: &str,
		payload: &ScoringPayload,
		labels: &[String],
	) -> Result<()> {
		let mut document = TantivyDocument::default();

		document.add_i64(self.fields.answer_id, answer_id);
		document.add_text(self.fields.content, text);
		document.add_u64(self.fields.payload_kind, payload.kind());

		if let ScoringPayload::Popularity { star_count } = payload {
			document.add_u64(self.fields.star_count, *star_count);
		}

		for label in labels {
			document.add_text(self.fields.labels, label);
		}

		self.writer.delete_term(Term::from_field_i64(self.fields.answer_id, answer_id));
		self.writer.add_document(document)?;

		self.documents += 1;

		Ok(())
	}

	pub fn flush(mut self) -> Result<AnswerIndex> {
		self.writer.commit()?;
		self.writer.wait_merging_threads()?;

		let reader: IndexReader =
			self.index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let searcher = reader.searcher();

		tracing::info!(
			submitted = self.documents,
			live = searcher.num_docs(),
			segments = searcher.segment_readers().len(),
			"Answer index flushed."
		);

		Ok(AnswerIndex::new(self.index, self.fields, reader))
	}
}
