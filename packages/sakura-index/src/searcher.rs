use std::sync::Arc;

use tantivy::{
	DocAddress, DocId, Index, IndexReader, Score, Searcher, SegmentReader, Term,
	collector::{Count, TopDocs},
	query::{BooleanQuery, ConstScoreQuery, Occur, PhraseQuery, Query, TermQuery},
	schema::IndexRecordOption,
	tokenizer::{TextAnalyzer, TokenStream},
};

use crate::{
	Error, Result,
	schema::{self, AnswerFields},
	scoring::{RankingVector, ScoringCriteria, ScoringPayload},
};

#[derive(Clone, Debug, Default)]
pub struct SearchRequest {
	pub text: String,
	/// When set, only documents carrying exactly this label match.
	pub label: Option<String>,
	pub offset: usize,
	pub limit: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutput {
	/// Matching documents, independent of paging.
	pub total: usize,
	/// Answer ids of the requested page, best first.
	pub answer_ids: Vec<i64>,
}

/// A flushed, read-only answer index.
pub struct AnswerIndex {
	index: Index,
	fields: AnswerFields,
	reader: IndexReader,
}
impl AnswerIndex {
	pub(crate) fn new(index: Index, fields: AnswerFields, reader: IndexReader) -> Self {
		Self { index, fields, reader }
	}

	pub fn num_docs(&self) -> u64 {
		self.reader.searcher().num_docs()
	}

	pub fn search(
		&self,
		request: &SearchRequest,
		criteria: Arc<dyn ScoringCriteria>,
	) -> Result<SearchOutput> {
		let Some(query) = self.build_query(request)? else {
			return Ok(SearchOutput::default());
		};
		let searcher = self.reader.searcher();
		let total = searcher.search(&*query, &Count)?;

		if request.limit == 0 || request.offset >= total {
			return Ok(SearchOutput { total, answer_ids: Vec::new() });
		}

		let window = request.limit.min(total - request.offset);
		let collector = TopDocs::with_limit(window).and_offset(request.offset).tweak_score(
			move |segment_reader: &SegmentReader| {
				let fast_fields = segment_reader.fast_fields();
				let kinds = fast_fields.u64(schema::PAYLOAD_KIND).ok();
				let stars = fast_fields.u64(schema::STAR_COUNT).ok();
				let criteria = Arc::clone(&criteria);

				move |doc: DocId, relevance: Score| -> RankingVector {
					let payload = ScoringPayload::from_columns(
						kinds.as_ref().and_then(|column| column.first(doc)),
						stars.as_ref().and_then(|column| column.first(doc)),
					);

					criteria.score(relevance, &payload)
				}
			},
		);
		let hits = searcher.search(&*query, &collector)?;
		let mut answer_ids = Vec::with_capacity(hits.len());

		for (_, address) in hits {
			answer_ids.push(self.answer_id(&searcher, address)?);
		}

		Ok(SearchOutput { total, answer_ids })
	}

	/// Every whitespace separated word must match, either as a phrase over its content tokens
	/// or as an exact label. The text is never interpreted as query syntax.
	fn build_query(&self, request: &SearchRequest) -> Result<Option<Box<dyn Query>>> {
		let mut analyzer = self.index.tokenizer_for_field(self.fields.content)?;
		let mut clauses = Vec::new();

		for word in request.text.split_whitespace() {
			let Some(content) = self.content_query(&mut analyzer, word) else {
				continue;
			};
			let label: Box<dyn Query> = Box::new(TermQuery::new(
				Term::from_field_text(self.fields.labels, word),
				IndexRecordOption::Basic,
			));

			clauses.push((
				Occur::Must,
				Box::new(BooleanQuery::new(vec![(Occur::Should, content), (Occur::Should, label)]))
					as Box<dyn Query>,
			));
		}

		if clauses.is_empty() {
			return Ok(None);
		}
		if let Some(label) = request.label.as_deref() {
			let label_filter = TermQuery::new(
				Term::from_field_text(self.fields.labels, label),
				IndexRecordOption::Basic,
			);

			clauses.push((Occur::Must, Box::new(ConstScoreQuery::new(Box::new(label_filter), 0.0))));
		}

		Ok(Some(Box::new(BooleanQuery::new(clauses))))
	}

	fn content_query(&self, analyzer: &mut TextAnalyzer, word: &str) -> Option<Box<dyn Query>> {
		let mut terms = Vec::new();
		let mut stream = analyzer.token_stream(word);

		while stream.advance() {
			terms.push(Term::from_field_text(self.fields.content, &stream.token().text));
		}

		match terms.len() {
			0 => None,
			1 => Some(Box::new(TermQuery::new(terms.remove(0), IndexRecordOption::WithFreqs))),
			_ => Some(Box::new(PhraseQuery::new(terms))),
		}
	}

	fn answer_id(&self, searcher: &Searcher, address: DocAddress) -> Result<i64> {
		let ids = searcher.segment_reader(address.segment_ord).fast_fields().i64(schema::ANSWER_ID)?;

		ids.first(address.doc_id)
			.ok_or(Error::MissingAnswerId { segment_ord: address.segment_ord })
	}
}
