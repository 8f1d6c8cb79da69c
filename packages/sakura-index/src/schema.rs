use tantivy::schema::{
	FAST, Field, INDEXED, IndexRecordOption, STRING, Schema, TextFieldIndexing, TextOptions,
};

pub const WORD_TOKENIZER: &str = "sakura_words";

pub const ANSWER_ID: &str = "answer_id";
pub const CONTENT: &str = "content";
pub const LABELS: &str = "labels";
pub const PAYLOAD_KIND: &str = "payload_kind";
pub const STAR_COUNT: &str = "star_count";

#[derive(Clone, Copy, Debug)]
pub struct AnswerFields {
	pub answer_id: Field,
	pub content: Field,
	pub labels: Field,
	pub payload_kind: Field,
	pub star_count: Field,
}

pub fn build_schema() -> (Schema, AnswerFields) {
	let mut builder = Schema::builder();
	let content_indexing = TextFieldIndexing::default()
		.set_tokenizer(WORD_TOKENIZER)
		.set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let fields = AnswerFields {
		answer_id: builder.add_i64_field(ANSWER_ID, INDEXED | FAST),
		content: builder
			.add_text_field(CONTENT, TextOptions::default().set_indexing_options(content_indexing)),
		labels: builder.add_text_field(LABELS, STRING),
		payload_kind: builder.add_u64_field(PAYLOAD_KIND, FAST),
		star_count: builder.add_u64_field(STAR_COUNT, FAST),
	};

	(builder.build(), fields)
}
