pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Tantivy(#[from] tantivy::TantivyError),
	#[error("Indexed document in segment {segment_ord} has no answer id.")]
	MissingAnswerId { segment_ord: u32 },
}
