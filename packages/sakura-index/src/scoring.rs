/// Ranking key compared lexicographically, higher first. An empty vector ranks last.
pub type RankingVector = Vec<f32>;

const KIND_UNSCORED: u64 = 0;
const KIND_POPULARITY: u64 = 1;

/// Scoring inputs attached to a document when it is indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoringPayload {
	Popularity { star_count: u64 },
	/// No scoring inputs. Also what an unrecognized stored payload decodes to.
	Unscored,
}
impl ScoringPayload {
	pub(crate) fn kind(&self) -> u64 {
		match self {
			Self::Popularity { .. } => KIND_POPULARITY,
			Self::Unscored => KIND_UNSCORED,
		}
	}

	pub(crate) fn from_columns(kind: Option<u64>, star_count: Option<u64>) -> Self {
		match (kind, star_count) {
			(Some(KIND_POPULARITY), Some(star_count)) => Self::Popularity { star_count },
			_ => Self::Unscored,
		}
	}
}

pub trait ScoringCriteria: Send + Sync + 'static {
	/// Turns the engine relevance of a candidate and its payload into a ranking vector.
	fn score(&self, relevance: f32, payload: &ScoringPayload) -> RankingVector;
}

/// Relevance first, star count as the tie breaker.
#[derive(Clone, Copy, Debug, Default)]
pub struct PopularityCriteria;
impl ScoringCriteria for PopularityCriteria {
	fn score(&self, relevance: f32, payload: &ScoringPayload) -> RankingVector {
		match payload {
			ScoringPayload::Popularity { star_count } => vec![relevance, *star_count as f32],
			_ => {
				tracing::debug!(?payload, "Payload does not carry popularity inputs.");

				Vec::new()
			},
		}
	}
}
