//! In-memory full-text index over answer records.
//!
//! Documents are built once with [`IndexBuilder`], flushed into an immutable [`AnswerIndex`],
//! and ranked by a pluggable [`ScoringCriteria`].

pub mod schema;
pub mod tokenizer;

mod builder;
mod error;
mod scoring;
mod searcher;

pub use builder::IndexBuilder;
pub use error::{Error, Result};
pub use scoring::{PopularityCriteria, RankingVector, ScoringCriteria, ScoringPayload};
pub use searcher::{AnswerIndex, SearchOutput, SearchRequest};
