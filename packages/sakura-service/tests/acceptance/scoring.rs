use std::sync::Arc;

use sakura_index::{RankingVector, ScoringCriteria, ScoringPayload};
use sakura_service::{QueryService, SearchParams};
use sakura_testkit::TestDatabase;

use super::{bootstrap, index_config, load_query_service, search_config};

/// Accepts nothing, so every candidate gets an empty ranking vector.
struct MismatchedCriteria;
impl ScoringCriteria for MismatchedCriteria {
	fn score(&self, _relevance: f32, payload: &ScoringPayload) -> RankingVector {
		match payload {
			ScoringPayload::Unscored => vec![1.0],
			ScoringPayload::Popularity { .. } => Vec::new(),
		}
	}
}

fn text(text: &str) -> SearchParams {
	SearchParams { text: Some(text.to_string()), ..SearchParams::default() }
}

#[tokio::test]
async fn relevance_ties_are_broken_by_stars() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	for (answer_id, star) in [(1, 10), (2, 1000), (3, 100)] {
		sakura_testkit::seed_answer(&db.pool, answer_id, answer_id, "婚姻 建议", "沟通", star)
			.await
			.expect("Failed to seed answer.");
	}

	let service = load_query_service(&db, 100).await;
	let response = service.search(text("婚姻")).expect("Search failed.");
	let stars = response
		.results
		.iter()
		.map(|item| item.as_ref().map(|item| item.star_count))
		.collect::<Vec<_>>();

	assert_eq!(stars, vec![Some(1000), Some(100), Some(10)]);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn stronger_relevance_beats_more_stars() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	sakura_testkit::seed_answer(&db.pool, 1, 1, "婚姻", "婚姻 婚姻", 1)
		.await
		.expect("Failed to seed answer.");
	sakura_testkit::seed_answer(
		&db.pool,
		2,
		2,
		"婚姻",
		"一个 很长 的 回答 里面 讲了 许多 别的 事情 和 道理",
		100_000,
	)
	.await
	.expect("Failed to seed answer.");

	let service = load_query_service(&db, 100).await;
	let response = service.search(text("婚姻")).expect("Search failed.");
	let ids = response
		.results
		.iter()
		.map(|item| item.as_ref().map(|item| item.answer_id))
		.collect::<Vec<_>>();

	assert_eq!(ids, vec![Some(1), Some(2)]);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn mismatched_criteria_degrade_without_failing() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	for answer_id in 1..=3 {
		sakura_testkit::seed_answer(&db.pool, answer_id, answer_id, "婚姻", "回答", answer_id)
			.await
			.expect("Failed to seed answer.");
	}

	let (catalog, _) = sakura_service::load_snapshot(&db, &index_config(100))
		.await
		.expect("Failed to load snapshot.");
	let service =
		QueryService::with_criteria(search_config(), catalog, Arc::new(MismatchedCriteria));
	let response = service.search(text("婚姻")).expect("Search must not fail on mismatch.");

	assert_eq!(response.total, 3);
	assert_eq!(response.results.len(), 3);
	assert!(response.results.iter().all(Option::is_some));

	test_db.cleanup().expect("Failed to cleanup test database.");
}
