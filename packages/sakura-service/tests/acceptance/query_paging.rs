use sakura_index::{IndexBuilder, ScoringPayload};
use sakura_service::{
	Catalog, Error, HydratedItem, HydrationCache, QueryService, SearchParams, SearchResponse,
};
use sakura_testkit::TestDatabase;

use super::{bootstrap, index_config, load_query_service, search_config};

fn params(text: Option<&str>, offset: Option<&str>, limit: Option<&str>) -> SearchParams {
	SearchParams {
		text: text.map(str::to_string),
		offset: offset.map(str::to_string),
		limit: limit.map(str::to_string),
		label: None,
	}
}

async fn seed_marriage_corpus(pool: &sqlx::SqlitePool) {
	for (question_id, answer_id, star) in [(1, 101, 30), (2, 201, 20), (3, 301, 10)] {
		sakura_testkit::seed_answer(pool, question_id, answer_id, "婚姻 怎么 办", "多 沟通", star)
			.await
			.expect("Failed to seed answer.");
	}

	sakura_testkit::seed_answer(pool, 4, 401, "工作 压力", "休息", 500)
		.await
		.expect("Failed to seed answer.");
}

#[tokio::test]
async fn default_query_finds_the_labeled_record() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	sakura_testkit::seed_answer(&db.pool, 9, 900, "如何 相处", "互相 理解", 1000)
		.await
		.expect("Failed to seed answer.");
	sakura_testkit::seed_answer(&db.pool, 8, 800, "工作 压力", "休息", 5)
		.await
		.expect("Failed to seed answer.");
	sakura_testkit::seed_label(&db.pool, 9, "婚姻").await.expect("Failed to seed label.");
	sakura_testkit::seed_label(&db.pool, 9, "情感").await.expect("Failed to seed label.");

	let service = load_query_service(&db, 100).await;
	let response = service.search(SearchParams::default()).expect("Search failed.");

	assert_eq!(response.total, 1);
	assert_eq!(
		response.results,
		vec![Some(HydratedItem {
			question_id: 9,
			answer_id: 900,
			question_text: "如何 相处".to_string(),
			answer_text: "互相 理解".to_string(),
			star_count: 1000,
			labels: vec!["婚姻".to_string(), "情感".to_string()],
		})]
	);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn zero_limit_returns_only_the_total() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;

	let service = load_query_service(&db, 100).await;
	let response = service.search(params(Some("婚姻"), None, Some("0"))).expect("Search failed.");

	assert_eq!(response.total, 3);
	assert!(response.results.is_empty());

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn offset_beyond_total_is_empty() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;

	let service = load_query_service(&db, 100).await;
	let response = service.search(params(Some("婚姻"), Some("50"), None)).expect("Search failed.");

	assert_eq!(response.total, 3);
	assert!(response.results.is_empty());

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn pages_follow_the_ranking() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;

	let service = load_query_service(&db, 2).await;
	let first = service.search(params(Some("婚姻"), Some("0"), Some("2"))).expect("Search failed.");
	let second = service.search(params(Some("婚姻"), Some("2"), Some("2"))).expect("Search failed.");
	let ids = |results: &[Option<HydratedItem>]| {
		results.iter().map(|item| item.as_ref().map(|item| item.answer_id)).collect::<Vec<_>>()
	};

	assert_eq!(ids(&first.results), vec![Some(101), Some(201)]);
	assert_eq!(ids(&second.results), vec![Some(301)]);
	assert_eq!(first.total, 3);
	assert_eq!(second.total, 3);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn reloading_unchanged_data_is_stable() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;

	let first = load_query_service(&db, 1).await;
	let second = load_query_service(&db, 3).await;

	for (offset, limit) in [("0", "10"), ("1", "1"), ("2", "3")] {
		let request = || params(Some("婚姻"), Some(offset), Some(limit));

		assert_eq!(
			first.search(request()).expect("Search failed."),
			second.search(request()).expect("Search failed.")
		);
	}

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn malformed_paging_names_the_parameter() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;

	let service = load_query_service(&db, 100).await;

	for (offset, limit, name) in
		[(Some("-1"), None, "offset"), (None, Some("abc"), "limit"), (Some(""), None, "offset")]
	{
		let err = service
			.search(params(Some("婚姻"), offset, limit))
			.expect_err("Expected invalid paging.");

		assert!(
			matches!(&err, Error::InvalidRequest { message } if message.starts_with(name)),
			"Unexpected error: {err:?}"
		);
	}

	let still_serving = service.search(params(Some("婚姻"), None, None)).expect("Search failed.");

	assert_eq!(still_serving.total, 3);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn label_filter_narrows_results() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;
	sakura_testkit::seed_label(&db.pool, 2, "法律").await.expect("Failed to seed label.");

	let service = load_query_service(&db, 100).await;
	let mut filtered = params(Some("婚姻"), None, None);

	filtered.label = Some("法律".to_string());

	let response = service.search(filtered).expect("Search failed.");

	assert_eq!(response.total, 1);
	assert_eq!(response.results[0].as_ref().map(|item| item.answer_id), Some(201));

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn blank_text_matches_nothing() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_marriage_corpus(&db.pool).await;

	let service = load_query_service(&db, 100).await;
	let response = service.search(params(Some(""), None, None)).expect("Search failed.");

	assert_eq!(response.total, 0);
	assert!(response.results.is_empty());

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[test]
fn uncached_hit_yields_an_empty_slot() {
	let mut builder = IndexBuilder::new(&index_config(100)).expect("Failed to create builder.");

	for (answer_id, star_count) in [(1, 50), (2, 5)] {
		builder
			.index_document(
				answer_id,
				"婚姻 怎么 办",
				&ScoringPayload::Popularity { star_count },
				&[],
			)
			.expect("Failed to index document.");
	}

	let cached = HydratedItem {
		question_id: 7,
		answer_id: 1,
		question_text: "婚姻 怎么 办".to_string(),
		answer_text: String::new(),
		star_count: 50,
		labels: Vec::new(),
	};
	let mut cache = HydrationCache::default();

	cache.insert(cached.clone());

	let service = QueryService::new(
		search_config(),
		Catalog::new(builder.flush().expect("Failed to flush index."), cache),
	);
	let response = service.search(params(None, None, None)).expect("Search must not fail.");

	assert_eq!(response, SearchResponse { total: 2, results: vec![Some(cached), None] });
}
