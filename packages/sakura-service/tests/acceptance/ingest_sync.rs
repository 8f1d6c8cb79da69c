use std::sync::Arc;

use sakura_notify::Client;
use sakura_service::{DeliveryMode, Error};
use sakura_testkit::TestDatabase;

use super::{StubNotifier, bootstrap, ingest_request, writer};

#[tokio::test]
async fn acknowledged_answer_is_committed_with_labels() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let notifier = StubNotifier::acking();
	let writer = writer(&db, notifier.clone(), DeliveryMode::Synchronous);
	let response = writer
		.ingest(ingest_request(5, 501, &["婚姻", "情感"]))
		.await
		.expect("Ingestion must succeed.");

	assert_eq!(response.delivery, DeliveryMode::Synchronous);
	assert_eq!(response.reply.as_deref(), Some("received 501"));
	assert!(response.outbox_id.is_none());
	assert_eq!(notifier.calls(), 1);

	let sent = notifier.last.lock().expect("Lock must not be poisoned.").clone();

	assert_eq!(sent.map(|message| (message.id, message.answer_id)), Some((response.row_id, 501)));

	let labels = sakura_service::aggregate_labels(&db).await.expect("Failed to aggregate labels.");

	assert_eq!(labels[&5], vec!["婚姻", "情感"]);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 1);
	assert_eq!(
		sakura_testkit::count_rows(&db.pool, "notification_outbox").await.expect("Failed to count."),
		0
	);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn labels_are_written_only_for_a_new_question() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let writer = writer(&db, StubNotifier::acking(), DeliveryMode::Synchronous);

	writer.ingest(ingest_request(5, 501, &["婚姻"])).await.expect("Ingestion must succeed.");
	writer.ingest(ingest_request(5, 502, &["别的"])).await.expect("Ingestion must succeed.");

	let labels = sakura_service::aggregate_labels(&db).await.expect("Failed to aggregate labels.");

	assert_eq!(labels[&5], vec!["婚姻"]);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 2);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn rejected_notification_rolls_back_everything() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let notifier = StubNotifier::rejecting("endpoint busy");
	let writer = writer(&db, notifier.clone(), DeliveryMode::Synchronous);
	let err = writer
		.ingest(ingest_request(6, 601, &["婚姻"]))
		.await
		.expect_err("Expected notification failure.");

	assert!(matches!(err, Error::Notification { .. }), "Unexpected error: {err:?}");
	assert_eq!(notifier.calls(), 1);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 0);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "label").await.expect("Failed to count."), 0);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn unreachable_endpoint_rolls_back() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let endpoint =
		sakura_testkit::unreachable_endpoint().await.expect("Failed to reserve an address.");
	let client = Client::with_endpoint(endpoint.to_string(), 1_000, sakura_testkit::MAX_FRAME_BYTES);
	let writer = writer(&db, Arc::new(client), DeliveryMode::Synchronous);
	let err = writer
		.ingest(ingest_request(6, 601, &[]))
		.await
		.expect_err("Expected notification failure.");

	assert!(matches!(err, Error::Notification { .. }), "Unexpected error: {err:?}");
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 0);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn silent_endpoint_times_out_and_rolls_back() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let endpoint =
		sakura_testkit::spawn_stalled_endpoint().await.expect("Failed to start stalled endpoint.");
	let client = Client::with_endpoint(endpoint.to_string(), 200, sakura_testkit::MAX_FRAME_BYTES);
	let writer = writer(&db, Arc::new(client), DeliveryMode::Synchronous);
	let err = writer
		.ingest(ingest_request(7, 701, &["婚姻"]))
		.await
		.expect_err("Expected notification timeout.");

	assert!(
		matches!(&err, Error::Notification { message } if message.contains("200 ms")),
		"Unexpected error: {err:?}"
	);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 0);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "label").await.expect("Failed to count."), 0);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn live_endpoint_receives_the_record() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let responder =
		sakura_testkit::spawn_acking_responder().await.expect("Failed to start responder.");
	let client = Client::with_endpoint(responder.endpoint(), 2_000, sakura_testkit::MAX_FRAME_BYTES);
	let writer = writer(&db, Arc::new(client), DeliveryMode::Synchronous);
	let response =
		writer.ingest(ingest_request(8, 801, &[])).await.expect("Ingestion must succeed.");

	assert_eq!(response.reply.as_deref(), Some("received 801"));
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 1);

	responder.shutdown();
	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn existing_answer_is_a_conflict() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let notifier = StubNotifier::acking();
	let writer = writer(&db, notifier.clone(), DeliveryMode::Synchronous);

	writer.ingest(ingest_request(5, 501, &[])).await.expect("Ingestion must succeed.");

	let err = writer
		.ingest(ingest_request(9, 501, &[]))
		.await
		.expect_err("Expected conflict.");

	assert!(matches!(err, Error::Conflict { .. }), "Unexpected error: {err:?}");
	assert_eq!(notifier.calls(), 1);

	test_db.cleanup().expect("Failed to cleanup test database.");
}

#[tokio::test]
async fn invalid_payload_touches_nothing() {
	let test_db = TestDatabase::new().expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let notifier = StubNotifier::acking();
	let writer = writer(&db, notifier.clone(), DeliveryMode::Synchronous);
	let mut request = ingest_request(5, 501, &["  "]);
	let err = writer.ingest(request.clone()).await.expect_err("Expected invalid labels.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	request.labels.clear();
	request.star = -1;

	let err = writer.ingest(request).await.expect_err("Expected invalid star.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(notifier.calls(), 0);
	assert_eq!(sakura_testkit::count_rows(&db.pool, "answer").await.expect("Failed to count."), 0);

	test_db.cleanup().expect("Failed to cleanup test database.");
}
