use time::OffsetDateTime;
use uuid::Uuid;

use ubl_config::{Postgres, Worker};
use ubl_domain::{CaptureRecord, CaptureRequest, CaptureResponse};
use ubl_storage::{db::Db, outbox, queries};
use ubl_worker::worker::{self, Poll, WorkerState};

#[tokio::test]
#[ignore = "Requires external Postgres. Set UBL_PG_DSN to run."]
async fn worker_moves_outbox_jobs_into_capture_tables() {
	let Some(base_dsn) = ubl_testkit::env_dsn() else {
		eprintln!(
			"Skipping worker_moves_outbox_jobs_into_capture_tables; set UBL_PG_DSN to run this test."
		);

		return;
	};
	let test_db =
		ubl_testkit::TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let request_id = Uuid::new_v4();
	let record = CaptureRecord::new(
		"products",
		CaptureRequest { request_id, query_source: r#"{"query":{"match_all":{}}}"#.to_string() },
		CaptureResponse { request_id, response_id: Uuid::new_v4(), hit_ids: vec![3, 7, 1] },
	);

	outbox::enqueue_capture(&db.pool, &record, OffsetDateTime::now_utc())
		.await
		.expect("Failed to enqueue.");

	let state = WorkerState::new(db, &Worker::default());
	let first = worker::process_outbox_once(&state).await.expect("Failed to poll.");
	let second = worker::process_outbox_once(&state).await.expect("Failed to poll.");

	assert_eq!(first, Poll::Stored);
	assert_eq!(second, Poll::Idle);

	let stored = queries::fetch_capture_request(&state.db, request_id)
		.await
		.expect("Failed to fetch request.")
		.expect("Expected stored request.");
	let responses = queries::fetch_capture_responses(&state.db, request_id)
		.await
		.expect("Failed to fetch responses.");

	assert_eq!(stored.store_name, "products");
	assert_eq!(stored.query_source, record.request.query_source);
	assert_eq!(responses.len(), 1);
	assert_eq!(responses[0].hit_ids, vec![3, 7, 1]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
