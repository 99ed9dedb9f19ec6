use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use ubl_domain::CaptureRecord;

use crate::{
	Result,
	db::Db,
	models::{StoredCaptureRequest, StoredCaptureResponse},
};

/// Writes both halves of a record. Replays of the same record are no-ops.
pub async fn insert_capture_tx(
	tx: &mut Transaction<'_, Postgres>,
	record: &CaptureRecord,
	captured_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO capture_requests (request_id, store_name, query_source, captured_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (request_id) DO NOTHING",
	)
	.bind(record.request.request_id)
	.bind(record.store_name.as_str())
	.bind(record.request.query_source.as_str())
	.bind(captured_at)
	.execute(&mut **tx)
	.await?;
	sqlx::query(
		"\
INSERT INTO capture_responses (response_id, request_id, store_name, hit_ids, captured_at)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (response_id) DO NOTHING",
	)
	.bind(record.response.response_id)
	.bind(record.response.request_id)
	.bind(record.store_name.as_str())
	.bind(record.response.hit_ids.as_slice())
	.bind(captured_at)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn fetch_capture_request(
	db: &Db,
	request_id: Uuid,
) -> Result<Option<StoredCaptureRequest>> {
	let row = sqlx::query_as(
		"\
SELECT request_id, store_name, query_source, captured_at
FROM capture_requests
WHERE request_id = $1",
	)
	.bind(request_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn fetch_capture_responses(
	db: &Db,
	request_id: Uuid,
) -> Result<Vec<StoredCaptureResponse>> {
	let rows = sqlx::query_as(
		"\
SELECT response_id, request_id, store_name, hit_ids, captured_at
FROM capture_responses
WHERE request_id = $1
ORDER BY captured_at ASC",
	)
	.bind(request_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
