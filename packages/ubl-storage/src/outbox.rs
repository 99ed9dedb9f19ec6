use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use ubl_domain::{CaptureRecord, CaptureRequest, CaptureResponse};

use crate::{BoxFuture, CaptureStore, Result, db::Db, models::CaptureOutboxEntry};

const BASE_BACKOFF_MS: i64 = 500;
const MAX_BACKOFF_MS: i64 = 30_000;
const MAX_OUTBOX_ERROR_CHARS: usize = 1_024;

/// Postgres-backed store. Each record lands in `capture_outbox` and is moved into the
/// capture tables by the worker.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}
impl PgStore {
	pub fn new(db: &Db) -> Self {
		Self { pool: db.pool.clone() }
	}
}
impl CaptureStore for PgStore {
	fn persist<'a>(
		&'a self,
		store_name: &'a str,
		request: CaptureRequest,
		response: CaptureResponse,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let record = CaptureRecord::new(store_name, request, response);

			enqueue_capture(&self.pool, &record, OffsetDateTime::now_utc()).await?;

			Ok(())
		})
	}
}

pub async fn enqueue_capture(
	pool: &PgPool,
	record: &CaptureRecord,
	now: OffsetDateTime,
) -> Result<Uuid> {
	let outbox_id = Uuid::new_v4();
	let payload = serde_json::to_value(record)?;

	sqlx::query(
		"\
INSERT INTO capture_outbox (
	outbox_id,
	request_id,
	store_name,
	status,
	attempts,
	last_error,
	available_at,
	payload,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, 'PENDING', 0, NULL, $4, $5, $4, $4)",
	)
	.bind(outbox_id)
	.bind(record.request.request_id)
	.bind(record.store_name.as_str())
	.bind(now)
	.bind(payload)
	.execute(pool)
	.await?;

	Ok(outbox_id)
}

/// Claims the oldest due job and leases it for `lease`.
pub async fn fetch_next_job(
	db: &Db,
	now: OffsetDateTime,
	lease: Duration,
) -> Result<Option<CaptureOutboxEntry>> {
	let mut tx = db.pool.begin().await?;
	let row: Option<CaptureOutboxEntry> = sqlx::query_as(
		"\
SELECT
	outbox_id,
	request_id,
	store_name,
	status,
	attempts,
	last_error,
	available_at,
	payload,
	created_at,
	updated_at
FROM capture_outbox
WHERE status IN ('PENDING', 'FAILED') AND available_at <= $1
ORDER BY available_at ASC
LIMIT 1
FOR UPDATE SKIP LOCKED",
	)
	.bind(now)
	.fetch_optional(&mut *tx)
	.await?;
	let job = if let Some(mut job) = row {
		let lease_until = now + lease;

		sqlx::query(
			"UPDATE capture_outbox SET available_at = $1, updated_at = $2 WHERE outbox_id = $3",
		)
		.bind(lease_until)
		.bind(now)
		.bind(job.outbox_id)
		.execute(&mut *tx)
		.await?;

		job.available_at = lease_until;
		job.updated_at = now;

		Some(job)
	} else {
		None
	};

	tx.commit().await?;

	Ok(job)
}

pub async fn mark_done(db: &Db, outbox_id: Uuid) -> Result<()> {
	let now = OffsetDateTime::now_utc();

	sqlx::query("UPDATE capture_outbox SET status = 'DONE', updated_at = $1 WHERE outbox_id = $2")
		.bind(now)
		.bind(outbox_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

/// Records a failed attempt. Jobs that reach `max_attempts` are parked as `DEAD`.
pub async fn mark_failed(
	db: &Db,
	outbox_id: Uuid,
	attempts: i32,
	max_attempts: i32,
	error: &str,
) -> Result<()> {
	let next_attempts = attempts.saturating_add(1);
	let status = if next_attempts >= max_attempts { "DEAD" } else { "FAILED" };
	let now = OffsetDateTime::now_utc();
	let available_at = now + backoff_for_attempt(next_attempts);
	let error_text = truncate_error(error);

	sqlx::query(
		"\
UPDATE capture_outbox
SET status = $1,
	attempts = $2,
	last_error = $3,
	available_at = $4,
	updated_at = $5
WHERE outbox_id = $6",
	)
	.bind(status)
	.bind(next_attempts)
	.bind(error_text)
	.bind(available_at)
	.bind(now)
	.bind(outbox_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Deletes completed jobs last touched before `cutoff`. Returns the number of rows removed.
pub async fn purge_done(db: &Db, cutoff: OffsetDateTime) -> Result<u64> {
	let result =
		sqlx::query("DELETE FROM capture_outbox WHERE status = 'DONE' AND updated_at <= $1")
			.bind(cutoff)
			.execute(&db.pool)
			.await?;

	Ok(result.rows_affected())
}

pub fn backoff_for_attempt(attempt: i32) -> Duration {
	let attempts = attempt.max(1) as u32;
	let exp = attempts.saturating_sub(1).min(6);
	let base = BASE_BACKOFF_MS.saturating_mul(1 << exp);
	let capped = base.min(MAX_BACKOFF_MS);

	Duration::milliseconds(capped)
}

fn truncate_error(text: &str) -> String {
	let mut out = text.trim().to_string();

	if out.chars().count() > MAX_OUTBOX_ERROR_CHARS {
		out = out.chars().take(MAX_OUTBOX_ERROR_CHARS).collect();
		out.push_str("...");
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backoff_doubles_until_capped() {
		assert_eq!(backoff_for_attempt(0), Duration::milliseconds(500));
		assert_eq!(backoff_for_attempt(1), Duration::milliseconds(500));
		assert_eq!(backoff_for_attempt(2), Duration::milliseconds(1_000));
		assert_eq!(backoff_for_attempt(4), Duration::milliseconds(4_000));
		assert_eq!(backoff_for_attempt(7), Duration::milliseconds(30_000));
		assert_eq!(backoff_for_attempt(50), Duration::milliseconds(30_000));
	}

	#[test]
	fn long_errors_are_truncated() {
		let text = "x".repeat(MAX_OUTBOX_ERROR_CHARS + 10);
		let out = truncate_error(&text);

		assert_eq!(out.chars().count(), MAX_OUTBOX_ERROR_CHARS + 3);
		assert!(out.ends_with("..."));
		assert_eq!(truncate_error("  short  "), "short");
	}
}
