use std::time::Duration as StdDuration;

use time::{Duration, OffsetDateTime};

use ubl_domain::CaptureRecord;
use ubl_storage::{db::Db, models::CaptureOutboxEntry, outbox, queries};

use crate::Result;

const CLEANUP_INTERVAL_SECONDS: i64 = 900;

pub struct WorkerState {
	pub db: Db,
	pub poll_interval: StdDuration,
	pub lease: Duration,
	pub max_attempts: i32,
	pub done_retention: Duration,
}
impl WorkerState {
	pub fn new(db: Db, cfg: &ubl_config::Worker) -> Self {
		Self {
			db,
			poll_interval: StdDuration::from_millis(cfg.poll_interval_ms),
			lease: Duration::seconds(cfg.lease_seconds),
			max_attempts: cfg.max_attempts,
			done_retention: Duration::hours(cfg.done_retention_hours),
		}
	}
}

/// Outcome of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
	Idle,
	Stored,
	Failed,
}

pub async fn run_worker(state: WorkerState) -> Result<()> {
	let mut last_cleanup = OffsetDateTime::now_utc();

	loop {
		let polled = match process_outbox_once(&state).await {
			Ok(poll) => poll,
			Err(err) => {
				tracing::error!(error = %err, "Capture outbox processing failed.");

				Poll::Idle
			},
		};
		let now = OffsetDateTime::now_utc();

		if cleanup_due(last_cleanup, now) {
			match outbox::purge_done(&state.db, now - state.done_retention).await {
				Ok(count) => {
					if count > 0 {
						tracing::info!(count, "Purged completed capture outbox jobs.");
					}

					last_cleanup = now;
				},
				Err(err) => tracing::error!(error = %err, "Capture outbox cleanup failed."),
			}
		}

		// Drain without sleeping while jobs keep coming.
		if polled == Poll::Idle {
			tokio::time::sleep(state.poll_interval).await;
		}
	}
}

/// Claims at most one job and moves it into the capture tables.
pub async fn process_outbox_once(state: &WorkerState) -> Result<Poll> {
	let now = OffsetDateTime::now_utc();
	let Some(job) = outbox::fetch_next_job(&state.db, now, state.lease).await? else {
		return Ok(Poll::Idle);
	};

	match store_job(&state.db, &job).await {
		Ok(()) => {
			outbox::mark_done(&state.db, job.outbox_id).await?;

			tracing::debug!(
				outbox_id = %job.outbox_id,
				request_id = %job.request_id,
				store_name = job.store_name.as_str(),
				"Capture stored."
			);

			Ok(Poll::Stored)
		},
		Err(err) => {
			let error_text = err.to_string();

			outbox::mark_failed(
				&state.db,
				job.outbox_id,
				job.attempts,
				state.max_attempts,
				&error_text,
			)
			.await?;

			tracing::error!(
				error = %err,
				outbox_id = %job.outbox_id,
				request_id = %job.request_id,
				attempts = job.attempts + 1,
				"Capture outbox job failed."
			);

			Ok(Poll::Failed)
		},
	}
}

async fn store_job(db: &Db, job: &CaptureOutboxEntry) -> Result<()> {
	let record = decode_payload(job)?;
	let mut tx = db.pool.begin().await?;

	queries::insert_capture_tx(&mut tx, &record, job.created_at).await?;
	tx.commit().await?;

	Ok(())
}

fn decode_payload(job: &CaptureOutboxEntry) -> Result<CaptureRecord> {
	let record: CaptureRecord = serde_json::from_value(job.payload.clone())?;

	if record.request.request_id != job.request_id {
		return Err(crate::Error::Message(format!(
			"Outbox payload request_id {} does not match job request_id {}.",
			record.request.request_id, job.request_id
		)));
	}

	Ok(record)
}

fn cleanup_due(last_cleanup: OffsetDateTime, now: OffsetDateTime) -> bool {
	now - last_cleanup >= Duration::seconds(CLEANUP_INTERVAL_SECONDS)
}
