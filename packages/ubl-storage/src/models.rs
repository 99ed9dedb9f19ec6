use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct CaptureOutboxEntry {
	pub outbox_id: Uuid,
	pub request_id: Uuid,
	pub store_name: String,
	pub status: String,
	pub attempts: i32,
	pub last_error: Option<String>,
	pub available_at: OffsetDateTime,
	pub payload: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct StoredCaptureRequest {
	pub request_id: Uuid,
	pub store_name: String,
	pub query_source: String,
	pub captured_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct StoredCaptureResponse {
	pub response_id: Uuid,
	pub request_id: Uuid,
	pub store_name: String,
	pub hit_ids: Vec<i32>,
	pub captured_at: OffsetDateTime,
}
