use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One observed search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
	pub request_id: Uuid,
	pub query_source: String,
}

/// The result set returned for a [`CaptureRequest`].
///
/// `hit_ids` keeps the order of the response hits so positions can be re-associated with
/// ranks downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResponse {
	pub request_id: Uuid,
	pub response_id: Uuid,
	pub hit_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRecord {
	pub store_name: String,
	pub request: CaptureRequest,
	pub response: CaptureResponse,
}
impl CaptureRecord {
	pub fn new(
		store_name: impl Into<String>,
		request: CaptureRequest,
		response: CaptureResponse,
	) -> Self {
		Self { store_name: store_name.into(), request, response }
	}
}
