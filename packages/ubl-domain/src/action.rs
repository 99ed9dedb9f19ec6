//! Operations carried by the host request pipeline.
//!
//! The pipeline carries a closed set of operation kinds. Searches are the only kind this
//! workspace inspects; every other operation travels as an opaque payload.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque handle for one dispatched operation. Only used to correlate diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Task {
	pub id: u64,
	pub parent_id: Option<u64>,
}
impl Task {
	pub fn new(id: u64) -> Self {
		Self { id, parent_id: None }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
	Search(SearchRequest),
	Other(OpaqueRequest),
}
impl ActionRequest {
	pub fn as_search(&self) -> Option<&SearchRequest> {
		match self {
			Self::Search(search) => Some(search),
			Self::Other(_) => None,
		}
	}

	pub fn is_search(&self) -> bool {
		matches!(self, Self::Search(_))
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
	/// Target indices as named by the caller. Empty means every index.
	#[serde(default)]
	pub indices: Vec<String>,
	/// The search body. `None` is a body-less search.
	#[serde(default)]
	pub source: Option<Value>,
}
impl SearchRequest {
	pub fn new(indices: Vec<String>, source: Value) -> Self {
		Self { indices, source: Some(source) }
	}

	/// Trimmed, de-duplicated target indices in sorted order. Blank names are dropped.
	pub fn target_indices(&self) -> BTreeSet<&str> {
		self.indices.iter().map(|index| index.trim()).filter(|index| !index.is_empty()).collect()
	}

	/// Compact JSON text of the search body, `{}` for a body-less search. Keys keep the order
	/// they were submitted in.
	pub fn source_text(&self) -> serde_json::Result<String> {
		match self.source.as_ref() {
			Some(source) => serde_json::to_string(source),
			None => Ok("{}".to_string()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueRequest {
	pub kind: String,
	pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResponse {
	Search(SearchResponse),
	Other(OpaqueResponse),
}
impl ActionResponse {
	pub fn as_search(&self) -> Option<&SearchResponse> {
		match self {
			Self::Search(search) => Some(search),
			Self::Other(_) => None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub took_ms: u64,
	pub total_hits: u64,
	pub hits: Vec<SearchHit>,
}

/// One result entry of a search response.
///
/// `doc_id` is the engine-internal document handle. It is only meaningful together with the
/// shard that produced it and changes as the index is rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
	pub doc_id: i32,
	pub index: String,
	pub id: String,
	pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueResponse {
	pub body: Value,
}

/// Failure reported by the host pipeline for one operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Action failed with status {status}: {reason}")]
pub struct ActionError {
	pub status: u16,
	pub reason: String,
}
impl ActionError {
	pub fn new(status: u16, reason: impl Into<String>) -> Self {
		Self { status, reason: reason.into() }
	}
}
