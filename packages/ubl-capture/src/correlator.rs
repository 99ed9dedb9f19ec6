use uuid::Uuid;

use ubl_domain::{ActionResponse, CaptureRequest, CaptureResponse, SearchRequest};

use crate::Result;

/// A request/response pair minted for one observed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
	pub request: CaptureRequest,
	pub response: CaptureResponse,
}

/// Builds the capture pair for a completed search without touching the response.
pub fn correlate(search: &SearchRequest, response: &ActionResponse) -> Result<Correlation> {
	let query_source = search.source_text()?;
	let request_id = Uuid::new_v4();
	let response_id = Uuid::new_v4();

	Ok(Correlation {
		request: CaptureRequest { request_id, query_source },
		response: CaptureResponse { request_id, response_id, hit_ids: hit_ids(response) },
	})
}

/// Engine document ids of the response hits, in response order.
pub fn hit_ids(response: &ActionResponse) -> Vec<i32> {
	match response.as_search() {
		Some(search) => search.hits.iter().map(|hit| hit.doc_id).collect(),
		None => Vec::new(),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use serde_json::json;

	use ubl_domain::{OpaqueResponse, SearchHit, SearchResponse};

	use super::*;

	fn response_with(doc_ids: &[i32]) -> ActionResponse {
		ActionResponse::Search(SearchResponse {
			took_ms: 4,
			total_hits: doc_ids.len() as u64,
			hits: doc_ids
				.iter()
				.map(|doc_id| SearchHit {
					doc_id: *doc_id,
					index: "products".to_string(),
					id: format!("p-{doc_id}"),
					score: 1.0,
				})
				.collect(),
		})
	}

	#[test]
	fn match_all_scenario_keeps_source_and_hit_order() {
		let search = SearchRequest::new(
			vec!["products".to_string()],
			json!({ "query": { "match_all": {} } }),
		);
		let correlation =
			correlate(&search, &response_with(&[3, 7, 1])).expect("correlation failed");

		assert_eq!(correlation.request.query_source, r#"{"query":{"match_all":{}}}"#);
		assert_eq!(correlation.response.hit_ids, vec![3, 7, 1]);
		assert_eq!(correlation.response.request_id, correlation.request.request_id);
		assert_ne!(correlation.response.response_id, correlation.request.request_id);
	}

	#[test]
	fn unrecognized_response_yields_no_hits() {
		let search = SearchRequest::default();
		let response = ActionResponse::Other(OpaqueResponse { body: json!({ "count": 3 }) });
		let correlation = correlate(&search, &response).expect("correlation failed");

		assert!(correlation.response.hit_ids.is_empty());
		assert_eq!(correlation.request.query_source, "{}");
	}

	#[test]
	fn ids_are_v4_and_unique_across_trials() {
		let search = SearchRequest::new(Vec::new(), json!({ "query": { "match_all": {} } }));
		let response = response_with(&[1]);
		let mut seen = HashSet::new();

		for _ in 0..1_000 {
			let correlation = correlate(&search, &response).expect("correlation failed");

			for id in [correlation.request.request_id, correlation.response.response_id] {
				let parsed = Uuid::parse_str(&id.hyphenated().to_string()).expect("invalid uuid");

				assert_eq!(parsed.get_version_num(), 4);
				assert!(seen.insert(id), "duplicate id {id}");
			}
		}

		assert_eq!(seen.len(), 2_000);
	}

	#[test]
	fn observed_response_is_not_modified() {
		let response = response_with(&[5, 2]);
		let before = response.clone();

		correlate(&SearchRequest::default(), &response).expect("correlation failed");

		assert_eq!(response, before);
	}
}
