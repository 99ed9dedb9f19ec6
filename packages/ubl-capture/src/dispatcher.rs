use std::sync::Arc;

use ubl_domain::{CaptureRequest, CaptureResponse, SearchRequest};
use ubl_storage::CaptureStore;

use crate::{Error, Result};

/// How the logical store for a capture record is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreNaming {
	/// Every record goes to the same store.
	Fixed(String),
	/// Records go to a store named after the searched indices, or `fallback` when the search
	/// names none.
	TargetIndex { fallback: String },
}
impl StoreNaming {
	pub fn from_config(cfg: &ubl_config::Store) -> Result<Self> {
		let default_name = cfg.default_name.clone();

		match cfg.naming.as_str() {
			"fixed" => Ok(Self::Fixed(default_name)),
			"target_index" => Ok(Self::TargetIndex { fallback: default_name }),
			other => Err(Error::InvalidConfig {
				message: format!("Unknown store naming policy {other:?}."),
			}),
		}
	}

	pub fn resolve(&self, search: &SearchRequest) -> String {
		match self {
			Self::Fixed(name) => name.clone(),
			Self::TargetIndex { fallback } => {
				let indices = search.target_indices();

				if indices.is_empty() {
					fallback.clone()
				} else {
					indices.into_iter().collect::<Vec<_>>().join(",")
				}
			},
		}
	}
}

/// Hands capture records to the injected store.
///
/// The dispatcher neither retries nor buffers; whatever the store returns is passed back
/// untouched.
#[derive(Clone)]
pub struct Dispatcher {
	store: Arc<dyn CaptureStore>,
	naming: StoreNaming,
}
impl Dispatcher {
	pub fn new(store: Arc<dyn CaptureStore>, naming: StoreNaming) -> Self {
		Self { store, naming }
	}

	pub fn store_name_for(&self, search: &SearchRequest) -> String {
		self.naming.resolve(search)
	}

	pub async fn dispatch(
		&self,
		store_name: &str,
		request: CaptureRequest,
		response: CaptureResponse,
	) -> ubl_storage::Result<()> {
		self.store.persist(store_name, request, response).await
	}
}
