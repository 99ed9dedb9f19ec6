use std::collections::BTreeSet;

use ubl_domain::{ActionRequest, SearchRequest};

use crate::{Error, Result};

/// Returns the search payload when the operation is a search.
pub fn select(request: &ActionRequest) -> Option<&SearchRequest> {
	request.as_search()
}

/// Restricts capture to searches over configured indices.
///
/// Targets are compared as sets after trimming, so a search that names no index is admitted by
/// `AllOf` and rejected by `AnyOf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexScope {
	Unrestricted,
	AllOf(BTreeSet<String>),
	AnyOf(BTreeSet<String>),
}
impl IndexScope {
	pub fn from_config(cfg: &ubl_config::Capture) -> Result<Self> {
		let names = cfg.index_names.iter().cloned().collect::<BTreeSet<_>>();

		match cfg.index_filter.mode.as_str() {
			"off" => Ok(Self::Unrestricted),
			"all" => Ok(Self::AllOf(names)),
			"any" => Ok(Self::AnyOf(names)),
			other => Err(Error::InvalidConfig {
				message: format!("Unknown index filter mode {other:?}."),
			}),
		}
	}

	pub fn admits(&self, search: &SearchRequest) -> bool {
		let targets = search.target_indices();

		match self {
			Self::Unrestricted => true,
			Self::AllOf(names) => targets.into_iter().all(|index| names.contains(index)),
			Self::AnyOf(names) => targets.into_iter().any(|index| names.contains(index)),
		}
	}
}
