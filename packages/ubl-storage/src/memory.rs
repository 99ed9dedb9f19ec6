use std::sync::Mutex;

use ubl_domain::{CaptureRecord, CaptureRequest, CaptureResponse};

use crate::{BoxFuture, CaptureStore, Result};

/// In-process store that keeps records in arrival order.
#[derive(Debug, Default)]
pub struct MemoryStore {
	records: Mutex<Vec<CaptureRecord>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn records(&self) -> Vec<CaptureRecord> {
		self.records.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn records_for(&self, store_name: &str) -> Vec<CaptureRecord> {
		self.records
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.iter()
			.filter(|record| record.store_name == store_name)
			.cloned()
			.collect()
	}

	pub fn len(&self) -> usize {
		self.records.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Removes and returns every record stored so far.
	pub fn drain(&self) -> Vec<CaptureRecord> {
		std::mem::take(&mut *self.records.lock().unwrap_or_else(|err| err.into_inner()))
	}
}
impl CaptureStore for MemoryStore {
	fn persist<'a>(
		&'a self,
		store_name: &'a str,
		request: CaptureRequest,
		response: CaptureResponse,
	) -> BoxFuture<'a, Result<()>> {
		let record = CaptureRecord::new(store_name, request, response);

		self.records.lock().unwrap_or_else(|err| err.into_inner()).push(record);

		Box::pin(async { Ok(()) })
	}
}
