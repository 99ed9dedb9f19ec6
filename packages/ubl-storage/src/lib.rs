pub mod db;
pub mod memory;
pub mod models;
pub mod outbox;
pub mod queries;
pub mod schema;

mod error;

pub use error::Error;
pub use memory::MemoryStore;
pub use outbox::PgStore;

use std::{future::Future, pin::Pin};

use ubl_domain::{CaptureRequest, CaptureResponse};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable destination for capture records.
///
/// Implementations are shared across every in-flight capture and own their concurrency,
/// durability and retry behavior. Ownership of the request and response moves to the store.
pub trait CaptureStore
where
	Self: Send + Sync,
{
	fn persist<'a>(
		&'a self,
		store_name: &'a str,
		request: CaptureRequest,
		response: CaptureResponse,
	) -> BoxFuture<'a, Result<()>>;
}
