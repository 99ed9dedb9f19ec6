use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Instant};

use futures::FutureExt;

use ubl_domain::{ActionError, ActionRequest, ActionResponse, SearchRequest, Task};
use ubl_storage::{BoxFuture, CaptureStore};

use crate::{Dispatcher, IndexScope, Result, StoreNaming, correlator, selector};

/// The rest of the host pipeline after this filter.
pub trait ActionFilterChain
where
	Self: Send + Sync,
{
	fn proceed<'a>(
		&'a self,
		task: &'a Task,
		action: &'a str,
		request: &'a ActionRequest,
	) -> BoxFuture<'a, Result<ActionResponse, ActionError>>;
}

/// How one filtered operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
	Captured,
	Passthrough,
	Failed,
}
impl Completion {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Captured => "captured",
			Self::Passthrough => "passthrough",
			Self::Failed => "failed",
		}
	}
}

/// Pipeline filter that records every completed search and its hits.
///
/// The continuation is invoked exactly once per operation and its outcome is returned as is.
/// Capture runs between the continuation completing and the outcome being returned; faults
/// inside it are logged and never reach the caller.
#[derive(Clone)]
pub struct SearchCaptureFilter {
	scope: IndexScope,
	dispatcher: Dispatcher,
}
impl SearchCaptureFilter {
	pub fn new(scope: IndexScope, dispatcher: Dispatcher) -> Self {
		Self { scope, dispatcher }
	}

	pub fn from_config(cfg: &ubl_config::Capture, store: Arc<dyn CaptureStore>) -> Result<Self> {
		let scope = IndexScope::from_config(cfg)?;
		let naming = StoreNaming::from_config(&cfg.store)?;

		Ok(Self::new(scope, Dispatcher::new(store, naming)))
	}

	/// Position among host filters. Capture observes the final response, so it runs last.
	pub fn order(&self) -> i32 {
		i32::MAX
	}

	pub async fn apply<C>(
		&self,
		task: &Task,
		action: &str,
		request: &ActionRequest,
		chain: &C,
	) -> Result<ActionResponse, ActionError>
	where
		C: ActionFilterChain + ?Sized,
	{
		let search = selector::select(request).filter(|search| self.scope.admits(search));
		let outcome = chain.proceed(task, action, request).await;
		let Some(search) = search else {
			tracing::trace!(
				task_id = task.id,
				action,
				completion = Completion::Passthrough.as_str(),
				"Operation not captured."
			);

			return outcome;
		};

		match outcome {
			Ok(response) => {
				let started = Instant::now();
				let captured = AssertUnwindSafe(self.capture(task, search, &response, started))
					.catch_unwind()
					.await;

				if let Err(payload) = captured {
					tracing::error!(
						panic = panic_message(&*payload),
						task_id = task.id,
						elapsed_ms = elapsed_ms(started),
						"Search capture panicked. Delivering the response uncaptured."
					);
				}

				Ok(response)
			},
			Err(err) => {
				tracing::debug!(
					task_id = task.id,
					action,
					status = err.status,
					completion = Completion::Failed.as_str(),
					"Search failed. Skipping capture."
				);

				Err(err)
			},
		}
	}

	async fn capture(
		&self,
		task: &Task,
		search: &SearchRequest,
		response: &ActionResponse,
		started: Instant,
	) {
		let correlation = match correlator::correlate(search, response) {
			Ok(correlation) => correlation,
			Err(err) => {
				tracing::error!(
					error = %err,
					task_id = task.id,
					elapsed_ms = elapsed_ms(started),
					"Failed to build capture record."
				);

				return;
			},
		};
		let store_name = self.dispatcher.store_name_for(search);
		let request_id = correlation.request.request_id;
		let response_id = correlation.response.response_id;
		let hit_count = correlation.response.hit_ids.len();
		let persisted = self
			.dispatcher
			.dispatch(&store_name, correlation.request, correlation.response)
			.await;
		let elapsed_ms = elapsed_ms(started);

		match persisted {
			Ok(()) => tracing::info!(
				task_id = task.id,
				parent_task_id = ?task.parent_id,
				request_id = %request_id,
				response_id = %response_id,
				store_name = store_name.as_str(),
				hit_count,
				elapsed_ms,
				completion = Completion::Captured.as_str(),
				"Search captured."
			),
			Err(err) => tracing::error!(
				error = %err,
				task_id = task.id,
				request_id = %request_id,
				store_name = store_name.as_str(),
				elapsed_ms,
				"Failed to persist search capture."
			),
		}
	}
}

fn elapsed_ms(started: Instant) -> f64 {
	started.elapsed().as_secs_f64() * 1_000.0
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&str>() {
		*message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.as_str()
	} else {
		"non-string panic payload"
	}
}
