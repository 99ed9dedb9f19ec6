//! Search traffic capture.
//!
//! [`SearchCaptureFilter`] sits in the host request pipeline. Searches are selected by
//! [`selector`], their responses turned into capture records by [`correlator`], and the
//! records handed to a [`CaptureStore`] by [`dispatcher`]. Nothing in this path can change or
//! fail the response seen by the original caller.

pub mod correlator;
pub mod dispatcher;
pub mod filter;
pub mod selector;

mod error;

pub use correlator::{Correlation, correlate};
pub use dispatcher::{Dispatcher, StoreNaming};
pub use error::{Error, Result};
pub use filter::{ActionFilterChain, Completion, SearchCaptureFilter};
pub use selector::{IndexScope, select};
pub use ubl_storage::{BoxFuture, CaptureStore};
