pub mod action;
pub mod capture;

pub use action::{
	ActionError, ActionRequest, ActionResponse, OpaqueRequest, OpaqueResponse, SearchHit,
	SearchRequest, SearchResponse, Task,
};
pub use capture::{CaptureRecord, CaptureRequest, CaptureResponse};
