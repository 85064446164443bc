// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ReferenceRecord, ResultItem};
pub use requests::SearchRequest;
pub use responses::{ErrorResponse, HealthResponse};
