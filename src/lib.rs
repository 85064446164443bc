//! Neptune Search - LLM-backed service listing search
//!
//! This library embeds a user's query and a fixed reference catalog into a
//! prompt, asks a chat-completion provider to merge and score the listings,
//! and extracts the JSON array from the model's free-form answer.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{extract_json_span, neptune_score, ReferenceCatalog, Synthesizer};
pub use error::SearchError;
pub use models::{ReferenceRecord, ResultItem, SearchRequest};
pub use routes::AppState;
pub use services::{CompletionClient, CompletionError};
