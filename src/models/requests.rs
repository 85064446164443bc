use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run a synthesized search
///
/// `query` is optional at the serde level so that a missing or `null` field
/// reaches the handler and gets the same 400 as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub query: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
        }
    }

    /// The query exactly as sent, unless it is missing or empty
    ///
    /// Whitespace is part of the query and is never trimmed.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}
