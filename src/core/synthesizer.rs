use crate::core::{
    extract::{parse_payload, ExtractionError},
    prompt::{build_prompt, SYSTEM_PROMPT},
    reference::ReferenceCatalog,
    validate::validate_results,
};
use serde_json::Value;

/// A validated synthesis result
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub items: Value,
    pub count: usize,
}

/// Local half of the search pipeline
///
/// # Pipeline Stages
/// 1. Prompt construction from the query and the reference catalog
/// 2. (remote) chat completion
/// 3. JSON span extraction from the model's text
/// 4. Parsing and shape validation
#[derive(Debug, Clone)]
pub struct Synthesizer {
    catalog: ReferenceCatalog,
}

impl Synthesizer {
    pub fn new(catalog: ReferenceCatalog) -> Self {
        Self { catalog }
    }

    pub fn with_builtin_catalog() -> Self {
        Self {
            catalog: ReferenceCatalog::builtin(),
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// Build the user message for a query
    pub fn build_prompt(&self, query: &str) -> String {
        build_prompt(query, &self.catalog)
    }

    /// Turn raw model output into a validated result array
    ///
    /// The parsed value is returned untouched so numbers keep the
    /// representation the model chose.
    pub fn interpret(&self, raw: &str) -> Result<Synthesis, ExtractionError> {
        let items = parse_payload(raw)?;
        let count = validate_results(&items)?;
        Ok(Synthesis { items, count })
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::with_builtin_catalog()
    }
}
