// Core pipeline exports
pub mod extract;
pub mod prompt;
pub mod reference;
pub mod scoring;
pub mod synthesizer;
pub mod validate;

pub use extract::{extract_json_span, parse_payload, ExtractionError};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use reference::ReferenceCatalog;
pub use scoring::neptune_score;
pub use synthesizer::{Synthesis, Synthesizer};
pub use validate::validate_results;
