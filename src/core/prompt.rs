use crate::core::{reference::ReferenceCatalog, scoring::neptune_score};
use std::fmt::Write;

/// Fixes the assistant's role for every completion call
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that synthesizes data and returns it in a strict JSON format.";

/// Keys every synthesized item must carry, in the order the model is asked for
pub const RESULT_KEYS: [&str; 5] = ["name", "rating", "price", "bookingInfo", "neptuneScore"];

// Worked example rendered into the instructions
const EXAMPLE_RATING: f64 = 4.8;
const EXAMPLE_REVIEWS: u32 = 152;

/// Build the user message for a search
///
/// The message carries the literal query, every reference source serialized
/// as compact JSON, the Neptune score formula with a worked example, and the
/// output-shape instruction.
pub fn build_prompt(query: &str, catalog: &ReferenceCatalog) -> String {
    let mut prompt = String::with_capacity(2048);

    // Writing into a String cannot fail
    let _ = writeln!(prompt, "User Question: \"{}\"", query);
    prompt.push('\n');
    prompt.push_str(
        "Based ONLY on the data provided below from Source A, Source B, and Source C, \
         answer the user's question.\n\
         Synthesize the information into a clear, combined list. If you find duplicates \
         (like 'Pupper Palace'), merge their information intelligently.\n\
         For each service, provide its name, a consolidated rating, an estimated price, \
         and booking information.\n\n",
    );

    prompt.push_str(
        "You MUST calculate a 'Neptune Score' for each unique service and include it in the JSON output.\n\
         The formula is: neptuneScore = round((rating / 5) * 70 + (numberOfReviews / 200) * 30), \
         kept within 0 to 100.\n",
    );
    let _ = writeln!(
        prompt,
        "For example, if a service has a rating of {} and {} reviews, the score would be \
         ({} / 5) * 70 + ({} / 200) * 30 = {:.1} + {:.1} = {}.",
        EXAMPLE_RATING,
        EXAMPLE_REVIEWS,
        EXAMPLE_RATING,
        EXAMPLE_REVIEWS,
        EXAMPLE_RATING / 5.0 * 70.0,
        EXAMPLE_REVIEWS as f64 / 200.0 * 30.0,
        neptune_score(EXAMPLE_RATING, EXAMPLE_REVIEWS),
    );
    prompt.push_str("Round the final score to the nearest integer.\n\n");

    prompt.push_str("Here is the data:\n");
    for (label, records) in catalog.sources() {
        let serialized = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
        let _ = writeln!(prompt, "{} (JSON): {}", label, serialized);
    }
    prompt.push('\n');

    let keys = RESULT_KEYS
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        prompt,
        "Return the final result as a single, clean JSON array of objects. \
         Each object in the array must have exactly these keys: {}. \
         Do not include any other text or explanation in your response, only the JSON array.",
        keys
    );

    prompt
}
