use crate::core::extract::ExtractionError;
use serde_json::{Map, Value};

/// Upper bound of a Neptune score
pub const MAX_NEPTUNE_SCORE: u64 = 100;

/// Check that a parsed payload is an array of well-formed result items
///
/// Every element must be an object carrying `name` (string), `rating`
/// (number), `price` (string or number), `bookingInfo` (string) and
/// `neptuneScore` (integer in 0..=100). Extra keys pass through. An empty
/// array is valid.
///
/// Returns the number of items.
pub fn validate_results(payload: &Value) -> Result<usize, ExtractionError> {
    let items = payload.as_array().ok_or_else(|| {
        ExtractionError::UnexpectedShape(format!("expected a JSON array, got {}", kind(payload)))
    })?;

    for (index, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| {
            ExtractionError::UnexpectedShape(format!("item {} is {}, not an object", index, kind(item)))
        })?;

        validate_item(object)
            .map_err(|reason| ExtractionError::UnexpectedShape(format!("item {}: {}", index, reason)))?;
    }

    Ok(items.len())
}

fn validate_item(object: &Map<String, Value>) -> Result<(), String> {
    require(object, "name", Value::is_string, "a string")?;
    require(object, "rating", Value::is_number, "a number")?;
    require(object, "price", |v| v.is_string() || v.is_number(), "a string or number")?;
    require(object, "bookingInfo", Value::is_string, "a string")?;

    let score = object
        .get("neptuneScore")
        .ok_or_else(|| "missing key \"neptuneScore\"".to_string())?;

    match score_as_integer(score) {
        Some(s) if s <= MAX_NEPTUNE_SCORE => Ok(()),
        Some(s) => Err(format!("neptuneScore {} is out of range 0-{}", s, MAX_NEPTUNE_SCORE)),
        None => Err(format!("neptuneScore must be an integer in 0-{}, got {}", MAX_NEPTUNE_SCORE, score)),
    }
}

fn require(
    object: &Map<String, Value>,
    key: &str,
    check: impl Fn(&Value) -> bool,
    expected: &str,
) -> Result<(), String> {
    match object.get(key) {
        Some(value) if check(value) => Ok(()),
        Some(value) => Err(format!("\"{}\" must be {}, got {}", key, expected, kind(value))),
        None => Err(format!("missing key \"{}\"", key)),
    }
}

/// Non-negative integer view of a score; whole floats such as `90.0` count
fn score_as_integer(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }

    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
