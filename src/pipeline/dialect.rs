//! Two-dialect parsing: strict JSON, then JSON5.

use serde_json::Value;

use crate::error::PipelineError;

/// Parse `candidate` as JSON, falling back to JSON5 (trailing commas,
/// unquoted keys, comments, single quotes).
pub fn parse_candidate(candidate: &str) -> Result<Value, PipelineError> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(strict) => match json5::from_str::<Value>(candidate) {
            Ok(value) => {
                tracing::debug!("Strict JSON parse failed ({}), recovered with JSON5", strict);
                Ok(value)
            }
            Err(lenient) => Err(PipelineError::DialectParse {
                strict: strict.to_string(),
                lenient: lenient.to_string(),
            }),
        },
    }
}
