//! Recover a JSON object from freeform model output.
//!
//! Extraction is a brace-boundary slice, not a parser: the candidate runs from
//! the first `{` to the last `}` after code fences are removed. Replies with
//! several top-level objects, or with stray braces in surrounding prose, slice
//! incorrectly and are caught by the parser or validator downstream.

use serde_json::Value;
use tracing::warn;

use crate::AnalysisError;

/// Characters of a rejected candidate kept for logging.
const EXCERPT_CHARS: usize = 500;

/// Strip code fences and slice the outermost `{ ... }` span.
pub fn extract_json_object(raw: &str) -> Result<String, AnalysisError> {
    let cleaned = raw.trim().replace("```json", "").replace("```", "");

    let start = cleaned.find('{');
    let end = cleaned.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(cleaned[start..=end].to_string()),
        _ => Err(AnalysisError::Extraction),
    }
}

/// Strictly decode an extracted candidate. No repair is attempted.
pub fn parse_candidate(candidate: &str) -> Result<Value, AnalysisError> {
    serde_json::from_str(candidate).map_err(|source| {
        let excerpt: String = candidate.chars().take(EXCERPT_CHARS).collect();
        warn!(
            error = %source,
            candidate_len = candidate.len(),
            excerpt = %excerpt,
            "model output is not valid JSON"
        );
        AnalysisError::Parse { source, excerpt }
    })
}
