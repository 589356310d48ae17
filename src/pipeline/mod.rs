//! Output Pipeline
//!
//! Turns raw model text into a validated graph:
//! extract → parse (JSON, then JSON5) → normalize → validate.
//! Every stage is synchronous and pure.

mod dialect;
mod extract;
mod normalize;
mod validate;

pub use dialect::parse_candidate;
pub use extract::{extract_json_candidate, strip_code_fences};
pub use normalize::{normalize_graph, normalize_patch};
pub use validate::{validate_graph, validate_patch};

use serde_json::Value;

use crate::error::PipelineError;
use crate::graph::{Patch, ReasoningGraph};

/// Run the full pipeline over one backend response.
pub fn parse_graph(raw: &str) -> Result<ReasoningGraph, PipelineError> {
    let candidate = extract_json_candidate(raw).ok_or(PipelineError::Extraction)?;
    let parsed = parse_candidate(&candidate)?;
    graph_from_value(&parsed)
}

/// Normalize and validate an already-parsed graph value.
pub fn graph_from_value(value: &Value) -> Result<ReasoningGraph, PipelineError> {
    validate_graph(&normalize_graph(value)).map_err(PipelineError::SchemaValidation)
}

/// Normalize and validate an already-parsed patch value.
pub fn patch_from_value(value: &Value) -> Result<Patch, PipelineError> {
    validate_patch(&normalize_patch(value)).map_err(PipelineError::SchemaValidation)
}
