//! Reasoning Graphs
//!
//! Turns free-form model output into validated reasoning graphs:
//! - Candidate extraction from noisy text
//! - Strict JSON with a JSON5 fallback
//! - Shape normalization and strict schema validation
//! - Bounded repair / regeneration retries
//! - Additive patch merging for challenges

pub mod agent;
pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod request;

// Re-exports for convenience
pub use agent::{LLMProvider, Reasoner};
pub use config::BackendConfig;
pub use error::{ConfigurationError, PipelineError, ReasonError, TerminalInvalidOutputError};
pub use graph::{merge_patch, Patch, ReasoningGraph};
pub use request::{Mode, ReasonRequest};
