//! Error types
//!
//! `PipelineError` covers one failed pass over a backend response and never
//! leaves the repair loop. `ReasonError` is what callers see.

use std::fmt;

/// One failed field check, e.g. `nodes.3.type: Invalid enum value ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "root" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

pub(crate) fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of a single extract → parse → normalize → validate pass
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("No JSON candidate found.")]
    Extraction,

    #[error("JSON parse error: {strict}; JSON5 parse error: {lenient}")]
    DialectParse { strict: String, lenient: String },

    #[error("Schema validation failed: {}", join_violations(.0))]
    SchemaValidation(Vec<Violation>),

    /// The round trip for this attempt never produced text
    #[error("Backend request failed: {0}")]
    Backend(String),
}

/// Missing or unusable backend configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("LLM_PROVIDER must be one of \"anthropic\", \"openai\" or \"ollama\" (got \"{0}\")")]
    UnsupportedProvider(String),

    #[error("{provider} API key is not configured. Set {hint}.")]
    MissingApiKey {
        provider: &'static str,
        hint: &'static str,
    },

    #[error("LLM_BASE_URL is not a valid absolute URL: {0}")]
    InvalidBaseUrl(String),
}

/// Every attempt (initial, repair, regeneration) produced unusable output
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "Model returned invalid JSON after repair attempts.\n\
     Initial parse error: {initial}\n\
     Repair parse error: {repair}\n\
     Final parse error: {last}"
)]
pub struct TerminalInvalidOutputError {
    pub first_raw: String,
    pub final_raw: String,
    pub initial: PipelineError,
    pub repair: PipelineError,
    pub last: PipelineError,
}

impl TerminalInvalidOutputError {
    /// Both raw backend texts, for debugging
    pub fn raw_output(&self) -> String {
        format!(
            "First response:\n{}\n\nSecond response:\n{}",
            self.first_raw, self.final_raw
        )
    }

    pub fn attempts(&self) -> [&PipelineError; 3] {
        [&self.initial, &self.repair, &self.last]
    }
}

/// Caller-visible failure of `reason` or `challenge_node`
#[derive(Debug, thiserror::Error)]
pub enum ReasonError {
    #[error("Request validation failed: {}", join_violations(.0))]
    InvalidRequest(Vec<Violation>),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    InvalidOutput(#[from] TerminalInvalidOutputError),

    #[error("Backend request failed: {0:#}")]
    Backend(anyhow::Error),

    /// Built-in sample data failed its own validation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReasonError {
    /// Stable code separating caller mistakes from model failures
    pub fn code(&self) -> &'static str {
        match self {
            ReasonError::InvalidRequest(_) => "INVALID_REQUEST",
            ReasonError::Configuration(_) => "CONFIGURATION",
            ReasonError::InvalidOutput(_) => "MODEL_INVALID_JSON",
            ReasonError::Backend(_) => "BACKEND_UNAVAILABLE",
            ReasonError::Internal(_) => "INTERNAL",
        }
    }

    pub fn raw_output(&self) -> Option<String> {
        match self {
            ReasonError::InvalidOutput(e) => Some(e.raw_output()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display_uses_root_for_empty_path() {
        assert_eq!(Violation::new("", "Expected object").to_string(), "root: Expected object");
        assert_eq!(
            Violation::new("nodes.0.type", "Required").to_string(),
            "nodes.0.type: Required"
        );
    }

    #[test]
    fn test_dialect_error_keeps_both_messages() {
        let err = PipelineError::DialectParse {
            strict: "expected value at line 1".into(),
            lenient: "unexpected end".into(),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected value at line 1; JSON5 parse error: unexpected end"
        );
    }

    #[test]
    fn test_terminal_error_chains_all_attempts() {
        let err = TerminalInvalidOutputError {
            first_raw: "nope".into(),
            final_raw: "still nope".into(),
            initial: PipelineError::Extraction,
            repair: PipelineError::Backend("timeout".into()),
            last: PipelineError::SchemaValidation(vec![Violation::new("question", "Required")]),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Model returned invalid JSON after repair attempts."));
        assert!(msg.contains("Initial parse error: No JSON candidate found."));
        assert!(msg.contains("Repair parse error: Backend request failed: timeout"));
        assert!(msg.contains("Final parse error: Schema validation failed: question: Required"));
        assert_eq!(err.raw_output(), "First response:\nnope\n\nSecond response:\nstill nope");
    }

    #[test]
    fn test_reason_error_codes() {
        let err: ReasonError = ConfigurationError::UnsupportedProvider("bard".into()).into();
        assert_eq!(err.code(), "CONFIGURATION");
        assert!(err.raw_output().is_none());
        assert_eq!(ReasonError::InvalidRequest(vec![]).code(), "INVALID_REQUEST");
        assert_eq!(ReasonError::Internal("bad sample".into()).code(), "INTERNAL");
    }
}
