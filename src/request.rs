//! Reason Requests
//!
//! Caller input for `Reasoner::reason`, checked before any backend call.

use serde::{Deserialize, Serialize};

use crate::error::Violation;

const MIN_QUESTION_CHARS: usize = 3;
const MAX_ASSUMPTION_CHARS: usize = 400;
pub const DETAIL_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Reasoning style requested from the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    General,
    Scientific,
    Legal,
    Math,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(Mode::General),
            "scientific" => Some(Mode::Scientific),
            "legal" => Some(Mode::Legal),
            "math" => Some(Mode::Math),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::General => write!(f, "General"),
            Mode::Scientific => write!(f, "Scientific"),
            Mode::Legal => write!(f, "Legal"),
            Mode::Math => write!(f, "Math"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonRequest {
    pub question: String,
    /// 1 (terse) to 5 (exhaustive)
    pub detail: u8,
    pub mode: Mode,
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Serve the built-in sample graph instead of calling the backend
    #[serde(default)]
    pub use_mock: bool,
}

impl ReasonRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            detail: 3,
            mode: Mode::General,
            assumptions: Vec::new(),
            use_mock: false,
        }
    }

    pub fn with_detail(mut self, detail: u8) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }

    pub fn with_mock(mut self, use_mock: bool) -> Self {
        self.use_mock = use_mock;
        self
    }

    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        if self.question.chars().count() < MIN_QUESTION_CHARS {
            violations.push(Violation::new(
                "question",
                format!("Question must be at least {} characters.", MIN_QUESTION_CHARS),
            ));
        }
        if !DETAIL_RANGE.contains(&self.detail) {
            violations.push(Violation::new(
                "detail",
                format!(
                    "Detail must be between {} and {}.",
                    DETAIL_RANGE.start(),
                    DETAIL_RANGE.end()
                ),
            ));
        }
        for (i, assumption) in self.assumptions.iter().enumerate() {
            let len = assumption.chars().count();
            if len == 0 || len > MAX_ASSUMPTION_CHARS {
                violations.push(Violation::new(
                    format!("assumptions.{}", i),
                    format!("Assumption must be 1 to {} characters.", MAX_ASSUMPTION_CHARS),
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = ReasonRequest::new("Why is the sky blue?")
            .with_detail(5)
            .with_mode(Mode::Scientific)
            .with_assumption("clear day");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_collects_all_problems() {
        let req = ReasonRequest::new("Hi")
            .with_detail(0)
            .with_assumption("")
            .with_assumption("x".repeat(401));
        let violations = req.validate().unwrap_err();
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["question", "detail", "assumptions.0", "assumptions.1"]);
    }

    #[test]
    fn test_question_length_counts_chars() {
        assert!(ReasonRequest::new("¿Ñ?").validate().is_ok());
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!(Mode::parse("legal"), Some(Mode::Legal));
        assert_eq!(Mode::parse("MATH"), Some(Mode::Math));
        assert_eq!(Mode::parse("poetry"), None);
        assert_eq!(Mode::Scientific.to_string(), "Scientific");
    }

    #[test]
    fn test_request_wire_shape() {
        let req: ReasonRequest = serde_json::from_str(
            r#"{"question": "Is tea healthy?", "detail": 2, "mode": "Math"}"#,
        )
        .unwrap();
        assert_eq!(req.mode, Mode::Math);
        assert!(req.assumptions.is_empty());
        assert!(!req.use_mock);
    }
}
