//! Schema Validator
//!
//! Strict, non-coercive checks over normalized output. All violations are
//! collected (not just the first) so a repair prompt or log line can show the
//! full picture. On success the value is converted into the typed model.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Violation;
use crate::graph::{EdgeRelation, NodeType, Patch, ReasoningGraph, SourceQuality};

pub fn validate_graph(value: &Value) -> Result<ReasoningGraph, Vec<Violation>> {
    let mut checker = Checker::default();
    checker.graph(value);
    checker.finish(value)
}

pub fn validate_patch(value: &Value) -> Result<Patch, Vec<Violation>> {
    let mut checker = Checker::default();
    if let Some(obj) = checker.object(value, "") {
        checker.nodes(obj, "", true);
        checker.edges(obj, "", true);
    }
    checker.finish(value)
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn finish<T: DeserializeOwned>(mut self, value: &Value) -> Result<T, Vec<Violation>> {
        if !self.violations.is_empty() {
            return Err(self.violations);
        }
        serde_json::from_value(value.clone()).map_err(|e| {
            self.violations.push(Violation::new("", e.to_string()));
            self.violations
        })
    }

    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn graph(&mut self, value: &Value) {
        let Some(obj) = self.object(value, "") else {
            return;
        };

        self.string(obj, "question", "", true);

        if let Some(items) = self.array(obj, "definitions", "", false) {
            for (i, item) in items.iter().enumerate() {
                let path = join("definitions", i);
                if let Some(def) = self.object(item, &path) {
                    self.string(def, "term", &path, true);
                    self.string(def, "meaning", &path, true);
                }
            }
        }

        if let Some(items) = self.array(obj, "assumptions", "", false) {
            for (i, item) in items.iter().enumerate() {
                let path = join("assumptions", i);
                if let Some(assumption) = self.object(item, &path) {
                    self.string(assumption, "id", &path, true);
                    self.string(assumption, "text", &path, true);
                }
            }
        }

        self.nodes(obj, "", true);
        self.edges(obj, "", true);
        self.sources(obj);

        match obj.get("answer") {
            None => self.fail("answer", "Required"),
            Some(answer) => {
                if let Some(answer) = self.object(answer, "answer") {
                    self.string(answer, "summary", "answer", true);
                    self.number(answer, "confidence", "answer", 0.0, 1.0, true);
                    for key in ["key_drivers", "weak_links", "what_would_change_my_mind"] {
                        self.string_array(answer, key, "answer");
                    }
                }
            }
        }
    }

    fn nodes(&mut self, obj: &Map<String, Value>, base: &str, required: bool) {
        let Some(items) = self.array(obj, "nodes", base, required) else {
            return;
        };
        let mut seen = HashSet::new();
        for (i, item) in items.iter().enumerate() {
            let path = join(&field_path(base, "nodes"), i);
            let Some(node) = self.object(item, &path) else {
                continue;
            };

            if let Some(id) = self.string(node, "id", &path, true) {
                if !seen.insert(id) {
                    self.fail(&field_path(&path, "id"), format!("Duplicate node id '{}'", id));
                }
            }
            let kinds: Vec<&str> = NodeType::ALL.iter().map(NodeType::as_str).collect();
            self.literal(node, "type", &path, &kinds, true);
            self.string(node, "text", &path, true);
            self.string(node, "rationale", &path, false);
            self.number(node, "confidence", &path, 0.0, 1.0, false);
            self.string_array(node, "tags", &path);

            if let Some(citations) = self.array(node, "citations", &path, false) {
                for (j, citation) in citations.iter().enumerate() {
                    let cpath = join(&field_path(&path, "citations"), j);
                    if let Some(citation) = self.object(citation, &cpath) {
                        self.string(citation, "source_id", &cpath, true);
                        self.number(citation, "start", &cpath, f64::MIN, f64::MAX, false);
                        self.number(citation, "end", &cpath, f64::MIN, f64::MAX, false);
                    }
                }
            }
        }
    }

    fn edges(&mut self, obj: &Map<String, Value>, base: &str, required: bool) {
        let Some(items) = self.array(obj, "edges", base, required) else {
            return;
        };
        let relations: Vec<&str> = EdgeRelation::ALL.iter().map(EdgeRelation::as_str).collect();
        for (i, item) in items.iter().enumerate() {
            let path = join(&field_path(base, "edges"), i);
            if let Some(edge) = self.object(item, &path) {
                self.string(edge, "from", &path, true);
                self.string(edge, "to", &path, true);
                self.literal(edge, "relation", &path, &relations, true);
                self.number(edge, "weight", &path, -1.0, 1.0, false);
            }
        }
    }

    fn sources(&mut self, obj: &Map<String, Value>) {
        let Some(items) = self.array(obj, "sources", "", false) else {
            return;
        };
        let qualities: Vec<&str> = SourceQuality::ALL.iter().map(SourceQuality::as_str).collect();
        for (i, item) in items.iter().enumerate() {
            let path = join("sources", i);
            let Some(source) = self.object(item, &path) else {
                continue;
            };
            self.string(source, "id", &path, true);
            self.string(source, "title", &path, true);
            if let Some(url) = self.string(source, "url", &path, false) {
                if reqwest::Url::parse(url).is_err() {
                    self.fail(&field_path(&path, "url"), "Invalid url");
                }
            }
            self.string(source, "published", &path, false);
            self.literal(source, "quality", &path, &qualities, false);
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.fail(path, format!("Expected object, received {}", kind(other)));
                None
            }
        }
    }

    fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        base: &str,
        required: bool,
    ) -> Option<&'v Vec<Value>> {
        let path = field_path(base, key);
        match obj.get(key) {
            None if required => {
                self.fail(&path, "Required");
                None
            }
            None => None,
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.fail(&path, format!("Expected array, received {}", kind(other)));
                None
            }
        }
    }

    fn string<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        base: &str,
        required: bool,
    ) -> Option<&'v str> {
        let path = field_path(base, key);
        match obj.get(key) {
            None if required => {
                self.fail(&path, "Required");
                None
            }
            None => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                self.fail(&path, format!("Expected string, received {}", kind(other)));
                None
            }
        }
    }

    fn string_array(&mut self, obj: &Map<String, Value>, key: &str, base: &str) {
        let Some(items) = self.array(obj, key, base, false) else {
            return;
        };
        let path = field_path(base, key);
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.fail(&join(&path, i), format!("Expected string, received {}", kind(item)));
            }
        }
    }

    fn number(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        base: &str,
        min: f64,
        max: f64,
        required: bool,
    ) {
        let path = field_path(base, key);
        match obj.get(key) {
            None if required => self.fail(&path, "Required"),
            None => {}
            Some(Value::Number(n)) => {
                let n = n.as_f64().unwrap_or(f64::NAN);
                if n.is_nan() || n < min {
                    self.fail(&path, format!("Number must be greater than or equal to {}", min));
                } else if n > max {
                    self.fail(&path, format!("Number must be less than or equal to {}", max));
                }
            }
            Some(other) => self.fail(&path, format!("Expected number, received {}", kind(other))),
        }
    }

    fn literal(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        base: &str,
        allowed: &[&str],
        required: bool,
    ) {
        let path = field_path(base, key);
        let expected = allowed
            .iter()
            .map(|a| format!("'{}'", a))
            .collect::<Vec<_>>()
            .join(" | ");
        match obj.get(key) {
            None if required => self.fail(&path, "Required"),
            None => {}
            Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
            Some(Value::String(s)) => self.fail(
                &path,
                format!("Invalid enum value. Expected {}, received '{}'", expected, s),
            ),
            Some(other) => self.fail(
                &path,
                format!("Expected {}, received {}", expected, kind(other)),
            ),
        }
    }
}

fn field_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", base, key)
    }
}

fn join(base: &str, index: usize) -> String {
    format!("{}.{}", base, index)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
