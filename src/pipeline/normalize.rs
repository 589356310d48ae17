//! Shape Normalizer
//!
//! Coerces whatever the dialect parser produced into the canonical shape the
//! validator expects. Every field follows a fixed decision tree; alternate
//! field names are tried left to right:
//!
//! | target              | read from                    | fallback            |
//! |---------------------|------------------------------|---------------------|
//! | `source.id`         | `id`, `source`               | `S<i+1>`            |
//! | `source.title`      | `title`, `name`, `url`       | `Source <i+1>`      |
//! | `citation.source_id`| `source_id`, `id`, `source`  | entry dropped       |
//! | `edge.relation`     | `relation`, `type`           | `""`                |
//!
//! Enum-valued fields (`node.type`, `edge.relation`) are never rewritten into a
//! valid literal; a bad value is left for the validator to reject.

use serde_json::{Map, Number, Value};

const NODE_CONFIDENCE_DEFAULT: f64 = 0.5;
const EDGE_WEIGHT_DEFAULT: f64 = 0.5;
const ANSWER_CONFIDENCE_DEFAULT: f64 = 0.6;
const SOURCE_QUALITIES: [&str; 3] = ["high", "med", "low"];

/// Normalize a full reasoning graph. Never fails.
pub fn normalize_graph(raw: &Value) -> Value {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let mut out = Map::new();
    out.insert("question".into(), Value::String(coerce_string(obj.get("question"), "")));
    out.insert("definitions".into(), Value::Array(array_of(obj.get("definitions")).to_vec()));
    out.insert("assumptions".into(), Value::Array(array_of(obj.get("assumptions")).to_vec()));
    out.insert("nodes".into(), Value::Array(normalize_nodes(obj.get("nodes"))));
    out.insert("edges".into(), Value::Array(normalize_edges(obj.get("edges"))));
    out.insert("sources".into(), Value::Array(normalize_sources(obj.get("sources"))));
    out.insert("answer".into(), normalize_answer(obj.get("answer")));
    Value::Object(out)
}

/// Normalize a challenge patch (`nodes` and `edges` only). Never fails.
pub fn normalize_patch(raw: &Value) -> Value {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let mut out = Map::new();
    out.insert("nodes".into(), Value::Array(normalize_nodes(obj.get("nodes"))));
    out.insert("edges".into(), Value::Array(normalize_edges(obj.get("edges"))));
    Value::Object(out)
}

fn normalize_sources(raw: Option<&Value>) -> Vec<Value> {
    let list = array_of(raw);

    if matches!(list.first(), Some(Value::String(_))) {
        return list
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let mut source = Map::new();
                source.insert("id".into(), Value::String(format!("S{}", i + 1)));
                source.insert("title".into(), Value::String(coerce_string(Some(title), "")));
                Value::Object(source)
            })
            .collect();
    }

    list.iter()
        .enumerate()
        .map(|(i, entry)| {
            let id = first_present(entry, &["id", "source"]);
            let title = first_present(entry, &["title", "name", "url"]);

            let mut source = Map::new();
            source.insert(
                "id".into(),
                Value::String(coerce_string(id, &format!("S{}", i + 1))),
            );
            source.insert(
                "title".into(),
                Value::String(coerce_string(title, &format!("Source {}", i + 1))),
            );
            for key in ["url", "published"] {
                if let Some(Value::String(s)) = entry.get(key) {
                    source.insert(key.into(), Value::String(s.clone()));
                }
            }
            if let Some(Value::String(q)) = entry.get("quality") {
                if SOURCE_QUALITIES.contains(&q.as_str()) {
                    source.insert("quality".into(), Value::String(q.clone()));
                }
            }
            Value::Object(source)
        })
        .collect()
}

fn normalize_citations(raw: Option<&Value>) -> Vec<Value> {
    array_of(raw)
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) if !s.is_empty() => {
                let mut citation = Map::new();
                citation.insert("source_id".into(), Value::String(s.clone()));
                Some(Value::Object(citation))
            }
            Value::Object(_) => {
                let source_id = first_present(entry, &["source_id", "id", "source"])
                    .filter(|v| is_truthy(v))?;
                let mut citation = Map::new();
                citation.insert("source_id".into(), Value::String(coerce_string(Some(source_id), "")));
                for key in ["start", "end"] {
                    if let Some(n @ Value::Number(_)) = entry.get(key) {
                        citation.insert(key.into(), n.clone());
                    }
                }
                Some(Value::Object(citation))
            }
            _ => None,
        })
        .collect()
}

fn normalize_nodes(raw: Option<&Value>) -> Vec<Value> {
    array_of(raw)
        .iter()
        .map(|node| {
            let mut out = Map::new();

            let id = match node.get("id") {
                Some(v) if !v.is_null() => coerce_string(Some(v), ""),
                _ => uuid::Uuid::new_v4().to_string(),
            };
            out.insert("id".into(), Value::String(id));

            if let Some(kind) = node.get("type").filter(|v| !v.is_null()) {
                out.insert("type".into(), kind.clone());
            }

            out.insert("text".into(), Value::String(coerce_string(node.get("text"), "")));

            let rationale = match node.get("rationale") {
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            };
            out.insert("rationale".into(), Value::String(rationale));

            out.insert(
                "confidence".into(),
                clamped(node.get("confidence"), 0.0, 1.0, NODE_CONFIDENCE_DEFAULT),
            );
            out.insert(
                "citations".into(),
                Value::Array(normalize_citations(node.get("citations"))),
            );
            out.insert("tags".into(), Value::Array(string_list(node.get("tags"))));
            Value::Object(out)
        })
        .collect()
}

fn normalize_edges(raw: Option<&Value>) -> Vec<Value> {
    array_of(raw)
        .iter()
        .map(|edge| {
            let mut out = Map::new();
            out.insert("from".into(), Value::String(coerce_string(edge.get("from"), "")));
            out.insert("to".into(), Value::String(coerce_string(edge.get("to"), "")));

            let relation = first_present(edge, &["relation", "type"]);
            out.insert("relation".into(), Value::String(coerce_string(relation, "")));

            out.insert(
                "weight".into(),
                clamped(edge.get("weight"), -1.0, 1.0, EDGE_WEIGHT_DEFAULT),
            );
            Value::Object(out)
        })
        .collect()
}

fn normalize_answer(raw: Option<&Value>) -> Value {
    let empty = Value::Object(Map::new());
    let answer = match raw {
        Some(v @ Value::Object(_)) => v,
        _ => &empty,
    };

    let mut out = Map::new();
    out.insert("summary".into(), Value::String(coerce_string(answer.get("summary"), "")));
    out.insert(
        "confidence".into(),
        clamped(answer.get("confidence"), 0.0, 1.0, ANSWER_CONFIDENCE_DEFAULT),
    );
    for key in ["key_drivers", "weak_links", "what_would_change_my_mind"] {
        out.insert(key.into(), Value::Array(string_list(answer.get(key))));
    }
    Value::Object(out)
}

fn array_of(raw: Option<&Value>) -> &[Value] {
    match raw {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// First non-null value among `keys`, in order
fn first_present<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| entry.get(*k))
        .find(|v| !v.is_null())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render any JSON value as a string. Null or absent yields `default`.
fn coerce_string(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite())
}

fn clamped(value: Option<&Value>, min: f64, max: f64, default: f64) -> Value {
    let n = coerce_number(value).map_or(default, |f| f.clamp(min, max));
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn string_list(value: Option<&Value>) -> Vec<Value> {
    array_of(value)
        .iter()
        .map(|item| Value::String(coerce_string(Some(item), "")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fills_missing_collections() {
        let out = normalize_graph(&json!({
            "question": "Q",
            "nodes": [],
            "edges": [],
            "answer": {"summary": "A", "confidence": 0.9}
        }));
        assert_eq!(out["sources"], json!([]));
        assert_eq!(out["definitions"], json!([]));
        assert_eq!(out["assumptions"], json!([]));
        assert_eq!(out["answer"]["confidence"], 0.9);
        assert_eq!(out["answer"]["key_drivers"], json!([]));
    }

    #[test]
    fn test_string_sources_become_titles() {
        let out = normalize_graph(&json!({"sources": ["Paper A", "Paper B"]}));
        assert_eq!(
            out["sources"],
            json!([{"id": "S1", "title": "Paper A"}, {"id": "S2", "title": "Paper B"}])
        );
    }

    #[test]
    fn test_source_alternate_field_names() {
        let out = normalize_graph(&json!({"sources": [
            {"source": "x1", "name": "Named", "quality": "excellent", "published": 2020},
            {"url": "https://example.com/a", "quality": "low"},
            {}
        ]}));
        assert_eq!(out["sources"][0], json!({"id": "x1", "title": "Named"}));
        assert_eq!(
            out["sources"][1],
            json!({"id": "S2", "title": "https://example.com/a", "url": "https://example.com/a", "quality": "low"})
        );
        assert_eq!(out["sources"][2], json!({"id": "S3", "title": "Source 3"}));
    }

    #[test]
    fn test_citation_forms() {
        let out = normalize_graph(&json!({"nodes": [{
            "id": "n1",
            "type": "claim",
            "citations": ["s1", {"id": "s2", "start": 3, "end": "9"}, {"source": "s3"}, {"title": "none"}, "", 7, null]
        }]}));
        assert_eq!(
            out["nodes"][0]["citations"],
            json!([{"source_id": "s1"}, {"source_id": "s2", "start": 3}, {"source_id": "s3"}])
        );
    }

    #[test]
    fn test_node_defaults_and_generated_id() {
        let out = normalize_graph(&json!({"nodes": [{"type": "claim", "text": 42, "tags": ["a", 1, true]}]}));
        let node = &out["nodes"][0];
        let id = node["id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert_eq!(node["text"], "42");
        assert_eq!(node["rationale"], "");
        assert_eq!(node["confidence"], 0.5);
        assert_eq!(node["tags"], json!(["a", "1", "true"]));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let out = normalize_graph(&json!({"nodes": [{"type": "claim"}, {"type": "claim"}]}));
        assert_ne!(out["nodes"][0]["id"], out["nodes"][1]["id"]);
    }

    #[test]
    fn test_node_type_is_not_repaired() {
        let out = normalize_graph(&json!({"nodes": [{"id": "n1", "type": "Claim"}, {"id": "n2"}]}));
        assert_eq!(out["nodes"][0]["type"], "Claim");
        assert!(out["nodes"][1].get("type").is_none());
    }

    #[test]
    fn test_clamping() {
        let out = normalize_graph(&json!({
            "nodes": [{"id": "a", "confidence": 1.7}, {"id": "b", "confidence": -3}, {"id": "c", "confidence": "0.25"}],
            "edges": [{"from": "a", "to": "b", "relation": "supports", "weight": -4.5}, {"from": 1, "to": 2, "type": "contradicts", "weight": "heavy"}],
            "answer": {"confidence": 9}
        }));
        assert_eq!(out["nodes"][0]["confidence"], 1.0);
        assert_eq!(out["nodes"][1]["confidence"], 0.0);
        assert_eq!(out["nodes"][2]["confidence"], 0.25);
        assert_eq!(out["edges"][0]["weight"], -1.0);
        assert_eq!(out["edges"][1], json!({"from": "1", "to": "2", "relation": "contradicts", "weight": 0.5}));
        assert_eq!(out["answer"]["confidence"], 1.0);
    }

    #[test]
    fn test_non_object_root() {
        let out = normalize_graph(&json!([1, 2, 3]));
        assert_eq!(out["question"], "");
        assert_eq!(out["nodes"], json!([]));
        assert_eq!(out["answer"]["confidence"], 0.6);
    }

    #[test]
    fn test_idempotent_on_sloppy_input() {
        let raw = json!({
            "question": 7,
            "sources": [{"name": "N", "url": "https://x.org", "quality": "med"}],
            "nodes": [{"type": "evidence", "confidence": 3, "citations": ["S1"]}],
            "edges": [{"from": "a", "to": "b", "type": "supports"}],
            "answer": "just text"
        });
        let once = normalize_graph(&raw);
        let twice = normalize_graph(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_patch_keeps_only_nodes_and_edges() {
        let out = normalize_patch(&json!({"nodes": [{"id": "x", "type": "claim"}], "question": "ignored"}));
        assert_eq!(out.as_object().unwrap().len(), 2);
        assert_eq!(out["edges"], json!([]));
    }
}
