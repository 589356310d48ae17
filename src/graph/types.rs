use serde::{Deserialize, Serialize};

/// Kind of reasoning unit a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Subquestion,
    Claim,
    Evidence,
    Assumption,
    Computation,
    Answer,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::Subquestion,
        NodeType::Claim,
        NodeType::Evidence,
        NodeType::Assumption,
        NodeType::Computation,
        NodeType::Answer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Subquestion => "subquestion",
            NodeType::Claim => "claim",
            NodeType::Evidence => "evidence",
            NodeType::Assumption => "assumption",
            NodeType::Computation => "computation",
            NodeType::Answer => "answer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed relation carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRelation {
    Supports,
    Contradicts,
    DependsOn,
    DerivedFrom,
}

impl EdgeRelation {
    pub const ALL: [EdgeRelation; 4] = [
        EdgeRelation::Supports,
        EdgeRelation::Contradicts,
        EdgeRelation::DependsOn,
        EdgeRelation::DerivedFrom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeRelation::Supports => "supports",
            EdgeRelation::Contradicts => "contradicts",
            EdgeRelation::DependsOn => "depends_on",
            EdgeRelation::DerivedFrom => "derived_from",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl std::fmt::Display for EdgeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceQuality {
    High,
    Med,
    Low,
}

impl SourceQuality {
    pub const ALL: [SourceQuality; 3] = [SourceQuality::High, SourceQuality::Med, SourceQuality::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceQuality::High => "high",
            SourceQuality::Med => "med",
            SourceQuality::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.as_str() == s)
    }
}

/// A referenced document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<SourceQuality>,
}

/// Pointer from a node into a source, with an optional span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl Citation {
    pub fn to(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            start: None,
            end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub text: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default = "default_node_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: NodeType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
            rationale: String::new(),
            confidence: default_node_confidence(),
            citations: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Directed, weighted relation between two node ids.
///
/// Endpoints are plain ids; nothing checks that they name existing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub relation: EdgeRelation,
    #[serde(default = "default_edge_weight")]
    pub weight: f64,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, relation: EdgeRelation) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation,
            weight: default_edge_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Identity used when unioning edge sets
    pub fn key(&self) -> (&str, &str, EdgeRelation) {
        (&self.from, &self.to, self.relation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub summary: String,
    pub confidence: f64,
    #[serde(default)]
    pub key_drivers: Vec<String>,
    #[serde(default)]
    pub weak_links: Vec<String>,
    #[serde(default)]
    pub what_would_change_my_mind: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assumption {
    pub id: String,
    pub text: String,
}

/// Validated aggregate produced for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningGraph {
    pub question: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub assumptions: Vec<Assumption>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub answer: Answer,
}

impl ReasoningGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Incremental addition to a graph. Never removes anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

fn default_node_confidence() -> f64 {
    0.5
}

fn default_edge_weight() -> f64 {
    0.5
}

/// Render a confidence in `[0, 1]` as a whole percentage, e.g. `0.74 -> "74%"`
pub fn confidence_label(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_type_wire_names() {
        let node = GraphNode::new("n1", NodeType::Computation, "2 + 2 = 4");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "computation");
        assert_eq!(value["confidence"], 0.5);
    }

    #[test]
    fn test_edge_relation_snake_case() {
        let edge: GraphEdge = serde_json::from_value(json!({
            "from": "a", "to": "b", "relation": "depends_on"
        }))
        .unwrap();
        assert_eq!(edge.relation, EdgeRelation::DependsOn);
        assert_eq!(edge.weight, 0.5);
    }

    #[test]
    fn test_optional_source_fields_are_omitted() {
        let source = Source {
            id: "s1".into(),
            title: "Paper".into(),
            url: None,
            published: None,
            quality: Some(SourceQuality::Med),
        };
        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value, json!({"id": "s1", "title": "Paper", "quality": "med"}));
    }

    #[test]
    fn test_enum_parse_rejects_unknown() {
        assert_eq!(NodeType::parse("claim"), Some(NodeType::Claim));
        assert_eq!(NodeType::parse("Claim"), None);
        assert_eq!(EdgeRelation::parse("refutes"), None);
        assert_eq!(SourceQuality::parse("medium"), None);
    }

    #[test]
    fn test_confidence_label() {
        assert_eq!(confidence_label(0.74), "74%");
        assert_eq!(confidence_label(0.005), "1%");
        assert_eq!(confidence_label(1.0), "100%");
    }
}
