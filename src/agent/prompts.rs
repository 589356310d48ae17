//! Prompt text for generation, repair and regeneration calls.

use crate::request::ReasonRequest;

use super::provider::GenerationRequest;

pub const SYSTEM_PROMPT: &str = r#"
You are a reasoning engine that outputs ONE JSON object matching this schema summary exactly.

Required top-level keys:
- question: string
- nodes: array of { id: string, type: "subquestion"|"claim"|"evidence"|"assumption"|"computation"|"answer", text: string, rationale?: string, confidence?: number [0..1], citations?: {source_id:string,start?:number,end?:number}[], tags?: string[] }
- edges: array of { from: string, to: string, relation: "supports"|"contradicts"|"depends_on"|"derived_from", weight?: number [-1..1] }
- sources: array of { id: string, title: string, url?: string, published?: string, quality?: "high"|"med"|"low" }
  IMPORTANT: Do NOT output sources as plain strings. Each source must be an OBJECT with "id" and "title" at minimum.
- answer: { summary: string, confidence: number [0..1], key_drivers?: string[], weak_links?: string[], what_would_change_my_mind?: string[] }

Constraints:
- Total nodes ≤ 20.
- Every factual claim that uses external info must include at least one citation referencing sources[].id.
- Output VALID JSON ONLY. No markdown, no commentary, no code fences.

Minimal example (structure only, not content):
{
  "question": "Q?",
  "nodes": [
    {"id": "n1", "type": "answer", "text": "Example answer", "confidence": 0.7, "citations": [], "tags": []}
  ],
  "edges": [],
  "sources": [
    {"id": "s1", "title": "Example Source", "url": "https://example.com"}
  ],
  "answer": {
    "summary": "Example",
    "confidence": 0.7,
    "key_drivers": [],
    "weak_links": [],
    "what_would_change_my_mind": []
  }
}
"#;

pub const REPAIR_SYSTEM_PROMPT: &str =
    "You repair malformed JSON to EXACTLY match the target schema. Output VALID JSON ONLY. No markdown, no commentary.";

const STRICT_DIRECTIVE: &str =
    "Return VALID JSON ONLY. If unsure, return minimal valid object per schema.";

pub const SCHEMA_HINT: &str = "ReasoningGraph";

const GENERATION_TEMPERATURE: f32 = 0.2;
const REPAIR_TEMPERATURE: f32 = 0.0;
const REGENERATION_TEMPERATURE: f32 = 0.1;
const GENERATION_MAX_TOKENS: u32 = 2000;
const REPAIR_MAX_TOKENS: u32 = 1500;

pub fn user_prompt(request: &ReasonRequest) -> String {
    let assumptions = if request.assumptions.is_empty() {
        "None".to_string()
    } else {
        request.assumptions.join("\n")
    };
    format!(
        "\nQuestion: {}\nAssumptions: {}\nDetail level: {}\nMode: {}\nReturn the JSON now.\n",
        request.question, assumptions, request.detail, request.mode
    )
}

/// First call for a question
pub fn generation(request: &ReasonRequest) -> GenerationRequest {
    GenerationRequest::new(user_prompt(request))
        .with_system(SYSTEM_PROMPT)
        .with_temperature(GENERATION_TEMPERATURE)
        .with_max_tokens(GENERATION_MAX_TOKENS)
}

/// Ask the backend to fix its own output
pub fn repair(raw: &str, schema_hint: &str) -> GenerationRequest {
    let prompt = format!(
        "The following text should be a JSON object that matches the schema summary.
Fix it so that it is valid JSON and matches the schema keys and types. Output ONLY the JSON.

---SCHEMA SUMMARY ({schema_hint})---
Required keys: question, nodes, edges, sources, answer.
nodes[].type ∈ {{subquestion, claim, evidence, assumption, computation, answer}}
edges[].relation ∈ {{supports, contradicts, depends_on, derived_from}}
answer has {{ summary: string, confidence: number in [0,1] }}
--------------------

TEXT TO FIX:
{raw}"
    );
    GenerationRequest::new(prompt)
        .with_system(REPAIR_SYSTEM_PROMPT)
        .with_temperature(REPAIR_TEMPERATURE)
        .with_max_tokens(REPAIR_MAX_TOKENS)
}

/// Fresh attempt with the original prompt and a stricter directive
pub fn regeneration(request: &ReasonRequest) -> GenerationRequest {
    GenerationRequest::new(user_prompt(request))
        .with_system(format!("{}\n{}", SYSTEM_PROMPT, STRICT_DIRECTIVE))
        .with_temperature(REGENERATION_TEMPERATURE)
        .with_max_tokens(GENERATION_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Mode;

    fn request() -> ReasonRequest {
        ReasonRequest::new("Is coffee dehydrating?")
            .with_detail(4)
            .with_mode(Mode::Scientific)
    }

    #[test]
    fn test_user_prompt_without_assumptions() {
        let prompt = user_prompt(&request());
        assert!(prompt.contains("Question: Is coffee dehydrating?"));
        assert!(prompt.contains("Assumptions: None"));
        assert!(prompt.contains("Detail level: 4"));
        assert!(prompt.contains("Mode: Scientific"));
    }

    #[test]
    fn test_user_prompt_joins_assumptions() {
        let req = request().with_assumption("healthy adults").with_assumption("daily intake");
        assert!(user_prompt(&req).contains("Assumptions: healthy adults\ndaily intake"));
    }

    #[test]
    fn test_repair_embeds_raw_text_and_schema() {
        let req = repair("{broken", SCHEMA_HINT);
        assert!(req.prompt.ends_with("TEXT TO FIX:\n{broken"));
        assert!(req.prompt.contains("---SCHEMA SUMMARY (ReasoningGraph)---"));
        assert!(req.prompt.contains("nodes[].type ∈ {subquestion, claim"));
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.max_tokens, 1500);
    }

    #[test]
    fn test_regeneration_is_stricter() {
        let req = regeneration(&request());
        let system = req.system.unwrap();
        assert!(system.starts_with(SYSTEM_PROMPT));
        assert!(system.ends_with(STRICT_DIRECTIVE));
        assert_eq!(req.prompt, generation(&request()).prompt);
    }
}
