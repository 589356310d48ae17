//! Reasoning Graph Console
//!
//! Ask a question, get a validated reasoning graph, then challenge nodes to
//! merge counter-evidence into the live graph.

use anyhow::Result;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

use reason_graph::graph::{confidence_label, merge_patch, ReasoningGraph};
use reason_graph::request::DETAIL_RANGE;
use reason_graph::{Mode, ReasonError, ReasonRequest, Reasoner};

// ──────────────────────────────────────────────────────────────────────────────
// SESSION SETTINGS
// ──────────────────────────────────────────────────────────────────────────────

struct Settings {
    detail: u8,
    mode: Mode,
    assumptions: Vec<String>,
    use_mock: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detail: 3,
            mode: Mode::General,
            assumptions: Vec::new(),
            use_mock: false,
        }
    }
}

impl Settings {
    fn request(&self, question: &str) -> ReasonRequest {
        let mut req = ReasonRequest::new(question)
            .with_detail(self.detail)
            .with_mode(self.mode)
            .with_mock(self.use_mock);
        req.assumptions = self.assumptions.clone();
        req
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// CONSOLE COMMANDS
// ──────────────────────────────────────────────────────────────────────────────

/// One line of console input. Commands start with `/`; anything else is a
/// question.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Question(&'a str),
    Quit,
    Detail(u8),
    Mode(Mode),
    Assume(&'a str),
    ClearAssumptions,
    Mock(bool),
    Show,
    Json,
    Challenge(&'a str),
    Invalid(String),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(command) = line.strip_prefix('/') else {
            return Input::Question(line);
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (command, ""),
        };

        match (name.to_lowercase().as_str(), arg) {
            ("quit" | "exit" | "q", "") => Input::Quit,
            ("detail", _) => match arg.parse::<u8>() {
                Ok(d) if DETAIL_RANGE.contains(&d) => Input::Detail(d),
                _ => Input::Invalid("Detail must be between 1 and 5.".into()),
            },
            ("mode", _) => match Mode::parse(arg) {
                Some(m) => Input::Mode(m),
                None => Input::Invalid(format!("Unknown mode '{}'.", arg)),
            },
            ("assume", "") => Input::Invalid("Usage: /assume <text> | /assume clear".into()),
            ("assume", a) if a.eq_ignore_ascii_case("clear") => Input::ClearAssumptions,
            ("assume", a) => Input::Assume(a),
            ("mock", a) if a.eq_ignore_ascii_case("on") => Input::Mock(true),
            ("mock", a) if a.eq_ignore_ascii_case("off") => Input::Mock(false),
            ("mock", _) => Input::Invalid("Usage: /mock on|off".into()),
            ("show", "") => Input::Show,
            ("json", "") => Input::Json,
            ("challenge", "") => Input::Invalid("Usage: /challenge <node-id>".into()),
            ("challenge", id) => Input::Challenge(id),
            _ => Input::Invalid(format!("Unknown command '/{}'.", name)),
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reason_graph=info")),
        )
        .with_target(true)
        .init();

    // Fail fast on bad provider configuration
    let reasoner = match Reasoner::from_env() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ [{}] {}", e.code(), e);
            std::process::exit(2);
        }
    };

    println!("\n{}", "═".repeat(60));
    println!("Reasoning Graph Console (model: {})", reasoner.model());
    println!("{}", "═".repeat(60));
    println!("Type a question, or a command:");
    println!("  /challenge <node-id> | /detail <1-5> | /mode <general|scientific|legal|math>");
    println!("  /assume <text> | /assume clear | /mock on|off | /show | /json | /quit\n");

    let mut settings = Settings::default();
    let mut graph: Option<ReasoningGraph> = None;

    loop {
        print!("❓ ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        match Input::parse(line) {
            Input::Quit => break,
            Input::Detail(d) => settings.detail = d,
            Input::Mode(m) => settings.mode = m,
            Input::Assume(text) => settings.assumptions.push(text.to_string()),
            Input::ClearAssumptions => settings.assumptions.clear(),
            Input::Mock(on) => settings.use_mock = on,
            Input::Invalid(message) => println!("⚠️  {}", message),
            Input::Show => match &graph {
                Some(g) => print_graph(g),
                None => println!("No graph yet."),
            },
            Input::Json => match &graph {
                Some(g) => println!("{}", serde_json::to_string_pretty(g)?),
                None => println!("No graph yet."),
            },
            Input::Challenge(node_id) => {
                let Some(current) = graph.as_ref() else {
                    println!("Ask a question first.");
                    continue;
                };
                match reasoner.challenge_node(node_id, current).await {
                    Ok(patch) => {
                        let merged = merge_patch(current, &patch);
                        println!(
                            "🔀 Merged {} node(s), {} edge(s) into the graph.\n",
                            patch.nodes.len(),
                            merged.edges.len() - current.edges.len()
                        );
                        graph = Some(merged);
                    }
                    Err(e) => report(&e),
                }
            }
            Input::Question(question) => {
                println!("\n⚙️  Reasoning...\n");
                match reasoner.reason(&settings.request(question)).await {
                    Ok(g) => {
                        print_graph(&g);
                        graph = Some(g);
                    }
                    Err(e) => report(&e),
                }
            }
        }
    }

    println!("\n👋 Goodbye!\n");
    Ok(())
}

fn print_graph(graph: &ReasoningGraph) {
    println!("{}", "─".repeat(60));
    println!("Q: {}", graph.question);
    println!(
        "A: {} ({})",
        graph.answer.summary,
        confidence_label(graph.answer.confidence)
    );
    println!("{}", "─".repeat(60));
    for node in &graph.nodes {
        println!(
            "  [{:<11}] {:<18} {:>4}  {}",
            node.kind.as_str(),
            node.id,
            confidence_label(node.confidence),
            node.text
        );
    }
    for edge in &graph.edges {
        println!("  {} --{}({:+.2})--> {}", edge.from, edge.relation, edge.weight, edge.to);
    }
    println!("{}\n", "─".repeat(60));
}

fn report(err: &ReasonError) {
    println!("❌ [{}] {}\n", err.code(), err);
    if let Some(raw) = err.raw_output() {
        println!("Raw model output:\n{}\n", raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_starting_with_command_words() {
        for line in ["Mode of inheritance for CF?", "Show that sqrt(2) is irrational", "quit smoking benefits?"] {
            assert_eq!(Input::parse(line), Input::Question(line));
        }
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(Input::parse("/quit"), Input::Quit);
        assert_eq!(Input::parse("/detail 4"), Input::Detail(4));
        assert_eq!(Input::parse("/MODE legal"), Input::Mode(Mode::Legal));
        assert_eq!(Input::parse("/assume healthy adults"), Input::Assume("healthy adults"));
        assert_eq!(Input::parse("/assume CLEAR"), Input::ClearAssumptions);
        assert_eq!(Input::parse("/mock off"), Input::Mock(false));
        assert_eq!(Input::parse("/challenge claim1"), Input::Challenge("claim1"));
        assert_eq!(Input::parse("/json"), Input::Json);
    }

    #[test]
    fn test_bad_arguments_are_reported() {
        assert!(matches!(Input::parse("/detail 9"), Input::Invalid(_)));
        assert!(matches!(Input::parse("/mode poetic"), Input::Invalid(_)));
        assert!(matches!(Input::parse("/mock maybe"), Input::Invalid(_)));
        assert!(matches!(Input::parse("/challenge"), Input::Invalid(_)));
        assert!(matches!(Input::parse("/show everything"), Input::Invalid(_)));
        assert_eq!(
            Input::parse("/frobnicate"),
            Input::Invalid("Unknown command '/frobnicate'.".into())
        );
    }
}
