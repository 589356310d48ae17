//! Repair Orchestrator
//!
//! Drives at most three backend calls per question:
//!
//! | state          | event            | next           |
//! |----------------|------------------|----------------|
//! | `Initial`      | `Responded`      | `Attempt1`     |
//! | `Attempt1`     | `Valid`          | `Success`      |
//! | `Attempt1`     | `Invalid`        | `Repairing`    |
//! | `Repairing`    | `Responded`      | `Attempt2`     |
//! | `Repairing`    | `BackendFailed`  | `Regenerating` |
//! | `Attempt2`     | `Valid`          | `Success`      |
//! | `Attempt2`     | `Invalid`        | `Regenerating` |
//! | `Regenerating` | `Responded`      | `Attempt3`     |
//! | `Regenerating` | `BackendFailed`  | `Failed`       |
//! | `Attempt3`     | `Valid`          | `Success`      |
//! | `Attempt3`     | `Invalid`        | `Failed`       |
//!
//! A transport failure on the initial call ends the run with
//! `ReasonError::Backend`; there is no model output to keep yet. Once a first
//! response exists, every failure ends in `TerminalInvalidOutputError` so the
//! raw text survives. Dropping the future cancels the run at whatever
//! call is in flight; nothing is returned until a graph fully validates.

use tracing::{debug, info, warn};

use crate::error::{PipelineError, ReasonError, TerminalInvalidOutputError};
use crate::graph::ReasoningGraph;
use crate::pipeline;
use crate::request::ReasonRequest;

use super::prompts;
use super::provider::{GenerationRequest, LLMProvider};

/// Upper bound on backend calls for a single `reason` run
pub const MAX_BACKEND_CALLS: usize = 3;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairState {
    Initial,
    Attempt1,
    Repairing,
    Attempt2,
    Regenerating,
    Attempt3,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairEvent {
    /// A backend call returned text
    Responded,
    /// A backend call errored at the transport level
    BackendFailed,
    /// The pipeline accepted the current text
    Valid,
    /// The pipeline rejected the current text
    Invalid,
}

impl RepairState {
    /// Transition table. `None` means the event cannot occur in this state.
    pub fn next(self, event: RepairEvent) -> Option<RepairState> {
        use RepairEvent::*;
        use RepairState::*;

        match (self, event) {
            (Initial, Responded) => Some(Attempt1),
            (Attempt1, Valid) | (Attempt2, Valid) | (Attempt3, Valid) => Some(Success),
            (Attempt1, Invalid) => Some(Repairing),
            (Repairing, Responded) => Some(Attempt2),
            (Repairing, BackendFailed) => Some(Regenerating),
            (Attempt2, Invalid) => Some(Regenerating),
            (Regenerating, Responded) => Some(Attempt3),
            (Regenerating, BackendFailed) => Some(Failed),
            (Attempt3, Invalid) => Some(Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RepairState::Success | RepairState::Failed)
    }
}

/// One `reason` run. Holds the raw texts and attempt errors gathered so far.
pub struct RepairOrchestrator<'a> {
    provider: &'a dyn LLMProvider,
    model: &'a str,
    request: &'a ReasonRequest,
    state: RepairState,
    calls: usize,
    first_raw: Option<String>,
    current_raw: String,
    errors: Vec<PipelineError>,
}

impl<'a> RepairOrchestrator<'a> {
    pub fn new(provider: &'a dyn LLMProvider, model: &'a str, request: &'a ReasonRequest) -> Self {
        Self {
            provider,
            model,
            request,
            state: RepairState::Initial,
            calls: 0,
            first_raw: None,
            current_raw: String::new(),
            errors: Vec::with_capacity(MAX_BACKEND_CALLS),
        }
    }

    pub fn state(&self) -> RepairState {
        self.state
    }

    pub fn backend_calls(&self) -> usize {
        self.calls
    }

    pub async fn run(mut self) -> Result<ReasoningGraph, ReasonError> {
        loop {
            match self.state {
                RepairState::Initial => {
                    let raw = self
                        .call(prompts::generation(self.request))
                        .await
                        .map_err(ReasonError::Backend)?;
                    self.first_raw = Some(raw.clone());
                    self.current_raw = raw;
                    self.advance(RepairEvent::Responded);
                }
                RepairState::Repairing => {
                    let source = self.first_raw.clone().unwrap_or_default();
                    match self.call(prompts::repair(&source, prompts::SCHEMA_HINT)).await {
                        Ok(raw) => {
                            self.current_raw = raw;
                            self.advance(RepairEvent::Responded);
                        }
                        Err(e) => {
                            warn!("Repair call failed: {:#}", e);
                            self.errors.push(PipelineError::Backend(format!("{:#}", e)));
                            self.advance(RepairEvent::BackendFailed);
                        }
                    }
                }
                RepairState::Regenerating => {
                    match self.call(prompts::regeneration(self.request)).await {
                        Ok(raw) => {
                            self.current_raw = raw;
                            self.advance(RepairEvent::Responded);
                        }
                        Err(e) => {
                            warn!("Regeneration call failed: {:#}", e);
                            self.errors.push(PipelineError::Backend(format!("{:#}", e)));
                            self.advance(RepairEvent::BackendFailed);
                        }
                    }
                }
                RepairState::Attempt1 | RepairState::Attempt2 | RepairState::Attempt3 => {
                    match pipeline::parse_graph(&self.current_raw) {
                        Ok(graph) => {
                            self.advance(RepairEvent::Valid);
                            info!(
                                nodes = graph.nodes.len(),
                                edges = graph.edges.len(),
                                backend_calls = self.calls,
                                "Reasoning graph validated"
                            );
                            return Ok(graph);
                        }
                        Err(e) => {
                            warn!(state = ?self.state, "Model output rejected: {}", e);
                            debug!("Rejected output: {}", preview(&self.current_raw));
                            self.errors.push(e);
                            self.advance(RepairEvent::Invalid);
                        }
                    }
                }
                RepairState::Failed => return Err(self.terminal_error().into()),
                RepairState::Success => unreachable!("success returns from the attempt arm"),
            }
        }
    }

    async fn call(&mut self, request: GenerationRequest) -> anyhow::Result<String> {
        debug_assert!(self.calls < MAX_BACKEND_CALLS);
        self.calls += 1;
        debug!(call = self.calls, state = ?self.state, model = self.model, "Calling backend");
        let raw = self.provider.generate(self.model, request).await?;
        debug!("Backend response: {}", preview(&raw));
        Ok(raw)
    }

    fn advance(&mut self, event: RepairEvent) {
        match self.state.next(event) {
            Some(next) => {
                debug!(from = ?self.state, to = ?next, event = ?event, "Repair transition");
                self.state = next;
            }
            None => {
                warn!(state = ?self.state, event = ?event, "Ignoring event with no transition");
                self.state = RepairState::Failed;
            }
        }
    }

    fn terminal_error(&mut self) -> TerminalInvalidOutputError {
        let mut errors = std::mem::take(&mut self.errors).into_iter();
        let mut next = || errors.next().unwrap_or(PipelineError::Extraction);
        TerminalInvalidOutputError {
            first_raw: self.first_raw.clone().unwrap_or_default(),
            final_raw: self.current_raw.clone(),
            initial: next(),
            repair: next(),
            last: next(),
        }
    }
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}
