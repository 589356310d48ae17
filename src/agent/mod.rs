//! Agent Module
//!
//! Backend providers, prompt text, the repair loop and the `Reasoner` facade.

mod provider;
mod reasoner;
mod repair;
pub mod prompts;

pub use provider::{
    AnthropicProvider, GenerationRequest, LLMProvider, OllamaProvider, OpenAICompatibleProvider,
};
pub use reasoner::Reasoner;
pub use repair::{RepairEvent, RepairOrchestrator, RepairState, MAX_BACKEND_CALLS};
