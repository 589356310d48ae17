use std::sync::Arc;

use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::error::{ReasonError, Violation};
use crate::graph::{self, Patch, ReasoningGraph};
use crate::pipeline;
use crate::request::ReasonRequest;

use super::provider::LLMProvider;
use super::repair::RepairOrchestrator;

/// Entry point for building and extending reasoning graphs.
///
/// Holds no graph state; callers own the graphs it returns.
#[derive(Clone)]
pub struct Reasoner {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl Reasoner {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.build_provider(), config.model.clone())
    }

    /// Resolve the backend from the environment and build a reasoner.
    /// Fails before any backend call if the configuration is unusable.
    pub fn from_env() -> Result<Self, ReasonError> {
        let config = BackendConfig::from_env()?;
        info!(provider = ?config.provider, model = %config.model, "Backend configured");
        Ok(Self::from_config(&config))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Produce a validated graph for `request`, repairing or regenerating
    /// the backend output at most once each.
    pub async fn reason(&self, request: &ReasonRequest) -> Result<ReasoningGraph, ReasonError> {
        request.validate().map_err(ReasonError::InvalidRequest)?;

        if request.use_mock {
            debug!("Serving sample graph");
            return sample_graph();
        }

        info!(mode = %request.mode, detail = request.detail, "Reasoning about question");
        RepairOrchestrator::new(self.provider.as_ref(), &self.model, request)
            .run()
            .await
    }

    /// Counter-evidence for `node_id`. Currently always the built-in patch;
    /// no backend call is made.
    pub async fn challenge_node(
        &self,
        node_id: &str,
        current_graph: &ReasoningGraph,
    ) -> Result<Patch, ReasonError> {
        if node_id.trim().is_empty() {
            return Err(ReasonError::InvalidRequest(vec![Violation::new(
                "nodeId",
                "nodeId is required.",
            )]));
        }
        if current_graph.node(node_id).is_none() {
            debug!(node_id, "Challenged node is not in the current graph");
        }

        pipeline::patch_from_value(&graph::challenge_patch_value())
            .map_err(|e| invalid_builtin(e.to_string()))
    }
}

fn sample_graph() -> Result<ReasoningGraph, ReasonError> {
    pipeline::graph_from_value(&graph::sample_graph_value()).map_err(|e| invalid_builtin(e.to_string()))
}

fn invalid_builtin(message: String) -> ReasonError {
    ReasonError::Internal(format!("built-in data failed validation: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::GenerationRequest;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl LLMProvider for Unreachable {
        async fn generate(&self, _model: &str, _request: GenerationRequest) -> anyhow::Result<String> {
            panic!("backend must not be called");
        }
    }

    fn reasoner() -> Reasoner {
        Reasoner::new(Arc::new(Unreachable), "test-model")
    }

    async fn mock_graph(r: &Reasoner) -> ReasoningGraph {
        r.reason(&ReasonRequest::new("Is coffee dehydrating?").with_mock(true))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_mock_mode_skips_backend() {
        let graph = mock_graph(&reasoner()).await;
        assert_eq!(graph.question, "Is coffee dehydrating for most people?");
        assert_eq!(graph.sources.len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_backend() {
        let req = ReasonRequest::new("?").with_detail(9);
        let err = reasoner().reason(&req).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_REQUEST");
        assert!(err.to_string().contains("question: Question must be at least 3 characters."));
    }

    #[tokio::test]
    async fn test_challenge_returns_fixed_patch() {
        let r = reasoner();
        let graph = mock_graph(&r).await;
        let patch = r.challenge_node("claim1", &graph).await.unwrap();
        let ids: Vec<_> = patch.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["challenge-claim", "challenge-claim2"]);
        assert_eq!(patch.edges[0].to, "claim1");
    }

    #[tokio::test]
    async fn test_challenge_requires_node_id() {
        let r = reasoner();
        let graph = mock_graph(&r).await;
        let err = r.challenge_node(" ", &graph).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_broken_builtin_data_is_internal() {
        let err = invalid_builtin("nodes.0.type: Required".into());
        assert_eq!(err.code(), "INTERNAL");
        assert!(err.raw_output().is_none());
        assert!(err.to_string().contains("built-in data failed validation"));
    }
}
