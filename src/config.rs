//! Backend Configuration
//!
//! Provider selection and credentials come from the process environment
//! (optionally seeded from `.env`). Everything is resolved up front so a bad
//! setup fails before any backend call is made.

use std::sync::Arc;

use ollama_rs::Ollama;

use crate::agent::{AnthropicProvider, LLMProvider, OllamaProvider, OpenAICompatibleProvider};
use crate::error::ConfigurationError;

pub const LLM_PROVIDER_ENV: &str = "LLM_PROVIDER";
pub const LLM_MODEL_ENV: &str = "LLM_MODEL";
pub const LLM_BASE_URL_ENV: &str = "LLM_BASE_URL";
pub const LLM_API_KEY_ENV: &str = "LLM_API_KEY";
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAICompatible,
    Ollama,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-3-sonnet-20240229",
            ProviderKind::OpenAICompatible => "gpt-4o-mini",
            ProviderKind::Ollama => "llama3.2:3b",
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigurationError> {
        match value.trim().to_lowercase().as_str() {
            "" | "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAICompatible),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(ConfigurationError::UnsupportedProvider(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<reqwest::Url>,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = ProviderKind::parse(&get(LLM_PROVIDER_ENV).unwrap_or_default())?;

        let api_key = match provider {
            ProviderKind::Anthropic => Some(
                get(ANTHROPIC_API_KEY_ENV)
                    .or_else(|| get(LLM_API_KEY_ENV))
                    .ok_or(ConfigurationError::MissingApiKey {
                        provider: "Anthropic",
                        hint: "ANTHROPIC_API_KEY or LLM_API_KEY",
                    })?,
            ),
            ProviderKind::OpenAICompatible | ProviderKind::Ollama => get(LLM_API_KEY_ENV),
        };

        let base_url = get(LLM_BASE_URL_ENV)
            .map(|raw| {
                reqwest::Url::parse(raw.trim())
                    .ok()
                    .filter(reqwest::Url::has_host)
                    .ok_or_else(|| ConfigurationError::InvalidBaseUrl(raw.clone()))
            })
            .transpose()?;

        let model = get(LLM_MODEL_ENV).unwrap_or_else(|| provider.default_model().to_string());

        Ok(Self {
            provider,
            model,
            api_key,
            base_url,
        })
    }

    pub fn build_provider(&self) -> Arc<dyn LLMProvider> {
        match self.provider {
            ProviderKind::Anthropic => {
                let key = self.api_key.clone().unwrap_or_default();
                match &self.base_url {
                    Some(url) => Arc::new(AnthropicProvider::with_base_url(url.to_string(), key)),
                    None => Arc::new(AnthropicProvider::new(key)),
                }
            }
            ProviderKind::OpenAICompatible => {
                let url = self
                    .base_url
                    .as_ref()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| OpenAICompatibleProvider::DEFAULT_BASE_URL.to_string());
                Arc::new(OpenAICompatibleProvider::new(url, self.api_key.clone()))
            }
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(ollama_client(self.base_url.as_ref()))),
        }
    }
}

/// Ollama appends `api/...` to the base URL verbatim, so any path prefix
/// must end in `/`.
fn ollama_client(base_url: Option<&reqwest::Url>) -> Ollama {
    match base_url {
        Some(url) => {
            let mut url = url.clone();
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ollama::from_url(url)
        }
        None => Ollama::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_anthropic() {
        let config = BackendConfig::from_lookup(lookup(&[(ANTHROPIC_API_KEY_ENV, "sk-test")])).unwrap();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.model, "claude-3-sonnet-20240229");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_generic_key_is_accepted() {
        let config = BackendConfig::from_lookup(lookup(&[
            (LLM_PROVIDER_ENV, "Anthropic"),
            (LLM_API_KEY_ENV, "k"),
            (LLM_MODEL_ENV, "claude-3-haiku"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.model, "claude-3-haiku");
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let err = BackendConfig::from_lookup(lookup(&[(ANTHROPIC_API_KEY_ENV, "  ")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Anthropic API key is not configured. Set ANTHROPIC_API_KEY or LLM_API_KEY."
        );
    }

    #[test]
    fn test_unsupported_provider() {
        let err = BackendConfig::from_lookup(lookup(&[(LLM_PROVIDER_ENV, "palm")])).unwrap_err();
        assert_eq!(err, ConfigurationError::UnsupportedProvider("palm".into()));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = BackendConfig::from_lookup(lookup(&[
            (LLM_PROVIDER_ENV, "ollama"),
            (LLM_BASE_URL_ENV, "http://gpu-box:11500"),
        ]))
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.base_url.as_ref().and_then(|u| u.port()), Some(11500));
    }

    #[test]
    fn test_ollama_base_url_keeps_path() {
        let url = reqwest::Url::parse("http://proxy.local/ollama").unwrap();
        assert_eq!(ollama_client(Some(&url)).url_str(), "http://proxy.local/ollama/");

        let url = reqwest::Url::parse("http://gpu-box:11500").unwrap();
        assert_eq!(ollama_client(Some(&url)).url_str(), "http://gpu-box:11500/");

        assert_eq!(ollama_client(None).url_str(), "http://127.0.0.1:11434/");
    }

    #[test]
    fn test_base_url_needs_a_host() {
        let err = BackendConfig::from_lookup(lookup(&[
            (LLM_PROVIDER_ENV, "ollama"),
            (LLM_BASE_URL_ENV, "localhost:11434"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidBaseUrl("localhost:11434".into()));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = BackendConfig::from_lookup(lookup(&[
            (LLM_PROVIDER_ENV, "openai"),
            (LLM_BASE_URL_ENV, "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBaseUrl(_)));
    }
}
