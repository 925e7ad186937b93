//! Completion gateway backed by siumai
//!
//! The research pipeline only sees the [`CompletionGateway`] trait. The
//! [`SiumaiGateway`] implementation keeps one siumai client per model role so
//! that each role can point at a different provider and model.

use crate::types::{ChatRole, ChatTurn, ModelRole, ProviderError, ProviderResult};
use async_trait::async_trait;
use siumai::prelude::*;
use sleuth_core::{LlmConfig, ModelsConfig};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Chat-style completion capability consumed by every generative stage
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Run one completion with the model configured for `role`
    async fn complete(&self, role: ModelRole, messages: Vec<ChatTurn>) -> ProviderResult<String>;

    /// Single user-message convenience wrapper
    async fn ask(&self, role: ModelRole, prompt: String) -> ProviderResult<String> {
        self.complete(role, vec![ChatTurn::user(prompt)]).await
    }
}

struct RoleClient {
    client: Box<dyn LlmClient>,
    config: LlmConfig,
}

/// Gateway holding one configured siumai client per model role
pub struct SiumaiGateway {
    clients: HashMap<ModelRole, RoleClient>,
}

impl SiumaiGateway {
    /// Build clients for all three roles
    pub async fn new(models: &ModelsConfig) -> ProviderResult<Self> {
        let mut clients = HashMap::new();

        for role in ModelRole::ALL {
            let config = match role {
                ModelRole::Primary => models.primary.clone(),
                ModelRole::Secondary => models.secondary.clone(),
                ModelRole::Synthesis => models.synthesis.clone(),
            };
            let client = build_client(&config).await?;

            info!(
                role = %role,
                provider = %config.provider,
                model = %config.model,
                "Created LLM client"
            );
            clients.insert(role, RoleClient { client, config });
        }

        Ok(Self { clients })
    }
}

#[async_trait]
impl CompletionGateway for SiumaiGateway {
    async fn complete(&self, role: ModelRole, messages: Vec<ChatTurn>) -> ProviderResult<String> {
        let role_client = self
            .clients
            .get(&role)
            .ok_or_else(|| ProviderError::Config(format!("No model configured for role {}", role)))?;

        let start_time = Instant::now();
        debug!(
            role = %role,
            model = %role_client.config.model,
            messages = messages.len(),
            "Requesting completion"
        );

        let messages: Vec<ChatMessage> = messages
            .into_iter()
            .map(|turn| match turn.role {
                ChatRole::System => system!(turn.content),
                ChatRole::User => user!(turn.content),
            })
            .collect();

        let response = role_client
            .client
            .chat(messages)
            .await
            .map_err(|e| ProviderError::Llm(format!("LLM generation failed: {}", e)))?;

        match response.content_text() {
            Some(content) => {
                info!(
                    role = %role,
                    "Generated response in {:?} ({} chars)",
                    start_time.elapsed(),
                    content.len()
                );
                Ok(content.to_string())
            }
            None => Err(ProviderError::Llm(
                "No text content in LLM response".to_string(),
            )),
        }
    }
}

const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Apply the settings every provider shares, then build and box the client.
/// Each provider has its own builder type.
macro_rules! finish_builder {
    ($builder:expr, $config:expr, $label:expr) => {{
        let mut builder = $builder
            .model(&$config.model)
            .temperature($config.temperature);
        if let Some(max_tokens) = $config.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        let client = builder.build().await.map_err(|e| {
            ProviderError::Llm(format!("Failed to build {} client: {}", $label, e))
        })?;
        Box::new(client) as Box<dyn LlmClient>
    }};
}

/// Build the siumai client for one role's provider
async fn build_client(config: &LlmConfig) -> ProviderResult<Box<dyn LlmClient>> {
    let client = match config.provider.as_str() {
        "openai" => {
            let api_key = resolve_api_key(config, "OPENAI_API_KEY")?;
            let mut builder = LlmBuilder::new().openai().api_key(&api_key);
            if let Some(base_url) = &config.base_url {
                builder = builder.base_url(base_url);
            }
            finish_builder!(builder, config, "OpenAI")
        }
        "anthropic" => {
            let api_key = resolve_api_key(config, "ANTHROPIC_API_KEY")?;
            finish_builder!(LlmBuilder::new().anthropic().api_key(&api_key), config, "Anthropic")
        }
        "groq" => {
            let api_key = resolve_api_key(config, "GROQ_API_KEY")?;
            finish_builder!(LlmBuilder::new().groq().api_key(&api_key), config, "Groq")
        }
        "ollama" => {
            let base_url = config.base_url.as_deref().unwrap_or(OLLAMA_DEFAULT_URL);
            finish_builder!(LlmBuilder::new().ollama().base_url(base_url), config, "Ollama")
        }
        provider => {
            return Err(ProviderError::Config(format!(
                "Unsupported LLM provider: {}",
                provider
            )))
        }
    };

    Ok(client)
}

fn resolve_api_key(config: &LlmConfig, env_var: &str) -> ProviderResult<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var(env_var).ok())
        .ok_or_else(|| {
            ProviderError::Config(format!(
                "{} API key not found (set it in config or {})",
                config.provider, env_var
            ))
        })
}
