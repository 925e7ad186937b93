//! Types shared by the provider clients

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named generative model slot, mapped to a concrete model by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Primary,
    Secondary,
    Synthesis,
}

impl ModelRole {
    pub const ALL: [ModelRole; 3] = [ModelRole::Primary, ModelRole::Secondary, ModelRole::Synthesis];
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRole::Primary => write!(f, "primary"),
            ModelRole::Secondary => write!(f, "secondary"),
            ModelRole::Synthesis => write!(f, "synthesis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// One message of a chat-style completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A ranked hit returned by the web search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHit {
    pub title: Option<String>,
    pub url: String,
    pub snippet: Option<String>,
}

/// A passage returned by the local evidence index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    /// Backend-supplied metadata, passed through untouched
    pub metadata: serde_json::Value,
}

/// Parameters of one hybrid (lexical + semantic) retrieval call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridQuery {
    pub query: String,
    pub top_k: usize,
    /// Candidates handed to the reranker
    pub rerank_depth: usize,
    pub similarity_floor: f32,
    /// Weight of the lexical leg; the semantic leg gets the remainder
    pub lexical_weight: f32,
}

/// Error types for the provider clients
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Web search error: {0}")]
    Search(String),

    #[error("Evidence index error: {0}")]
    Index(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
