//! Core configuration types

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration for a research deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SleuthConfig {
    pub models: ModelsConfig,
    pub web_search: WebSearchConfig,
    pub evidence_index: EvidenceIndexConfig,
    pub research: ResearchSettings,
    pub logging: LoggingConfig,
}

/// One generative model slot per pipeline role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Query expansion and analyst step
    pub primary: LlmConfig,
    /// Reviewer step
    pub secondary: LlmConfig,
    /// Final answer
    pub synthesis: LlmConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type (openai, anthropic, ollama, groq)
    pub provider: String,
    /// Model name
    pub model: String,
    /// API key (optional, can be set via environment)
    pub api_key: Option<String>,
    /// Base URL for custom providers
    pub base_url: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

/// Hosted web search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Search model hint passed to the provider
    pub model: String,
    /// How much search context the provider should use (low, medium, high)
    pub search_context_usage: String,
    /// Hits requested per query
    pub result_count: usize,
    pub timeout_seconds: u64,
}

/// Local hybrid evidence index settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceIndexConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Passages requested per (query, collection)
    pub top_k: usize,
    /// Candidates handed to the reranker
    pub rerank_depth: usize,
    /// Minimum relevance score a passage must reach
    pub similarity_floor: f32,
    /// Weight of the lexical (BM25) leg in the hybrid blend
    pub lexical_weight: f32,
    pub timeout_seconds: u64,
}

/// Tunables of the research pipeline itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    /// Upper bound on expanded sub-queries
    pub max_queries: usize,
    /// Characters of each bundle shown to the analyst
    pub analysis_preview_chars: usize,
    /// Characters of each bundle shown to the synthesis model
    pub synthesis_preview_chars: usize,
}
