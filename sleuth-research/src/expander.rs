//! Query expansion: one question in, a short list of sub-queries out

use crate::error::{Degrade, ResearchError};
use crate::prompts;
use sleuth_providers::{CompletionGateway, ModelRole};
use std::sync::Arc;
use tracing::{debug, info};

pub struct QueryExpander {
    gateway: Arc<dyn CompletionGateway>,
    max_queries: usize,
}

impl QueryExpander {
    pub fn new(gateway: Arc<dyn CompletionGateway>, max_queries: usize) -> Self {
        Self {
            gateway,
            max_queries,
        }
    }

    /// Expand `question` into sub-queries. Never empty: any failure yields
    /// `[question]`.
    pub async fn expand(&self, question: &str) -> Vec<String> {
        let queries = self
            .try_expand(question)
            .await
            .or_degrade(|| vec![question.to_string()]);

        info!(count = queries.len(), "Research queries ready");
        queries
    }

    pub async fn try_expand(&self, question: &str) -> Result<Vec<String>, ResearchError> {
        let response = self
            .gateway
            .ask(
                ModelRole::Primary,
                prompts::query_expansion_prompt(question),
            )
            .await
            .map_err(|e| ResearchError::Expansion {
                message: "completion call failed".to_string(),
                source: Some(e),
            })?;

        debug!(response_len = response.len(), "Received expansion response");
        parse_queries(&response, self.max_queries)
    }
}

/// Pull the `queries` list out of a model response that may wrap the JSON
/// object in prose.
pub fn parse_queries(raw: &str, max_queries: usize) -> Result<Vec<String>, ResearchError> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ResearchError::expansion("no JSON object in response")),
    };

    let value: serde_json::Value = serde_json::from_str(&raw[start..=end])
        .map_err(|e| ResearchError::expansion(format!("invalid JSON: {}", e)))?;

    let entries = value
        .get("queries")
        .and_then(|q| q.as_array())
        .ok_or_else(|| ResearchError::expansion("missing `queries` list"))?;

    let mut queries: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let text = entry
            .as_str()
            .ok_or_else(|| ResearchError::expansion("`queries` must contain only strings"))?
            .trim();
        if !text.is_empty() && !queries.iter().any(|q| q == text) {
            queries.push(text.to_string());
        }
    }
    queries.truncate(max_queries);

    if queries.is_empty() {
        return Err(ResearchError::expansion("`queries` list is empty"));
    }
    Ok(queries)
}
