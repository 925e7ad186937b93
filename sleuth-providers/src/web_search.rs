//! Hosted web search backend
//!
//! [`PerplexitySearch`] talks to the Perplexity chat completions endpoint with
//! web search enabled and turns the returned search results (or, on older API
//! versions, the bare citation list) into ranked [`WebHit`]s.

use crate::http::{create_http_client, handle_response_error, HttpClientConfig};
use crate::types::{ProviderError, ProviderResult, WebHit};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_core::WebSearchConfig;
use tracing::{debug, info};

/// Ranked web search capability
#[async_trait]
pub trait WebSearchBackend: Send + Sync {
    /// Return at most `count` hits for `query`
    async fn web_search(
        &self,
        query: &str,
        count: usize,
        model_hint: Option<&str>,
    ) -> ProviderResult<Vec<WebHit>>;
}

const SEARCH_SYSTEM_PROMPT: &str =
    "You are a search assistant. Answer concisely and cite the sources you used.";

/// Perplexity search API client
pub struct PerplexitySearch {
    client: reqwest::Client,
    config: WebSearchConfig,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    web_search_options: WebSearchOptions<'a>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WebSearchOptions<'a> {
    search_context_size: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    choices: Vec<SearchChoice>,
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    search_results: Vec<SearchResultEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchChoice {
    message: SearchMessage,
}

#[derive(Debug, Deserialize)]
struct SearchMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResultEntry {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl PerplexitySearch {
    /// Create a new client; fails when no API key is configured
    pub fn new(config: WebSearchConfig) -> ProviderResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ProviderError::Config(
                "Web search API key not found (set web_search.api_key or PERPLEXITY_API_KEY)"
                    .to_string(),
            )
        })?;

        let http_config = HttpClientConfig::default()
            .with_timeout(config.timeout_seconds)
            .with_header("Authorization".to_string(), format!("Bearer {}", api_key));
        let client = create_http_client(&http_config)?;

        info!("Created web search client for {}", config.base_url);

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl WebSearchBackend for PerplexitySearch {
    async fn web_search(
        &self,
        query: &str,
        count: usize,
        model_hint: Option<&str>,
    ) -> ProviderResult<Vec<WebHit>> {
        let model = model_hint.unwrap_or(&self.config.model);
        let request = SearchRequest {
            model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: SEARCH_SYSTEM_PROMPT,
                },
                RequestMessage {
                    role: "user",
                    content: query,
                },
            ],
            web_search_options: WebSearchOptions {
                search_context_size: &self.config.search_context_usage,
            },
        };

        debug!(query = %query, model = %model, "Sending web search request");

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Search(format!("Web search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, ProviderError::Search).await);
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Search(format!("Invalid web search response: {}", e)))?;

        let hits = hits_from_response(body, count);
        debug!(query = %query, hits = hits.len(), "Web search completed");
        Ok(hits)
    }
}

/// Prefer structured search results; fall back to the citation URL list,
/// which carries no titles and shares the answer text as its snippet.
pub(crate) fn hits_from_response(body: SearchResponse, count: usize) -> Vec<WebHit> {
    if !body.search_results.is_empty() {
        return body
            .search_results
            .into_iter()
            .take(count)
            .map(|entry| WebHit {
                title: entry.title.filter(|t| !t.is_empty()),
                url: entry.url,
                snippet: entry.snippet,
            })
            .collect();
    }

    let answer = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty());

    body.citations
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, url)| WebHit {
            title: Some(format!("Source {}", i + 1)),
            url,
            snippet: answer.clone(),
        })
        .collect()
}
