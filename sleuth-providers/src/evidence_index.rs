//! Local hybrid evidence index
//!
//! The index service owns embedding, BM25 scoring, and reranking; this client
//! only enumerates collections and issues hybrid queries against them.

use crate::http::{create_http_client, handle_response_error, HttpClientConfig};
use crate::types::{HybridQuery, Passage, ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_core::EvidenceIndexConfig;
use tracing::{debug, info};

/// Collection-scoped hybrid retrieval capability
#[async_trait]
pub trait EvidenceIndex: Send + Sync {
    /// Names of all searchable collections
    async fn list_collections(&self) -> ProviderResult<Vec<String>>;

    /// Hybrid lexical + semantic search inside one collection
    async fn hybrid_retrieve(
        &self,
        collection: &str,
        request: &HybridQuery,
    ) -> ProviderResult<Vec<Passage>>;
}

/// HTTP client for a hybrid retrieval service
pub struct HttpEvidenceIndex {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CollectionsResponse {
    Wrapped { collections: Vec<CollectionEntry> },
    Bare(Vec<CollectionEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CollectionEntry {
    Named { name: String },
    Plain(String),
}

impl CollectionsResponse {
    fn into_names(self) -> Vec<String> {
        let entries = match self {
            CollectionsResponse::Wrapped { collections } => collections,
            CollectionsResponse::Bare(entries) => entries,
        };
        entries
            .into_iter()
            .map(|entry| match entry {
                CollectionEntry::Named { name } => name,
                CollectionEntry::Plain(name) => name,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct HybridRequest<'a> {
    query: &'a str,
    k: usize,
    k_reranker: usize,
    r: f32,
    hybrid_bm25_weight: f32,
}

/// Result lists may come flat or nested one level per query
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResultList<T> {
    Nested(Vec<Vec<T>>),
    Flat(Vec<T>),
}

impl<T> ResultList<T> {
    fn flatten(self) -> Vec<T> {
        match self {
            ResultList::Nested(lists) => lists.into_iter().flatten().collect(),
            ResultList::Flat(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HybridResponse {
    documents: ResultList<String>,
    #[serde(default)]
    metadatas: Option<ResultList<serde_json::Value>>,
}

impl HybridResponse {
    /// Pair documents with metadata positionally; missing metadata becomes null
    pub(crate) fn into_passages(self) -> Vec<Passage> {
        let documents = self.documents.flatten();
        let mut metadatas = self
            .metadatas
            .map(ResultList::flatten)
            .unwrap_or_default()
            .into_iter();

        documents
            .into_iter()
            .map(|content| Passage {
                content,
                metadata: metadatas.next().unwrap_or(serde_json::Value::Null),
            })
            .collect()
    }
}

impl HttpEvidenceIndex {
    /// Create a new evidence index client
    pub fn new(config: &EvidenceIndexConfig) -> ProviderResult<Self> {
        let mut http_config = HttpClientConfig::default().with_timeout(config.timeout_seconds);
        if let Some(api_key) = &config.api_key {
            http_config =
                http_config.with_header("Authorization".to_string(), format!("Bearer {}", api_key));
        }
        let client = create_http_client(&http_config)?;

        info!("Created evidence index client for {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EvidenceIndex for HttpEvidenceIndex {
    async fn list_collections(&self) -> ProviderResult<Vec<String>> {
        let url = format!("{}/collections", self.base_url);
        debug!("Listing collections from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Index(format!("Failed to list collections: {}", e)))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, ProviderError::Index).await);
        }

        let body: CollectionsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Index(format!("Invalid collections response: {}", e)))?;

        Ok(body.into_names())
    }

    async fn hybrid_retrieve(
        &self,
        collection: &str,
        request: &HybridQuery,
    ) -> ProviderResult<Vec<Passage>> {
        let url = format!(
            "{}/collections/{}/query/hybrid",
            self.base_url,
            urlencoding::encode(collection)
        );
        let body = HybridRequest {
            query: &request.query,
            k: request.top_k,
            k_reranker: request.rerank_depth,
            r: request.similarity_floor,
            hybrid_bm25_weight: request.lexical_weight,
        };

        debug!(collection = %collection, query = %request.query, "Running hybrid retrieval");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Index(format!(
                    "Hybrid retrieval on '{}' failed: {}",
                    collection, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, ProviderError::Index).await);
        }

        let body: HybridResponse = response.json().await.map_err(|e| {
            ProviderError::Index(format!("Invalid hybrid retrieval response: {}", e))
        })?;

        Ok(body.into_passages())
    }
}
