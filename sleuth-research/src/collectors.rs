//! Evidence collectors
//!
//! Each collector fans the query list out over one backend and folds whatever
//! comes back into a single [`EvidenceBundle`]. Failed calls are logged and
//! skipped; a collector always returns a bundle, possibly empty.

use crate::error::ResearchError;
use crate::prompts::UNTITLED_WEB_SOURCE;
use crate::types::{EvidenceBundle, EvidenceItem, EvidenceSource, ResearchConfig, SourceDescriptor};
use sleuth_providers::{EvidenceIndex, HybridQuery, Passage, WebHit, WebSearchBackend};
use std::sync::Arc;
use tracing::{debug, info};

/// Collects ranked web hits for every query
pub struct WebCollector {
    backend: Arc<dyn WebSearchBackend>,
    result_count: usize,
    model_hint: Option<String>,
}

impl WebCollector {
    pub fn new(backend: Arc<dyn WebSearchBackend>, config: &ResearchConfig) -> Self {
        Self {
            backend,
            result_count: config.web_result_count,
            model_hint: config.web_model.clone(),
        }
    }

    pub async fn collect(&self, queries: &[String]) -> EvidenceBundle {
        let mut items = Vec::new();
        let mut failures = 0;

        for query in queries {
            match self.search(query).await {
                Ok(hits) => {
                    debug!(query = %query, hits = hits.len(), "Web search returned");
                    items.extend(hits.into_iter().map(web_item));
                }
                Err(err) => {
                    failures += 1;
                    err.log();
                }
            }
        }

        if failures > 0 && failures == queries.len() {
            ResearchError::CollectorTotal {
                backend: EvidenceSource::Web,
                attempted: failures,
            }
            .log();
        }

        info!(items = items.len(), failures, "Web evidence collected");
        EvidenceBundle::assemble(EvidenceSource::Web, queries, None, items)
    }

    async fn search(&self, query: &str) -> Result<Vec<WebHit>, ResearchError> {
        self.backend
            .web_search(query, self.result_count, self.model_hint.as_deref())
            .await
            .map_err(|source| ResearchError::RetrievalItem {
                backend: EvidenceSource::Web,
                target: format!("query '{}'", query),
                source,
            })
    }
}

fn web_item(hit: WebHit) -> EvidenceItem {
    let snippet = hit.snippet.unwrap_or_default();
    EvidenceItem {
        content: snippet.clone(),
        descriptor: SourceDescriptor::Web {
            url: hit.url,
            title: hit
                .title
                .unwrap_or_else(|| UNTITLED_WEB_SOURCE.to_string()),
            snippet,
        },
    }
}

/// Collects passages for every (query, collection) pair from the local index
pub struct LocalCollector {
    index: Arc<dyn EvidenceIndex>,
    top_k: usize,
    rerank_depth: usize,
    similarity_floor: f32,
    lexical_weight: f32,
}

impl LocalCollector {
    pub fn new(index: Arc<dyn EvidenceIndex>, config: &ResearchConfig) -> Self {
        Self {
            index,
            top_k: config.local_top_k,
            rerank_depth: config.rerank_depth,
            similarity_floor: config.similarity_floor,
            lexical_weight: config.lexical_weight,
        }
    }

    pub async fn collect(&self, queries: &[String]) -> EvidenceBundle {
        let collections = match self.index.list_collections().await {
            Ok(names) => names,
            Err(source) => {
                ResearchError::RetrievalItem {
                    backend: EvidenceSource::Local,
                    target: "collection listing".to_string(),
                    source,
                }
                .log();
                // the listing was the only call made
                ResearchError::CollectorTotal {
                    backend: EvidenceSource::Local,
                    attempted: 1,
                }
                .log();
                return EvidenceBundle::assemble(
                    EvidenceSource::Local,
                    queries,
                    Some(Vec::new()),
                    Vec::new(),
                );
            }
        };
        debug!(collections = collections.len(), "Evidence collections listed");

        let mut items = Vec::new();
        let mut attempted = 0;
        let mut failures = 0;

        for query in queries {
            for collection in &collections {
                attempted += 1;
                match self.retrieve(query, collection).await {
                    Ok(passages) => {
                        items.extend(
                            passages
                                .into_iter()
                                .map(|passage| local_item(collection, passage)),
                        );
                    }
                    Err(err) => {
                        failures += 1;
                        err.log();
                    }
                }
            }
        }

        if failures > 0 && failures == attempted {
            ResearchError::CollectorTotal {
                backend: EvidenceSource::Local,
                attempted,
            }
            .log();
        }

        info!(
            items = items.len(),
            collections = collections.len(),
            failures,
            "Local evidence collected"
        );
        EvidenceBundle::assemble(EvidenceSource::Local, queries, Some(collections), items)
    }

    async fn retrieve(&self, query: &str, collection: &str) -> Result<Vec<Passage>, ResearchError> {
        let request = HybridQuery {
            query: query.to_string(),
            top_k: self.top_k,
            rerank_depth: self.rerank_depth,
            similarity_floor: self.similarity_floor,
            lexical_weight: self.lexical_weight,
        };

        self.index
            .hybrid_retrieve(collection, &request)
            .await
            .map_err(|source| ResearchError::RetrievalItem {
                backend: EvidenceSource::Local,
                target: format!("{} / '{}'", collection, query),
                source,
            })
    }
}

fn local_item(collection: &str, passage: Passage) -> EvidenceItem {
    EvidenceItem {
        content: passage.content,
        descriptor: SourceDescriptor::Local {
            collection: collection.to_string(),
            metadata: passage.metadata,
        },
    }
}
