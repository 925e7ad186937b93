//! Types for the deep research pipeline

use serde::{Deserialize, Serialize};
use sleuth_core::SleuthConfig;
use std::fmt;

/// Pipeline configuration, derived from [`SleuthConfig`] or built directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Upper bound on expanded sub-queries
    pub max_queries: usize,
    /// Characters of each bundle shown to the analyst
    pub analysis_preview_chars: usize,
    /// Characters of each bundle shown to the synthesis model
    pub synthesis_preview_chars: usize,
    /// Web hits requested per query
    pub web_result_count: usize,
    /// Search model hint forwarded to the web backend
    pub web_model: Option<String>,
    /// Passages requested per (query, collection)
    pub local_top_k: usize,
    pub rerank_depth: usize,
    pub similarity_floor: f32,
    pub lexical_weight: f32,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self::from(&SleuthConfig::default())
    }
}

impl From<&SleuthConfig> for ResearchConfig {
    fn from(config: &SleuthConfig) -> Self {
        Self {
            max_queries: config.research.max_queries,
            analysis_preview_chars: config.research.analysis_preview_chars,
            synthesis_preview_chars: config.research.synthesis_preview_chars,
            web_result_count: config.web_search.result_count,
            web_model: Some(config.web_search.model.clone()),
            local_top_k: config.evidence_index.top_k,
            rerank_depth: config.evidence_index.rerank_depth,
            similarity_floor: config.evidence_index.similarity_floor,
            lexical_weight: config.evidence_index.lexical_weight,
        }
    }
}

/// Backend an evidence bundle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceSource {
    Web,
    Local,
}

impl EvidenceSource {
    /// Fixed per-backend reliability weight. Carried on every bundle but not
    /// used for ranking yet.
    pub fn reliability(self) -> f64 {
        match self {
            EvidenceSource::Web => 0.8,
            EvidenceSource::Local => 0.9,
        }
    }
}

impl fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceSource::Web => write!(f, "web"),
            EvidenceSource::Local => write!(f, "local"),
        }
    }
}

/// Where a piece of evidence came from, as cited in the final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceDescriptor {
    Web {
        url: String,
        title: String,
        snippet: String,
    },
    Local {
        collection: String,
        metadata: serde_json::Value,
    },
}

impl SourceDescriptor {
    pub fn source(&self) -> EvidenceSource {
        match self {
            SourceDescriptor::Web { .. } => EvidenceSource::Web,
            SourceDescriptor::Local { .. } => EvidenceSource::Local,
        }
    }
}

/// One retrieved unit of evidence
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceItem {
    pub content: String,
    pub descriptor: SourceDescriptor,
}

/// Bookkeeping attached to a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub queries: Vec<String>,
    pub result_count: usize,
    /// Collections searched; only present for local bundles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,
}

/// Aggregated output of one evidence collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    pub source: EvidenceSource,
    /// Item contents joined by a blank line
    pub content: String,
    pub sources: Vec<SourceDescriptor>,
    pub reliability: f64,
    pub metadata: BundleMetadata,
}

impl EvidenceBundle {
    /// Fold collected items into a bundle, preserving their order
    pub fn assemble(
        source: EvidenceSource,
        queries: &[String],
        collections: Option<Vec<String>>,
        items: Vec<EvidenceItem>,
    ) -> Self {
        let result_count = items.len();
        let mut contents = Vec::with_capacity(result_count);
        let mut sources = Vec::with_capacity(result_count);
        for item in items {
            contents.push(item.content);
            sources.push(item.descriptor);
        }

        Self {
            source,
            content: contents.join("\n\n"),
            sources,
            reliability: source.reliability(),
            metadata: BundleMetadata {
                queries: queries.to_vec(),
                result_count,
                collections,
            },
        }
    }
}

/// Output of the analyst/reviewer exchange
#[derive(Debug, Clone, PartialEq)]
pub struct CritiqueResult {
    pub analysis: String,
    pub review: String,
}

impl fmt::Display for CritiqueResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Primary Analysis:\n{}\n\nCritical Review:\n{}",
            self.analysis, self.review
        )
    }
}

/// Source tallies reported with the answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchCounts {
    pub web_results: usize,
    pub local_results: usize,
    pub total_sources: usize,
}

/// Final result of one research run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchAnswer {
    pub answer: String,
    pub sources: Vec<SourceDescriptor>,
    pub counts: ResearchCounts,
}

impl ResearchAnswer {
    /// Flatten bundle sources in bundle order and tally them by kind
    pub fn assemble(answer: String, bundles: &[EvidenceBundle]) -> Self {
        let sources: Vec<SourceDescriptor> = bundles
            .iter()
            .flat_map(|bundle| bundle.sources.iter().cloned())
            .collect();

        let mut counts = ResearchCounts {
            total_sources: sources.len(),
            ..ResearchCounts::default()
        };
        for descriptor in &sources {
            match descriptor.source() {
                EvidenceSource::Web => counts.web_results += 1,
                EvidenceSource::Local => counts.local_results += 1,
            }
        }

        Self {
            answer,
            sources,
            counts,
        }
    }
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStage {
    Expanding,
    Collecting,
    Critiquing,
    Synthesizing,
    Done,
}

impl fmt::Display for ResearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResearchStage::Expanding => write!(f, "Expanding question into research queries"),
            ResearchStage::Collecting => write!(f, "Collecting web and local evidence"),
            ResearchStage::Critiquing => write!(f, "Analysing and reviewing evidence"),
            ResearchStage::Synthesizing => write!(f, "Synthesizing final answer"),
            ResearchStage::Done => write!(f, "Research completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn web(url: &str) -> EvidenceItem {
        EvidenceItem {
            content: format!("snippet of {}", url),
            descriptor: SourceDescriptor::Web {
                url: url.to_string(),
                title: "t".to_string(),
                snippet: format!("snippet of {}", url),
            },
        }
    }

    #[test]
    fn bundle_joins_content_with_blank_lines() {
        let queries = vec!["q".to_string()];
        let bundle = EvidenceBundle::assemble(
            EvidenceSource::Web,
            &queries,
            None,
            vec![web("a"), web("b")],
        );

        assert_eq!(bundle.content, "snippet of a\n\nsnippet of b");
        assert_eq!(bundle.metadata.result_count, 2);
        assert_eq!(bundle.reliability, 0.8);
        assert!(bundle.metadata.collections.is_none());
    }

    #[test]
    fn answer_serializes_with_kind_tags_and_camel_case_counts() {
        let local = EvidenceBundle::assemble(
            EvidenceSource::Local,
            &[],
            Some(vec!["papers".to_string()]),
            vec![EvidenceItem {
                content: "passage".to_string(),
                descriptor: SourceDescriptor::Local {
                    collection: "papers".to_string(),
                    metadata: json!({"page": 2}),
                },
            }],
        );
        let answer = ResearchAnswer::assemble("done".to_string(), &[local]);

        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["sources"][0]["kind"], "local");
        assert_eq!(value["sources"][0]["collection"], "papers");
        assert_eq!(value["counts"]["localResults"], 1);
        assert_eq!(value["counts"]["webResults"], 0);
        assert_eq!(value["counts"]["totalSources"], 1);
    }

    #[test]
    fn critique_text_uses_fixed_labels() {
        let critique = CritiqueResult {
            analysis: "A".to_string(),
            review: "R".to_string(),
        };
        assert_eq!(
            critique.to_string(),
            "Primary Analysis:\nA\n\nCritical Review:\nR"
        );
    }
}
