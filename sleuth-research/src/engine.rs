//! Deep research orchestrator

use crate::collectors::{LocalCollector, WebCollector};
use crate::critique::CritiqueLoop;
use crate::expander::QueryExpander;
use crate::synthesizer::Synthesizer;
use crate::types::{ResearchAnswer, ResearchConfig, ResearchStage};
use sleuth_core::performance::measure_async;
use sleuth_providers::{CompletionGateway, EvidenceIndex, WebSearchBackend};
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

/// External capabilities the engine drives
#[derive(Clone)]
pub struct ResearchProviders {
    pub gateway: Arc<dyn CompletionGateway>,
    pub web_search: Arc<dyn WebSearchBackend>,
    pub evidence_index: Arc<dyn EvidenceIndex>,
}

/// Receives stage transitions of a research run
pub trait ResearchObserver: Send + Sync {
    fn on_stage(&self, stage: ResearchStage);
}

struct NoopObserver;

impl ResearchObserver for NoopObserver {
    fn on_stage(&self, _stage: ResearchStage) {}
}

/// Runs expand → collect (web ∥ local) → critique → synthesize
pub struct ResearchEngine {
    expander: QueryExpander,
    web: WebCollector,
    local: LocalCollector,
    critique: CritiqueLoop,
    synthesizer: Synthesizer,
    observer: Arc<dyn ResearchObserver>,
}

impl ResearchEngine {
    pub fn new(config: ResearchConfig, providers: ResearchProviders) -> Self {
        Self {
            expander: QueryExpander::new(providers.gateway.clone(), config.max_queries),
            web: WebCollector::new(providers.web_search, &config),
            local: LocalCollector::new(providers.evidence_index, &config),
            critique: CritiqueLoop::new(providers.gateway.clone(), config.analysis_preview_chars),
            synthesizer: Synthesizer::new(providers.gateway, config.synthesis_preview_chars),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Answer `question`. Stage failures degrade inside each stage, so this
    /// always produces an answer.
    pub async fn conduct_research(&self, question: &str) -> ResearchAnswer {
        let run_id = Uuid::new_v4();
        let span = info_span!("research", run_id = %run_id);

        async {
            sleuth_core::log_operation_start!("deep_research", question = %question);

            self.enter(ResearchStage::Expanding);
            let queries = measure_async("expand", self.expander.expand(question)).await;

            self.enter(ResearchStage::Collecting);
            let (web, local) = measure_async("collect", async {
                tokio::join!(self.web.collect(&queries), self.local.collect(&queries))
            })
            .await;
            let bundles = [web, local];

            self.enter(ResearchStage::Critiquing);
            let critique = measure_async("critique", self.critique.run(question, &bundles)).await;

            self.enter(ResearchStage::Synthesizing);
            let answer = measure_async(
                "synthesize",
                self.synthesizer.synthesize(question, &critique, &bundles),
            )
            .await;

            self.enter(ResearchStage::Done);
            sleuth_core::log_operation_success!(
                "deep_research",
                total_sources = answer.counts.total_sources
            );
            answer
        }
        .instrument(span)
        .await
    }

    fn enter(&self, stage: ResearchStage) {
        debug!(stage = ?stage, "{}", stage);
        self.observer.on_stage(stage);
    }
}
