//! Final answer synthesis and citation assembly

use crate::error::{Degrade, ResearchError};
use crate::prompts::{self, SYNTHESIS_FAILED};
use crate::types::{CritiqueResult, EvidenceBundle, ResearchAnswer};
use sleuth_providers::{CompletionGateway, ModelRole};
use std::sync::Arc;
use tracing::info;

pub struct Synthesizer {
    gateway: Arc<dyn CompletionGateway>,
    preview_chars: usize,
}

impl Synthesizer {
    pub fn new(gateway: Arc<dyn CompletionGateway>, preview_chars: usize) -> Self {
        Self {
            gateway,
            preview_chars,
        }
    }

    /// Produce the answer text and attach the flattened source list. Sources
    /// and counts are assembled even when generation fails.
    pub async fn synthesize(
        &self,
        question: &str,
        critique: &CritiqueResult,
        bundles: &[EvidenceBundle],
    ) -> ResearchAnswer {
        let answer = self
            .try_generate(question, critique, bundles)
            .await
            .or_degrade(|| SYNTHESIS_FAILED.to_string());

        let result = ResearchAnswer::assemble(answer, bundles);
        info!(
            web_results = result.counts.web_results,
            local_results = result.counts.local_results,
            total_sources = result.counts.total_sources,
            "Answer synthesized"
        );
        result
    }

    pub async fn try_generate(
        &self,
        question: &str,
        critique: &CritiqueResult,
        bundles: &[EvidenceBundle],
    ) -> Result<String, ResearchError> {
        let prompt = prompts::synthesis_prompt(question, critique, bundles, self.preview_chars);
        self.gateway
            .ask(ModelRole::Synthesis, prompt)
            .await
            .map_err(ResearchError::Synthesis)
    }
}
