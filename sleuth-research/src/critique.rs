//! Two-agent critique loop: an analyst pass followed by a reviewer pass

use crate::error::{Degrade, ResearchError};
use crate::prompts::{self, ANALYSIS_FAILED, REVIEW_FAILED};
use crate::types::{CritiqueResult, EvidenceBundle};
use sleuth_providers::{CompletionGateway, ModelRole};
use std::sync::Arc;
use tracing::debug;

pub struct CritiqueLoop {
    gateway: Arc<dyn CompletionGateway>,
    preview_chars: usize,
}

impl CritiqueLoop {
    pub fn new(gateway: Arc<dyn CompletionGateway>, preview_chars: usize) -> Self {
        Self {
            gateway,
            preview_chars,
        }
    }

    /// Run analyst then reviewer. The reviewer sees the analyst's text, or
    /// the analyst placeholder when that step failed.
    pub async fn run(&self, question: &str, bundles: &[EvidenceBundle]) -> CritiqueResult {
        let context = prompts::analysis_context(question, bundles, self.preview_chars);

        let analysis = self
            .try_analyze(&context)
            .await
            .or_degrade(|| ANALYSIS_FAILED.to_string());
        debug!(analysis_len = analysis.len(), "Analyst step finished");

        let review = self
            .try_review(question, &analysis)
            .await
            .or_degrade(|| REVIEW_FAILED.to_string());
        debug!(review_len = review.len(), "Reviewer step finished");

        CritiqueResult { analysis, review }
    }

    pub async fn try_analyze(&self, context: &str) -> Result<String, ResearchError> {
        self.gateway
            .ask(ModelRole::Primary, prompts::analyst_prompt(context))
            .await
            .map_err(ResearchError::Analysis)
    }

    pub async fn try_review(&self, question: &str, analysis: &str) -> Result<String, ResearchError> {
        self.gateway
            .ask(
                ModelRole::Secondary,
                prompts::reviewer_prompt(question, analysis),
            )
            .await
            .map_err(ResearchError::Review)
    }
}
