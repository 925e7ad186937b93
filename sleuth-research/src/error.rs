//! Stage failures of the research pipeline
//!
//! Every stage computes a `Result<_, ResearchError>` and then applies its
//! documented fallback through [`Degrade`], so a failure is logged at the point
//! where it happens and never reaches the engine.

use crate::types::EvidenceSource;
use sleuth_providers::ProviderError;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("Query expansion failed: {message}")]
    Expansion {
        message: String,
        #[source]
        source: Option<ProviderError>,
    },

    #[error("{backend} retrieval failed for {target}: {source}")]
    RetrievalItem {
        backend: EvidenceSource,
        target: String,
        #[source]
        source: ProviderError,
    },

    #[error("All {attempted} {backend} retrieval calls failed")]
    CollectorTotal {
        backend: EvidenceSource,
        attempted: usize,
    },

    #[error("Analyst step failed: {0}")]
    Analysis(#[source] ProviderError),

    #[error("Reviewer step failed: {0}")]
    Review(#[source] ProviderError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),
}

impl ResearchError {
    pub(crate) fn expansion<S: Into<String>>(message: S) -> Self {
        Self::Expansion {
            message: message.into(),
            source: None,
        }
    }

    /// Short label used as the `stage` field in logs
    pub fn stage(&self) -> &'static str {
        match self {
            ResearchError::Expansion { .. } => "expand",
            ResearchError::RetrievalItem { .. } | ResearchError::CollectorTotal { .. } => {
                "collect"
            }
            ResearchError::Analysis(_) | ResearchError::Review(_) => "critique",
            ResearchError::Synthesis(_) => "synthesize",
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ResearchError::RetrievalItem { .. } | ResearchError::CollectorTotal { .. } => {
                warn!(stage = self.stage(), error = %self, "Retrieval degraded");
            }
            _ => {
                error!(stage = self.stage(), error = %self, "Stage degraded to fallback");
            }
        }
    }
}

/// Replace a stage error with its fallback value, logging the error
pub trait Degrade<T> {
    fn or_degrade<F: FnOnce() -> T>(self, fallback: F) -> T;
}

impl<T> Degrade<T> for Result<T, ResearchError> {
    fn or_degrade<F: FnOnce() -> T>(self, fallback: F) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                err.log();
                fallback()
            }
        }
    }
}
