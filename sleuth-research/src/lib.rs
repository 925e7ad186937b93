//! Sleuth Research - the deep research pipeline
//!
//! A question is expanded into sub-queries, evidence is collected from the
//! web and from a local hybrid index at the same time, an analyst and a
//! reviewer critique the evidence, and a final model call writes the cited
//! answer. Every stage degrades to a well-formed value on failure, so
//! [`ResearchEngine::conduct_research`] always returns a [`ResearchAnswer`].

pub mod collectors;
pub mod critique;
pub mod engine;
pub mod error;
pub mod expander;
pub mod prompts;
pub mod synthesizer;
pub mod types;

pub use collectors::{LocalCollector, WebCollector};
pub use critique::CritiqueLoop;
pub use engine::{ResearchEngine, ResearchObserver, ResearchProviders};
pub use error::{Degrade, ResearchError};
pub use expander::QueryExpander;
pub use synthesizer::Synthesizer;
pub use types::*;
