//! Sleuth Providers - clients for the external capabilities the research
//! pipeline consumes
//!
//! - [`CompletionGateway`]: chat completions, one model per [`ModelRole`]
//! - [`WebSearchBackend`]: ranked web hits for a query
//! - [`EvidenceIndex`]: collection listing and hybrid retrieval over local data
//!
//! Each capability is a trait so the pipeline can be driven by stubs in tests
//! and by the concrete HTTP / siumai clients in production.

pub mod evidence_index;
pub mod gateway;
pub mod http;
pub mod types;
pub mod web_search;

pub use evidence_index::{EvidenceIndex, HttpEvidenceIndex};
pub use gateway::{CompletionGateway, SiumaiGateway};
pub use http::{create_http_client, HttpClientConfig};
pub use types::*;
pub use web_search::{PerplexitySearch, WebSearchBackend};
