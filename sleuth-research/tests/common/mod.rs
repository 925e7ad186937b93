//! Stub providers shared by the research pipeline tests
//!
//! Each stub records the calls it receives and answers through a closure, so a
//! test can script success and failure per call.

#![allow(dead_code)]

use async_trait::async_trait;
use sleuth_providers::{
    ChatTurn, CompletionGateway, EvidenceIndex, HybridQuery, ModelRole, Passage, ProviderError,
    ProviderResult, WebHit, WebSearchBackend,
};
use sleuth_research::{ResearchConfig, ResearchProviders};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("sleuth_research=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Thread-local subscriber that keeps formatted log lines for assertions
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

type GatewayHandler = dyn Fn(ModelRole, &str) -> ProviderResult<String> + Send + Sync;

/// Completion gateway that records every prompt it is given
pub struct RecordingGateway {
    handler: Box<GatewayHandler>,
    calls: Mutex<Vec<(ModelRole, String)>>,
}

impl RecordingGateway {
    pub fn new(
        handler: impl Fn(ModelRole, &str) -> ProviderResult<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Gateway that answers every stage: `expansion` for the query expansion
    /// prompt and a fixed text per role otherwise.
    pub fn healthy(expansion: &str) -> Arc<Self> {
        let expansion = expansion.to_string();
        Self::new(move |role, prompt| {
            if is_expansion_prompt(prompt) {
                return Ok(expansion.clone());
            }
            Ok(match role {
                ModelRole::Primary => "analyst findings".to_string(),
                ModelRole::Secondary => "reviewer notes".to_string(),
                ModelRole::Synthesis => "final answer".to_string(),
            })
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|role, _| Err(ProviderError::Llm(format!("{} model unavailable", role))))
    }

    pub fn calls(&self) -> Vec<(ModelRole, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts_for(&self, role: ModelRole) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, prompt)| prompt)
            .collect()
    }
}

#[async_trait]
impl CompletionGateway for RecordingGateway {
    async fn complete(&self, role: ModelRole, messages: Vec<ChatTurn>) -> ProviderResult<String> {
        let prompt = messages
            .last()
            .map(|turn| turn.content.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((role, prompt.clone()));
        (self.handler)(role, &prompt)
    }
}

pub fn is_expansion_prompt(prompt: &str) -> bool {
    prompt.contains("User question:")
}

type SearchHandler = dyn Fn(&str) -> ProviderResult<Vec<WebHit>> + Send + Sync;

/// Web search backend scripted per query
pub struct StubWebSearch {
    handler: Box<SearchHandler>,
    calls: Mutex<Vec<(String, usize, Option<String>)>>,
}

impl StubWebSearch {
    pub fn new(
        handler: impl Fn(&str) -> ProviderResult<Vec<WebHit>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// One hit per query, titled after the query
    pub fn one_hit_per_query() -> Arc<Self> {
        Self::new(|query| Ok(vec![hit(query)]))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(ProviderError::Search("HTTP 503".to_string())))
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _, _)| query.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<(String, usize, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearchBackend for StubWebSearch {
    async fn web_search(
        &self,
        query: &str,
        count: usize,
        model_hint: Option<&str>,
    ) -> ProviderResult<Vec<WebHit>> {
        self.calls.lock().unwrap().push((
            query.to_string(),
            count,
            model_hint.map(str::to_string),
        ));
        (self.handler)(query)
    }
}

type ListHandler = dyn Fn() -> ProviderResult<Vec<String>> + Send + Sync;
type RetrieveHandler = dyn Fn(&str, &HybridQuery) -> ProviderResult<Vec<Passage>> + Send + Sync;

/// Evidence index with scripted collections and retrieval
pub struct StubIndex {
    list: Box<ListHandler>,
    retrieve: Box<RetrieveHandler>,
    calls: Mutex<Vec<(String, HybridQuery)>>,
}

impl StubIndex {
    pub fn new(
        list: impl Fn() -> ProviderResult<Vec<String>> + Send + Sync + 'static,
        retrieve: impl Fn(&str, &HybridQuery) -> ProviderResult<Vec<Passage>> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            list: Box::new(list),
            retrieve: Box::new(retrieve),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(|| Ok(Vec::new()), |_, _| Ok(Vec::new()))
    }

    /// Every collection answers with one passage naming the collection and query
    pub fn with_collections(names: &[&str]) -> Arc<Self> {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Self::new(
            move || Ok(names.clone()),
            |collection, request| Ok(vec![passage(collection, &request.query)]),
        )
    }

    pub fn failing() -> Arc<Self> {
        Self::new(
            || Err(ProviderError::Index("connection refused".to_string())),
            |_, _| Err(ProviderError::Index("connection refused".to_string())),
        )
    }

    pub fn calls(&self) -> Vec<(String, HybridQuery)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceIndex for StubIndex {
    async fn list_collections(&self) -> ProviderResult<Vec<String>> {
        (self.list)()
    }

    async fn hybrid_retrieve(
        &self,
        collection: &str,
        request: &HybridQuery,
    ) -> ProviderResult<Vec<Passage>> {
        self.calls
            .lock()
            .unwrap()
            .push((collection.to_string(), request.clone()));
        (self.retrieve)(collection, request)
    }
}

pub fn hit(query: &str) -> WebHit {
    WebHit {
        title: Some(format!("About {}", query)),
        url: format!("https://example.com/{}", query.replace(' ', "-")),
        snippet: Some(format!("Snippet for {}", query)),
    }
}

pub fn passage(collection: &str, query: &str) -> Passage {
    Passage {
        content: format!("{} passage on {}", collection, query),
        metadata: serde_json::json!({ "source": format!("{}.pdf", collection) }),
    }
}

pub fn providers(
    gateway: Arc<RecordingGateway>,
    web_search: Arc<StubWebSearch>,
    evidence_index: Arc<StubIndex>,
) -> ResearchProviders {
    ResearchProviders {
        gateway,
        web_search,
        evidence_index,
    }
}

pub fn config() -> ResearchConfig {
    ResearchConfig::default()
}
