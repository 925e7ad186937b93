//! End-to-end tests of the HTTP provider clients against an in-process server

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sleuth_core::{EvidenceIndexConfig, WebSearchConfig};
use sleuth_providers::{
    EvidenceIndex, HttpEvidenceIndex, HybridQuery, PerplexitySearch, ProviderError,
    WebSearchBackend,
};

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn fake_search(headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer test-key") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let query = body["messages"][1]["content"].as_str().unwrap_or_default();
    if query == "explode" {
        return Err(StatusCode::BAD_GATEWAY);
    }

    Ok(Json(json!({
        "model": body["model"],
        "choices": [{"message": {"content": format!("About {}", query)}}],
        "search_results": [
            {"title": format!("{} / one", query), "url": "https://one.example", "snippet": "first"},
            {"title": format!("{} / two", query), "url": "https://two.example", "snippet": "second"},
            {"title": format!("{} / three", query), "url": "https://three.example"},
            {"title": format!("{} / four", query), "url": "https://four.example"}
        ]
    })))
}

async fn fake_collections() -> Json<Value> {
    Json(json!({"collections": [{"name": "papers"}, {"name": "field notes"}]}))
}

async fn fake_hybrid(
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if name == "broken" {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert_eq!(body["k_reranker"], 5);
    assert_eq!(body["hybrid_bm25_weight"], 0.5);

    Ok(Json(json!({
        "documents": [[format!("{} passage for {}", name, body["query"].as_str().unwrap_or(""))]],
        "metadatas": [[{"collection": name, "k": body["k"]}]]
    })))
}

fn search_config(base_url: String) -> WebSearchConfig {
    WebSearchConfig {
        base_url,
        api_key: Some("test-key".to_string()),
        ..WebSearchConfig::default()
    }
}

#[tokio::test]
async fn web_search_limits_hits_to_requested_count() {
    let base = spawn_server(Router::new().route("/chat/completions", post(fake_search))).await;
    let search = PerplexitySearch::new(search_config(base)).unwrap();

    let hits = search.web_search("qubits", 3, None).await.unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].title.as_deref(), Some("qubits / one"));
    assert_eq!(hits[2].snippet, None);
}

#[tokio::test]
async fn web_search_surfaces_http_status() {
    let base = spawn_server(Router::new().route("/chat/completions", post(fake_search))).await;
    let search = PerplexitySearch::new(search_config(base)).unwrap();

    match search.web_search("explode", 3, Some("sonar-pro")).await {
        Err(ProviderError::Search(message)) => assert!(message.contains("502")),
        other => panic!("Expected search error, got {:?}", other),
    }
}

#[tokio::test]
async fn evidence_index_lists_and_queries_collections() {
    let app = Router::new()
        .route("/collections", get(fake_collections))
        .route("/collections/{name}/query/hybrid", post(fake_hybrid));
    let base = spawn_server(app).await;

    let index = HttpEvidenceIndex::new(&EvidenceIndexConfig {
        base_url: format!("{}/", base),
        ..EvidenceIndexConfig::default()
    })
    .unwrap();

    let collections = index.list_collections().await.unwrap();
    assert_eq!(collections, vec!["papers", "field notes"]);

    let request = HybridQuery {
        query: "coherence time".to_string(),
        top_k: 4,
        rerank_depth: 5,
        similarity_floor: 0.7,
        lexical_weight: 0.5,
    };

    let passages = index.hybrid_retrieve("field notes", &request).await.unwrap();
    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].content, "field notes passage for coherence time");
    assert_eq!(passages[0].metadata["collection"], "field notes");
    assert_eq!(passages[0].metadata["k"], 4);

    match index.hybrid_retrieve("broken", &request).await {
        Err(ProviderError::Index(message)) => assert!(message.contains("500")),
        other => panic!("Expected index error, got {:?}", other),
    }
}
