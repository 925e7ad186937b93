//! HTTP plumbing shared by the web search and evidence index clients

use crate::types::{ProviderError, ProviderResult};
use std::collections::HashMap;

/// Configuration for an HTTP-backed provider client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Additional headers
    pub headers: HashMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("sleuth/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
        }
    }
}

impl HttpClientConfig {
    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Build a `reqwest` client with user agent, extra headers, and timeout applied
pub fn create_http_client(config: &HttpClientConfig) -> ProviderResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ProviderError::Config(format!("Invalid user agent: {}", e)))?,
    );

    for (key, value) in &config.headers {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ProviderError::Config(format!("Invalid header name '{}': {}", key, e)))?;
        let header_value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
            ProviderError::Config(format!("Invalid header value for '{}': {}", key, e))
        })?;
        headers.insert(header_name, header_value);
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()?;

    Ok(client)
}

/// Turn a non-success response into a provider error built by `make`
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    make: fn(String) -> ProviderError,
) -> ProviderError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    make(format!(
        "HTTP {} error for {}: {}",
        status.as_u16(),
        url,
        if error_body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error")
        } else {
            &error_body
        }
    ))
}
