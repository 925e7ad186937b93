//! Async utilities

use crate::error::{ErrorContext, SleuthError, SleuthResult};
use tokio::time::{timeout, Duration};
use tracing::warn;

/// Timeout wrapper for async operations
pub async fn with_timeout<F, T>(future: F, timeout_ms: u64, operation_name: &str) -> SleuthResult<T>
where
    F: std::future::Future<Output = T>,
{
    match timeout(Duration::from_millis(timeout_ms), future).await {
        Ok(result) => Ok(result),
        Err(_) => {
            warn!(
                operation = operation_name,
                timeout_ms = timeout_ms,
                "Operation timed out"
            );
            Err(SleuthError::Timeout {
                operation: operation_name.to_string(),
                duration_ms: timeout_ms,
                context: ErrorContext::new("async_utils")
                    .with_operation("timeout")
                    .with_metadata("timeout_ms", &timeout_ms.to_string())
                    .with_suggestion("Increase timeout duration")
                    .with_suggestion("Verify backend availability"),
            })
        }
    }
}

/// Take at most `max_chars` characters of `text` without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
