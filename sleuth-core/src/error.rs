//! Unified error handling system
//!
//! Structured error types with context and recovery suggestions, shared by the
//! setup paths of every crate (configuration, client construction, logging).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type SleuthResult<T> = Result<T, SleuthError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for Sleuth setup and infrastructure
#[derive(Error, Debug)]
pub enum SleuthError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },
}

impl SleuthError {
    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            SleuthError::Config { context, .. }
            | SleuthError::Validation { context, .. }
            | SleuthError::Timeout { context, .. } => context,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = &self.context().error_id;
        match self {
            SleuthError::Config { .. } | SleuthError::Validation { .. } => {
                error!(
                    error_id = %error_id,
                    error = %self,
                    "Configuration or validation error"
                );
            }
            SleuthError::Timeout { .. } => {
                warn!(error_id = %error_id, error = %self, "Operation timed out");
            }
        }
    }
}

/// Build a `SleuthError::Validation` for a configuration field
#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::SleuthError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_operation("validate")
                .with_suggestion(&format!("Set {} to a valid value", $field)),
        }
    };
}
