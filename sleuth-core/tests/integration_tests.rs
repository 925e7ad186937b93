//! Integration tests for sleuth-core infrastructure

use std::time::Duration;
use tokio::time::sleep;
use sleuth_core::{validation_error, with_timeout, LogFormat, SleuthConfig, SleuthError};

#[test]
fn test_validation_errors_carry_field_and_context() {
    let mut config = SleuthConfig::default();
    config.research.max_queries = 0;

    let error = config.validate().unwrap_err();
    match &error {
        SleuthError::Validation { field, context, .. } => {
            assert_eq!(field.as_deref(), Some("research.max_queries"));
            assert_eq!(context.component, "config");
            assert_eq!(context.operation.as_deref(), Some("validate"));
            assert!(!context.error_id.is_empty());
            assert_eq!(
                context.recovery_suggestions,
                vec!["Set research.max_queries to a valid value"]
            );
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }

    // Should not panic without a subscriber
    error.log();
}

#[test]
fn test_validation_error_macro() {
    let error = validation_error!("bad value", "web_search.result_count", "cli");
    assert_eq!(error.context().component, "cli");
    assert_eq!(error.to_string(), "Validation error: bad value");
}

#[tokio::test]
async fn test_timeout_wrapper() {
    let fast = with_timeout(async { 42 }, 1000, "fast_operation").await;
    assert_eq!(fast.unwrap(), 42);

    let slow = with_timeout(
        async {
            sleep(Duration::from_millis(200)).await;
            42
        },
        10,
        "slow_operation",
    )
    .await;

    match slow {
        Err(SleuthError::Timeout {
            operation,
            duration_ms,
            ..
        }) => {
            assert_eq!(operation, "slow_operation");
            assert_eq!(duration_ms, 10);
        }
        other => panic!("Expected timeout, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sleuth.toml");

    let mut config = SleuthConfig::default();
    config.models.secondary.model = "claude-3-5-haiku-latest".to_string();
    config.models.secondary.provider = "anthropic".to_string();
    config.evidence_index.top_k = 8;
    config.logging.format = LogFormat::Json;
    config.save_to_file(&path).unwrap();

    let loaded = SleuthConfig::from_file(&path).unwrap();
    assert_eq!(loaded.models.secondary.provider, "anthropic");
    assert_eq!(loaded.evidence_index.top_k, 8);
    assert_eq!(loaded.logging.format, LogFormat::Json);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_load_explicit_path_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[models\nprimary = ").unwrap();

    match SleuthConfig::load(Some(&path)) {
        Err(SleuthError::Config { context, .. }) => {
            assert_eq!(context.operation.as_deref(), Some("parse_toml"));
        }
        other => panic!("Expected config error, got {:?}", other.map(|_| ())),
    }
}
