//! Sleuth Core - shared configuration, error, and logging infrastructure
//!
//! Everything here is setup-time plumbing used by the provider clients, the
//! research pipeline, and the command-line driver.

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use async_utils::*;
pub use error::*;
pub use logging::*;
pub use types::*;
