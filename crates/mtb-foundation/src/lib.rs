//! Foundation crate providing common utilities and types shared across the workspace.
//!
//! This crate provides foundational functionality used by the validator crate:
//! - Error handling (`error` module)
//! - Configuration traits (`config` module)
//! - JSON helpers (`json` module)

pub mod config;
pub mod error;
pub mod json;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorContext, ErrorWithMetadata, FoundationError, Result};
