//! # advisor-types
//!
//! Shared types for the fin-advisor workspace:
//!
//! - [`Settings`]: layered application configuration
//! - [`FaqEntry`]: one question/answer record from the knowledge base
//! - [`ConfigError`]: configuration loading and validation failures

pub mod config;
pub mod error;
pub mod faq;

pub use config::Settings;
pub use error::ConfigError;
pub use faq::FaqEntry;
