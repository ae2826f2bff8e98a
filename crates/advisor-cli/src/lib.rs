//! Command-line interface for the fin-advisor assistant.
//!
//! Provides an interactive chat session plus one-shot `ask` and
//! `categorize` subcommands, all driven by the shared response engine.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
