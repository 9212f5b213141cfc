//! Nova CLI library module.
//!
//! # Module Organization
//!
//! - `cli/` - CLI argument parsing and command dispatch
//! - `config` - `config.toml` loading and overrides
//! - `logging` - tracing subscriber setup
//! - `render` - terminal output of revealed replies
//! - Command modules - Individual CLI commands (`*_cmd.rs`)

pub mod ask_cmd;
pub mod chat_cmd;
pub mod cli;
pub mod config;
pub mod extract_cmd;
pub mod health_cmd;
pub mod logging;
pub mod render;

#[cfg(test)]
pub(crate) mod test_support;
