//! # intake-bot
//!
//! Binary crate: CLI parsing, env configuration, component factory and bot lifecycle.

pub mod cli;
pub mod components;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_dispatch_context, build_dispatcher};
pub use config::{database_url_from_env, BotConfig};
pub use runner::{format_stats, load_stats, run_bot};
