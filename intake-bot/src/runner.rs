//! Bot lifecycle: tracing, store, dispatcher, REPL; plus the read-only `stats` command.

use anyhow::{Context, Result};
use intake_core::init_tracing;
use intake_telegram::run_repl;
use std::sync::Arc;
use storage::{RecordCounts, RecordStore, SqliteRecordStore};
use tracing::{info, instrument};

use crate::components::build_dispatcher;
use crate::config::BotConfig;

/// Runs the bot until the REPL stops. Opens the store first and closes its pool on the way out.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        log_file = %config.log_file,
        "Initializing bot"
    );

    let store = Arc::new(
        SqliteRecordStore::new(&config.database_url)
            .await
            .with_context(|| format!("failed to open record store at {}", config.database_url))?,
    );
    let dispatcher = build_dispatcher(&config, store.clone())?;
    let bot = config.telegram.build_bot()?;

    info!("Bot started successfully");
    let result = run_repl(bot, dispatcher).await;

    store.close().await;
    info!("Bot stopped");
    result
}

/// Reads the record counts at `database_url`. The database is opened read-only and must exist.
pub async fn load_stats(database_url: &str) -> Result<RecordCounts> {
    let store = SqliteRecordStore::open_read_only(database_url)
        .await
        .with_context(|| format!("failed to open record store at {}", database_url))?;
    let counts = store.counts().await;
    store.close().await;
    Ok(counts?)
}

/// Text or JSON rendering of the counts for the `stats` command.
pub fn format_stats(counts: &RecordCounts, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(counts)?);
    }
    Ok(format!(
        "users: {}\nmessages: {}\nfiles: {}\nsearches: {}",
        counts.total_users, counts.total_messages, counts.total_files, counts.total_searches
    ))
}
