//! BotConfig: transport + store + log + generation + annotation settings. Use load() for
//! env-based loading.
//!
//! Generation settings live in llm-client (`LlmConfig`) and transport settings in
//! intake-telegram (`TelegramConfig`); this struct composes them with the bot's own keys.

use anyhow::{Context, Result};
use annotation::{DEFAULT_TARGET_LANG, DEFAULT_TRANSLATE_BASE_URL};
use intake_telegram::TelegramConfig;
use llm_client::LlmConfig;
use std::env;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./intake_bot.db";
pub const DEFAULT_LOG_FILE: &str = "logs/intake-bot.log";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub database_url: String,
    pub log_file: String,
    pub llm: LlmConfig,
    pub referral_bonus: u32,
    pub translate_target_lang: String,
    pub translate_base_url: String,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides
    /// TELEGRAM_BOT_TOKEN / BOT_TOKEN. Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::load(token)?;
        let llm = LlmConfig::from_env()?;

        let referral_bonus = match non_empty_var("REFERRAL_BONUS") {
            Some(value) => value.trim().parse::<u32>().with_context(|| {
                format!("REFERRAL_BONUS must be a non-negative integer, got '{}'", value)
            })?,
            None => 0,
        };

        Ok(Self {
            telegram,
            database_url: database_url_from_env(),
            log_file: non_empty_var("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            llm,
            referral_bonus,
            translate_target_lang: non_empty_var("TRANSLATE_TARGET_LANG")
                .unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string()),
            translate_base_url: non_empty_var("TRANSLATE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TRANSLATE_BASE_URL.to_string()),
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is empty");
        }
        if self.llm.max_output_tokens == 0 {
            anyhow::bail!("MAX_OUTPUT_TOKENS must be greater than zero");
        }
        Ok(())
    }

    /// Timeout shared by the HTTP facades (generation and translation).
    pub fn request_timeout(&self) -> Duration {
        self.llm.request_timeout()
    }
}

/// DATABASE_URL or the default SQLite file. Used on its own by `stats`, which needs no tokens.
pub fn database_url_from_env() -> String {
    non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
