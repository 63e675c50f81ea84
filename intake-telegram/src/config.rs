//! Minimal transport config: token and optional Bot API URL.
//! Loaded from TELEGRAM_BOT_TOKEN / BOT_TOKEN and TELEGRAM_API_URL / TELOXIDE_API_URL.

use anyhow::{Context, Result};
use std::env;
use tracing::info;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// Loads from the environment; `token` overrides the token variables when given.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token.filter(|t| !t.trim().is_empty()) {
            Some(token) => token,
            None => non_empty_var("TELEGRAM_BOT_TOKEN")
                .or_else(|| non_empty_var("BOT_TOKEN"))
                .context("TELEGRAM_BOT_TOKEN (or BOT_TOKEN) not set")?,
        };
        let telegram_api_url =
            non_empty_var("TELEGRAM_API_URL").or_else(|| non_empty_var("TELOXIDE_API_URL"));
        Ok(Self {
            bot_token,
            telegram_api_url,
        })
    }

    /// Builds with the given token and the default API URL.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }

    /// Validates that a configured API URL parses.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }

    /// teloxide Bot for this config, pointed at the custom API URL when one is set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url {
            Some(ref url_str) => {
                let url = reqwest::Url::parse(url_str)
                    .with_context(|| format!("invalid Telegram API URL: {}", url_str))?;
                info!(url = %url, "Using custom Telegram API URL");
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
