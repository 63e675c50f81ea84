//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "intake-bot")]
#[command(about = "Telegram intake bot: registration, referrals, annotated text, media and web search", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token overrides TELEGRAM_BOT_TOKEN / BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print record counts from the store at DATABASE_URL.
    Stats {
        /// Print as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}
