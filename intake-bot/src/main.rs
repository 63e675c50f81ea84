//! intake-bot CLI: run the Telegram bot or print record counts. Config from env and optional
//! CLI args.

use anyhow::Result;
use clap::Parser;
use intake_bot::{database_url_from_env, format_stats, load_stats, run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Stats { json } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
            let counts = load_stats(&database_url_from_env()).await?;
            println!("{}", format_stats(&counts, json)?);
            Ok(())
        }
    }
}
