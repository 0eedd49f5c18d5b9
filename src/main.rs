//! quranjar - emotion ensemble with Quranic verse citations
//!
//! Usage:
//!   quranjar serve                 Start the HTTP server (POST /predict)
//!   quranjar predict "text"        One-shot prediction
//!   quranjar corpus                Corpus class distribution
//!   quranjar --help                Show all commands

use anyhow::Result;
use clap::Parser;

use quranjar::cli::handlers::{corpus::handle_corpus, predict::handle_predict};
use quranjar::cli::{Cli, Commands};
use quranjar::init::AppContext;
use quranjar::server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quranjar=info".parse()?),
        )
        .init();

    let mode = cli.output_mode();

    match &cli.command {
        Commands::Serve { bind } => {
            let ctx = AppContext::new(cli.data_path.clone(), cli.config.clone()).await?;
            let bind = bind.clone().unwrap_or_else(|| ctx.config.bind.clone());
            serve(AppState::new(ctx.prediction.clone()), &bind).await?;
        }
        Commands::Predict { text } => {
            let ctx = AppContext::new(cli.data_path.clone(), cli.config.clone()).await?;
            handle_predict(&ctx, text, mode).await?;
        }
        Commands::Corpus { threshold } => {
            handle_corpus(cli.data_path.clone(), cli.config.clone(), *threshold, mode)?;
        }
    }

    Ok(())
}
