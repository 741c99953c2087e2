use clap::Parser;
use std::process::ExitCode;

mod app;
mod cli;
mod config;
mod core;
mod display;
mod history;
mod input;
mod lenny;
mod providers;
mod server;

use crate::app::Application;
use crate::cli::{Args, Command};
use crate::config::{ConfigResolver, ProcessEnv};
use crate::core::error::LennyError;
use crate::lenny::Lenny;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            display::display_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), LennyError> {
    let lenny = Lenny::from_env()?;

    match args.command() {
        Command::Serve { bind } => {
            let mut server_config = ConfigResolver::new(&ProcessEnv).resolve_server();
            if let Some(bind) = bind {
                server_config.bind_addr = bind;
            }
            server::serve(lenny, &server_config).await
        }
        Command::Chat => Application::new(lenny).run().await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<(), LennyError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .map_err(|e| LennyError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
