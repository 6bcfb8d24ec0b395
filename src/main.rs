//! trendwatch - trending streams from Twitch and YouTube
//!
//! # Usage
//!
//! ```bash
//! trendwatch youtube
//! trendwatch twitch --limit 10
//! trendwatch trending yt --json
//! ```

use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trendwatch::cli::{Cli, Command, ExitCode, Output};
use trendwatch::commands;
use trendwatch::config::Config;

/// Env var holding the log filter directive
const LOG_ENV: &str = "TRENDWATCH_LOG";

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let exit_code = run_cli(cli).await;
    exit_code.into()
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            return output.error(
                format!("Failed to load config: {}", e),
                ExitCode::ConfigError,
            )
        }
    };

    match &cli.command {
        Command::Config(cmd) => commands::config_cmd(cmd.clone(), &config, &output),
        other => match other.as_trending() {
            Some(cmd) => commands::trending_cmd(cmd, &config, &output).await,
            None => ExitCode::InvalidArgs,
        },
    }
}
