//! CLI - Command Line Interface for trendwatch
//!
//! Picks a platform, fetches its trending feed and prints it. Output is a
//! plain table on a terminal and JSON everywhere else.
//!
//! # Examples
//!
//! ```bash
//! # Trending on YouTube
//! trendwatch youtube
//!
//! # Top ten Twitch streams as JSON
//! trendwatch trending twitch --limit 10 --json
//!
//! # Which credentials are configured
//! trendwatch config
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::FetchError;
use crate::models::Platform;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network or HTTP error
    NetworkError = 3,
    /// Missing or malformed credentials
    ConfigError = 4,
    /// Token acquisition rejected or access forbidden
    AuthError = 5,
    /// API quota spent
    QuotaExceeded = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&FetchError> for ExitCode {
    fn from(err: &FetchError) -> ExitCode {
        match err {
            FetchError::Configuration(_) => ExitCode::ConfigError,
            FetchError::Auth(_) | FetchError::AccessForbidden { .. } => ExitCode::AuthError,
            FetchError::QuotaExceeded { .. } => ExitCode::QuotaExceeded,
            FetchError::BadRequest { .. } | FetchError::Http { .. } | FetchError::Transport(_) => {
                ExitCode::NetworkError
            }
            FetchError::Platform(_) => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// trendwatch - trending streams from Twitch and YouTube
#[derive(Parser, Debug)]
#[command(
    name = "trendwatch",
    version,
    about = "Trending streams from Twitch and YouTube",
    long_about = "Fetches the current trending list from one streaming platform, \
                  normalizes it and prints it along with aggregate stats.\n\n\
                  Credentials come from YOUTUBE_API_KEY, TWITCH_CLIENT_ID and \
                  TWITCH_CLIENT_SECRET (environment, .env or config file).",
    after_help = "EXAMPLES:\n\
                  trendwatch youtube                  Trending YouTube videos\n\
                  trendwatch twitch --limit 5         Top five Twitch streams\n\
                  trendwatch tr yt --stats-only       Just the aggregate stats\n\
                  trendwatch config --json            Credential status"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get trending content for a platform
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Trending YouTube videos
    #[command(visible_alias = "yt")]
    Youtube(FeedArgs),

    /// Top live Twitch streams
    #[command(visible_alias = "tw")]
    Twitch(FeedArgs),

    /// Show which credentials are configured
    Config(ConfigCmd),
}

impl Command {
    /// Resolve platform shorthands into a trending request
    pub fn as_trending(&self) -> Option<TrendingCmd> {
        match self {
            Command::Trending(cmd) => Some(cmd.clone()),
            Command::Youtube(args) => Some(TrendingCmd {
                platform: PlatformArg::Youtube,
                args: args.clone(),
            }),
            Command::Twitch(args) => Some(TrendingCmd {
                platform: PlatformArg::Twitch,
                args: args.clone(),
            }),
            Command::Config(_) => None,
        }
    }
}

// =============================================================================
// Trending Command
// =============================================================================

/// Fetch trending content for a platform
#[derive(Args, Debug, Clone)]
pub struct TrendingCmd {
    /// Platform to query
    #[arg(required = true, value_enum)]
    pub platform: PlatformArg,

    #[command(flatten)]
    pub args: FeedArgs,
}

/// Display options shared by every feed command
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Show at most this many items (stats still cover the full fetch)
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Print only the aggregate stats
    #[arg(long, short = 's')]
    pub stats_only: bool,
}

/// Platform selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    #[value(alias = "yt")]
    Youtube,
    #[value(alias = "tw")]
    Twitch,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Platform {
        match arg {
            PlatformArg::Youtube => Platform::YouTube,
            PlatformArg::Twitch => Platform::Twitch,
        }
    }
}

// =============================================================================
// Config Command
// =============================================================================

/// Report credential presence without revealing values
#[derive(Args, Debug, Clone)]
pub struct ConfigCmd {}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data wrapped in the JSON envelope
    pub fn print_json<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print preformatted text to stdout
    pub fn print_text(&self, text: impl std::fmt::Display) {
        println!("{}", text);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
