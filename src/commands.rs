//! CLI Command Handlers
//!
//! Calls the platform clients and renders their feeds.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::fmt::Write as _;

use serde::Serialize;

use crate::api::{TwitchClient, YouTubeClient};
use crate::cli::{ConfigCmd, ExitCode, FeedArgs, Output, TrendingCmd};
use crate::config::Config;
use crate::models::{Platform, PlatformFeed, PlatformStats, StreamItem};

/// Shown for any Twitch failure; the client does not say what went wrong
pub const TWITCH_FAILURE_MESSAGE: &str = "Failed to fetch Twitch data. Please try again later.";

// =============================================================================
// Trending Command
// =============================================================================

pub async fn trending_cmd(cmd: TrendingCmd, config: &Config, output: &Output) -> ExitCode {
    let platform = Platform::from(cmd.platform);
    output.info(format!("Fetching trending on {}...", platform));

    let feed = match platform {
        Platform::YouTube => match YouTubeClient::new(config).fetch_trending().await {
            Ok(feed) => feed,
            Err(e) => return output.error(e.user_message(), ExitCode::from(&e)),
        },
        Platform::Twitch => {
            if config.twitch_credentials().is_none() {
                return output.error(
                    "Twitch API credentials are required (TWITCH_CLIENT_ID, TWITCH_CLIENT_SECRET)",
                    ExitCode::ConfigError,
                );
            }
            match TwitchClient::new(config).fetch_top_streams().await {
                Some(feed) => feed,
                None => return output.error(TWITCH_FAILURE_MESSAGE, ExitCode::NetworkError),
            }
        }
    };

    if output.json {
        let view = FeedView::new(&feed, &cmd.args);
        if let Err(e) = output.print_json(&view) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        output.print_text(render_feed(&feed, &cmd.args));
    }
    ExitCode::Success
}

/// JSON shape of a displayed feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedView<'a> {
    platform: Platform,
    viewer_metric: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    streams: Option<&'a [StreamItem]>,
    stats: &'a PlatformStats,
}

impl<'a> FeedView<'a> {
    fn new(feed: &'a PlatformFeed, args: &FeedArgs) -> Self {
        Self {
            platform: feed.platform,
            viewer_metric: feed.platform.viewer_metric(),
            streams: (!args.stats_only).then(|| visible(feed, args)),
            stats: &feed.stats,
        }
    }
}

fn visible<'a>(feed: &'a PlatformFeed, args: &FeedArgs) -> &'a [StreamItem] {
    let n = args
        .limit
        .unwrap_or(feed.streams.len())
        .min(feed.streams.len());
    &feed.streams[..n]
}

/// Plain-text table for terminals
pub fn render_feed(feed: &PlatformFeed, args: &FeedArgs) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} trending", feed.platform);

    if !args.stats_only {
        if feed.is_empty() {
            let _ = writeln!(out, "  (nothing returned)");
        }
        for (rank, item) in visible(feed, args).iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {:>8}  {}  -  {}  [{}]",
                rank + 1,
                format_count(item.viewer_count),
                item.streamer_name,
                item.title,
                item.category
            );
            let _ = writeln!(out, "     {}", item.url);
        }
    }

    let stats = &feed.stats;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total {}: {}",
        feed.platform.viewer_metric(),
        format_count(stats.total_viewers)
    );
    let _ = writeln!(out, "Broadcasters: {}", stats.active_broadcasters);
    let _ = write!(out, "Top category: {}", stats.top_category);
    out
}

/// Compact count for display: 950, 1.2K, 3.4M
fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

// =============================================================================
// Config Command
// =============================================================================

pub fn config_cmd(_cmd: ConfigCmd, config: &Config, output: &Output) -> ExitCode {
    let status = config.status();

    if output.json {
        if let Err(e) = output.print_json(&status) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    let mark = |present: bool| if present { "set" } else { "missing" };
    output.print_text(format!(
        "YOUTUBE_API_KEY:      {}\n\
         TWITCH_CLIENT_ID:     {}\n\
         TWITCH_CLIENT_SECRET: {}\n\
         Region:               {}\n\
         Timeout:              {}s",
        mark(status.youtube_api_key),
        mark(status.twitch_client_id),
        mark(status.twitch_client_secret),
        status.region_code,
        status.request_timeout_secs
    ));
    ExitCode::Success
}
