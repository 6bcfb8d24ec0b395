//! trendwatch - trending streams from Twitch and YouTube
//!
//! Calls each platform's API, handles its authentication, and maps the
//! results onto one schema with consistent aggregate stats.
//!
//! # Modules
//!
//! - `models` - Unified schema: streams, stats, feeds
//! - `api` - Platform clients (YouTube, Twitch) and their error type
//! - `config` - Credentials and request settings
//! - `cli` / `commands` - Command-line front end

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;

// Re-export commonly used types
pub use models::{Platform, PlatformFeed, PlatformStats, StreamItem};

pub use api::{FetchError, TwitchClient, YouTubeClient};
pub use config::Config;
