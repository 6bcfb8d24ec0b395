//! API clients for streaming platforms
//!
//! - YouTube: most-popular video chart (API key)
//! - Twitch: top live streams (client-credentials token)
//!
//! Both map their payloads onto [`crate::models::PlatformFeed`].

pub mod error;
pub mod twitch;
pub mod youtube;

pub use error::FetchError;
pub use twitch::TwitchClient;
pub use youtube::YouTubeClient;

use std::time::Duration;

/// HTTP client shared by the platform clients
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("trendwatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}
