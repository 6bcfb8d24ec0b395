//! Data structures and types for trendwatch
//!
//! The unified schema shared by every platform adapter:
//! - **Platform**: which service a feed came from
//! - **StreamItem**: one piece of trending content
//! - **PlatformStats**: aggregates over a fetched set
//! - **PlatformFeed**: streams plus stats, the result of one fetch

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback used wherever a platform leaves a category blank
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// =============================================================================
// Platform
// =============================================================================

/// Streaming platform discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Twitch,
}

impl Platform {
    /// What `StreamItem::viewer_count` actually measures on this platform.
    ///
    /// The two numbers share a field but are not comparable.
    pub fn viewer_metric(&self) -> &'static str {
        match self {
            Platform::YouTube => "total views",
            Platform::Twitch => "live viewers",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::YouTube => write!(f, "YouTube"),
            Platform::Twitch => write!(f, "Twitch"),
        }
    }
}

// =============================================================================
// Stream Item
// =============================================================================

/// A single trending video or live stream, normalized across platforms.
///
/// `viewer_count` is **not** the same metric everywhere: YouTube reports the
/// lifetime view count of a video, Twitch reports concurrent live viewers.
/// See [`Platform::viewer_metric`].
///
/// `category` keeps each platform's own vocabulary (a numeric category id on
/// YouTube, a game name on Twitch) and is `"Unknown"` when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamItem {
    pub id: String,
    pub title: String,
    pub viewer_count: u64,
    /// Absolute URL, or empty when the source has no usable preview
    pub thumbnail_url: String,
    pub streamer_name: String,
    pub url: String,
    pub category: String,
}

impl StreamItem {
    /// Keep `url` only if it parses as an absolute URL
    pub fn sanitize_thumbnail(url: &str) -> String {
        match reqwest::Url::parse(url) {
            Ok(parsed) if parsed.has_host() => url.to_string(),
            _ => String::new(),
        }
    }

    /// Replace an empty category with `"Unknown"`
    pub fn category_or_unknown(category: Option<String>) -> String {
        category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
    }
}

// =============================================================================
// Stats
// =============================================================================

/// Aggregates over one fetched set of streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    /// Sum of `viewer_count` over the returned streams
    pub total_viewers: u64,
    /// Number of returned items, not distinct broadcasters
    pub active_broadcasters: usize,
    /// Taken from the first item in the platform's ordering
    pub top_category: String,
}

impl PlatformStats {
    /// Stats for an empty result set
    pub fn empty() -> Self {
        Self {
            total_viewers: 0,
            active_broadcasters: 0,
            top_category: UNKNOWN_CATEGORY.to_string(),
        }
    }

    /// Compute stats, drawing `top_category` from the first stream via `pick`.
    ///
    /// An empty list or an empty picked value yields `"Unknown"`.
    pub fn compute<F>(streams: &[StreamItem], pick: F) -> Self
    where
        F: Fn(&StreamItem) -> &str,
    {
        let total_viewers = streams
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.viewer_count));

        let top_category = streams
            .first()
            .map(pick)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CATEGORY)
            .to_string();

        Self {
            total_viewers,
            active_broadcasters: streams.len(),
            top_category,
        }
    }
}

impl Default for PlatformStats {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Feed
// =============================================================================

/// Result of a single fetch: streams in platform order plus their stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFeed {
    pub platform: Platform,
    pub streams: Vec<StreamItem>,
    pub stats: PlatformStats,
}

impl PlatformFeed {
    pub fn empty(platform: Platform) -> Self {
        Self {
            platform,
            streams: Vec::new(),
            stats: PlatformStats::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
