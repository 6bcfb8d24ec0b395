//! YouTube Data API v3 client
//!
//! Fetches the most-popular video chart and maps it onto the unified schema.
//! API docs: https://developers.google.com/youtube/v3/docs/videos/list

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::error::FetchError;
use crate::config::Config;
use crate::models::{Platform, PlatformFeed, PlatformStats, StreamItem};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const VIDEO_PARTS: &str = "snippet,statistics,liveStreamingDetails";
const PAGE_SIZE: &str = "20";

fn api_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static pattern"))
}

/// YouTube trending client
pub struct YouTubeClient {
    api_key: Option<String>,
    region_code: String,
    base_url: String,
    client: reqwest::Client,
}

impl YouTubeClient {
    /// Create a client from the application config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Self {
        Self {
            api_key: config.youtube_api_key().map(str::to_string),
            region_code: config.region_code.clone(),
            base_url: base_url.into(),
            client: super::http_client(config.request_timeout_secs),
        }
    }

    /// Check the key is present and well-formed before touching the network
    fn validated_key(&self) -> Result<&str, FetchError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FetchError::Configuration("YouTube API key is required".into()))?;

        if !api_key_pattern().is_match(key) {
            return Err(FetchError::Configuration(
                "Invalid YouTube API key format".into(),
            ));
        }
        Ok(key)
    }

    /// Fetch the most-popular chart for the configured region.
    ///
    /// HTTP failures come back classified (quota, forbidden, bad request) so
    /// the caller can show specific guidance. An empty chart is not an error.
    pub async fn fetch_trending(&self) -> Result<PlatformFeed, FetchError> {
        let key = self.validated_key()?;
        let url = format!("{}/videos", self.base_url);

        tracing::debug!(region = %self.region_code, "Fetching YouTube trending videos");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", VIDEO_PARTS),
                ("chart", "mostPopular"),
                ("maxResults", PAGE_SIZE),
                ("regionCode", self.region_code.as_str()),
                ("key", key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = FetchError::from_youtube_response(status, &body);
            tracing::error!(status = status.as_u16(), error = %err, "YouTube API request failed");
            return Err(err);
        }

        let parsed: VideoListResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Error fetching YouTube data");
            FetchError::Platform(format!("YouTube API error: {}", e))
        })?;

        Ok(parsed.into_feed())
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    // Kept as raw values so one malformed entry does not sink the page
    items: Option<Vec<serde_json::Value>>,
}

impl VideoListResponse {
    fn into_feed(self) -> PlatformFeed {
        let raw = self.items.unwrap_or_default();
        if raw.is_empty() {
            tracing::warn!("No videos returned from YouTube API");
            return PlatformFeed::empty(Platform::YouTube);
        }

        let received = raw.len();
        let streams: Vec<StreamItem> = raw
            .into_iter()
            .filter_map(|v| serde_json::from_value::<VideoRaw>(v).ok())
            .filter_map(VideoRaw::into_stream_item)
            .collect();

        if streams.len() < received {
            tracing::debug!(
                dropped = received - streams.len(),
                "Dropped incomplete YouTube items"
            );
        }

        let stats = PlatformStats::compute(&streams, |s| s.category.as_str());
        PlatformFeed {
            platform: Platform::YouTube,
            streams,
            stats,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoRaw {
    id: Option<String>,
    snippet: Option<SnippetRaw>,
    statistics: Option<StatisticsRaw>,
}

impl VideoRaw {
    /// Map to a StreamItem; `None` when snippet or statistics are missing
    fn into_stream_item(self) -> Option<StreamItem> {
        let snippet = self.snippet?;
        let statistics = self.statistics?;
        let id = self.id.unwrap_or_default();

        Some(StreamItem {
            url: format!("https://www.youtube.com/watch?v={}", id),
            id,
            title: snippet.title.unwrap_or_default(),
            viewer_count: statistics.view_count.as_ref().map(parse_count).unwrap_or(0),
            thumbnail_url: snippet.thumbnails.unwrap_or_default().best(),
            streamer_name: snippet.channel_title.unwrap_or_default(),
            category: StreamItem::category_or_unknown(snippet.category_id),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnippetRaw {
    // Null and absent both map to empty
    title: Option<String>,
    channel_title: Option<String>,
    category_id: Option<String>,
    thumbnails: Option<ThumbnailsRaw>,
}

#[derive(Debug, Default, Deserialize)]
struct ThumbnailsRaw {
    default: Option<ThumbnailRaw>,
    medium: Option<ThumbnailRaw>,
    high: Option<ThumbnailRaw>,
    standard: Option<ThumbnailRaw>,
    maxres: Option<ThumbnailRaw>,
}

impl ThumbnailsRaw {
    /// Highest resolution with a usable URL, or empty
    fn best(&self) -> String {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .filter_map(|t| t.url.as_deref())
        .map(StreamItem::sanitize_thumbnail)
        .find(|url| !url.is_empty())
        .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ThumbnailRaw {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsRaw {
    // The API sends counts as strings
    view_count: Option<serde_json::Value>,
}

/// Read a count the lenient way: leading digits of a string, or a
/// non-negative number. Anything else is 0.
fn parse_count(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if digits.is_empty() {
                0
            } else {
                // All digits, so the only failure left is overflow
                digits.parse().unwrap_or(u64::MAX)
            }
        }
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}
