//! Twitch Helix client
//!
//! Gets an app access token through the OAuth2 client-credentials grant,
//! then lists the top live streams by viewer count.
//! API docs: https://dev.twitch.tv/docs/api/reference/#get-streams

use reqwest::StatusCode;
use serde::Deserialize;

use super::error::FetchError;
use crate::config::Config;
use crate::models::{Platform, PlatformFeed, PlatformStats, StreamItem};

const DEFAULT_API_URL: &str = "https://api.twitch.tv/helix";
const DEFAULT_AUTH_URL: &str = "https://id.twitch.tv/oauth2/token";
const TOKEN_SCOPE: &str = "channel:read:stream_key";
const PAGE_SIZE: &str = "20";
const THUMBNAIL_WIDTH: &str = "640";
const THUMBNAIL_HEIGHT: &str = "360";

const TWO_FACTOR_MESSAGE: &str = "Two-factor authentication required. \
    Please enable 2FA in your Twitch account settings.";

/// Twitch top-streams client
pub struct TwitchClient {
    client_id: Option<String>,
    client_secret: Option<String>,
    api_url: String,
    auth_url: String,
    client: reqwest::Client,
}

impl TwitchClient {
    /// Create a client from the application config
    pub fn new(config: &Config) -> Self {
        Self::with_base_urls(config, DEFAULT_API_URL, DEFAULT_AUTH_URL)
    }

    /// Create a client with custom Helix and token URLs (for testing)
    pub fn with_base_urls(
        config: &Config,
        api_url: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Self {
        let (client_id, client_secret) = match config.twitch_credentials() {
            Some((id, secret)) => (Some(id.to_string()), Some(secret.to_string())),
            None => (None, None),
        };

        Self {
            client_id,
            client_secret,
            api_url: api_url.into(),
            auth_url: auth_url.into(),
            client: super::http_client(config.request_timeout_secs),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), FetchError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(FetchError::Configuration(
                "Twitch API credentials are required".into(),
            )),
        }
    }

    /// Run the client-credentials grant.
    ///
    /// A 403 is an `Auth` error (the account needs 2FA). Every other failure
    /// is logged and reported as `Ok(None)`.
    pub async fn get_access_token(&self) -> Result<Option<String>, FetchError> {
        let (client_id, client_secret) = self.credentials()?;

        let response = match self
            .client
            .post(&self.auth_url)
            .query(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
                ("scope", TOKEN_SCOPE),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Error getting Twitch access token");
                return Ok(None);
            }
        };

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            tracing::error!("Two-factor authentication required for this action");
            return Err(FetchError::Auth(TWO_FACTOR_MESSAGE.into()));
        }
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Error getting Twitch access token");
            return Ok(None);
        }

        match response.json::<TokenResponse>().await {
            Ok(TokenResponse {
                access_token: Some(token),
            }) if !token.is_empty() => Ok(Some(token)),
            Ok(_) => {
                tracing::error!("Twitch token response carried no access_token");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error getting Twitch access token");
                Ok(None)
            }
        }
    }

    /// Fetch top streams, reporting failures as a typed error
    pub async fn try_fetch_top_streams(&self) -> Result<PlatformFeed, FetchError> {
        let (client_id, _) = self.credentials()?;

        let token = self
            .get_access_token()
            .await?
            .ok_or_else(|| FetchError::Auth("Failed to get Twitch access token".into()))?;

        tracing::debug!("Fetching Twitch top streams");

        let response = self
            .client
            .get(format!("{}/streams", self.api_url))
            .query(&[("first", PAGE_SIZE), ("sort", "viewers")])
            .header("Client-ID", client_id)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<HelixError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: StreamsResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Platform(format!("Twitch API error: {}", e)))?;

        Ok(parsed.into_feed())
    }

    /// Fetch top streams. Any failure is logged and becomes `None`.
    pub async fn fetch_top_streams(&self) -> Option<PlatformFeed> {
        match self.try_fetch_top_streams().await {
            Ok(feed) => Some(feed),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching Twitch data");
                None
            }
        }
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelixError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    data: Vec<StreamRaw>,
}

impl StreamsResponse {
    fn into_feed(self) -> PlatformFeed {
        let streams: Vec<StreamItem> = self
            .data
            .into_iter()
            .map(StreamRaw::into_stream_item)
            .collect();

        // Twitch ranks by title of the top stream, not its game
        let stats = PlatformStats::compute(&streams, |s| s.title.as_str());
        PlatformFeed {
            platform: Platform::Twitch,
            streams,
            stats,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StreamRaw {
    id: String,
    title: String,
    viewer_count: u64,
    thumbnail_url: String,
    user_name: String,
    user_login: String,
    game_name: Option<String>,
}

impl StreamRaw {
    fn into_stream_item(self) -> StreamItem {
        StreamItem {
            id: self.id,
            title: self.title,
            viewer_count: self.viewer_count,
            thumbnail_url: sized_thumbnail(&self.thumbnail_url),
            streamer_name: self.user_name,
            url: format!("https://twitch.tv/{}", self.user_login),
            category: StreamItem::category_or_unknown(self.game_name),
        }
    }
}

/// Fill the `{width}x{height}` template Twitch sends for previews
fn sized_thumbnail(template: &str) -> String {
    let url = template
        .replace("{width}", THUMBNAIL_WIDTH)
        .replace("{height}", THUMBNAIL_HEIGHT);
    StreamItem::sanitize_thumbnail(&url)
}
