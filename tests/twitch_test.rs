//! Twitch client tests
//!
//! Covers the token grant, the streams request, mapping, and the
//! convention that `fetch_top_streams` never surfaces an error.

use mockito::{Matcher, Mock, Server, ServerGuard};
use trendwatch::api::{FetchError, TwitchClient};
use trendwatch::config::Config;
use trendwatch::models::Platform;

const CLIENT_ID: &str = "test-client-id";
const CLIENT_SECRET: &str = "test-client-secret";
const TOKEN: &str = "app-token-abc";

fn config() -> Config {
    Config {
        twitch_client_id: Some(CLIENT_ID.into()),
        twitch_client_secret: Some(CLIENT_SECRET.into()),
        ..Config::default()
    }
}

fn client_for(server: &ServerGuard, config: &Config) -> TwitchClient {
    TwitchClient::with_base_urls(
        config,
        format!("{}/helix", server.url()),
        format!("{}/oauth2/token", server.url()),
    )
}

async fn token_mock(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("POST", "/oauth2/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("client_id".into(), CLIENT_ID.into()),
            Matcher::UrlEncoded("client_secret".into(), CLIENT_SECRET.into()),
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            Matcher::UrlEncoded("scope".into(), "channel:read:stream_key".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn token_body() -> String {
    format!(
        r#"{{"access_token": "{}", "expires_in": 5011271, "token_type": "bearer"}}"#,
        TOKEN
    )
}

const STREAMS_BODY: &str = r#"{
    "data": [
        {
            "id": "40952121085",
            "user_id": "101051819",
            "user_login": "afro",
            "user_name": "Afro",
            "game_id": "32982",
            "game_name": "Grand Theft Auto V",
            "type": "live",
            "title": "Jacob: Digital Den Laptops & Tablets",
            "viewer_count": 1490,
            "started_at": "2021-03-10T03:18:11Z",
            "language": "en",
            "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-{width}x{height}.jpg",
            "tags": [],
            "is_mature": false
        },
        {
            "id": "40952121086",
            "user_login": "quiet",
            "user_name": "Quiet",
            "game_name": "",
            "title": "Just vibing",
            "viewer_count": 10,
            "thumbnail_url": "https://x/{width}x{height}.jpg"
        }
    ],
    "pagination": {"cursor": "eyJiIjp7IkN1cnNvciI6ImV5SnpJam8zT0RNMk5TNDBORFF4TlRjMU1UY3hOU3dpWkNJNlptRnNjMlVzSW5RaU9uUnlkV1Y5In0sImEiOnsiQ3Vyc29yIjoiZXlKeklqb3hOVGd3TGpZM09EVXdPVFl6TXpFeExDSmtJanBtWVd4elpTd2lkQ0k2ZEhKMVpYMD0ifX0"}
}"#;

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_fetch_top_streams_maps_response() {
    let mut server = Server::new_async().await;

    let token = token_mock(&mut server, 200, &token_body()).await;
    let streams = server
        .mock("GET", "/helix/streams")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("first".into(), "20".into()),
            Matcher::UrlEncoded("sort".into(), "viewers".into()),
        ]))
        .match_header("Client-ID", CLIENT_ID)
        .match_header("Authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(STREAMS_BODY)
        .create_async()
        .await;

    let feed = client_for(&server, &config())
        .fetch_top_streams()
        .await
        .expect("feed");

    token.assert_async().await;
    streams.assert_async().await;

    assert_eq!(feed.platform, Platform::Twitch);
    assert_eq!(feed.streams.len(), 2);

    let first = &feed.streams[0];
    assert_eq!(first.id, "40952121085");
    assert_eq!(first.streamer_name, "Afro");
    assert_eq!(first.viewer_count, 1490);
    assert_eq!(first.url, "https://twitch.tv/afro");
    assert_eq!(first.category, "Grand Theft Auto V");
    assert_eq!(
        first.thumbnail_url,
        "https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-640x360.jpg"
    );

    let second = &feed.streams[1];
    assert_eq!(second.category, "Unknown");
    assert_eq!(second.thumbnail_url, "https://x/640x360.jpg");

    assert_eq!(feed.stats.total_viewers, 1500);
    assert_eq!(feed.stats.active_broadcasters, 2);
    // Drawn from the first stream's title, not its game
    assert_eq!(
        feed.stats.top_category,
        "Jacob: Digital Den Laptops & Tablets"
    );
}

#[tokio::test]
async fn test_empty_stream_list() {
    let mut server = Server::new_async().await;

    let _token = token_mock(&mut server, 200, &token_body()).await;
    let streams = server
        .mock("GET", "/helix/streams")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": [], "pagination": {}}"#)
        .create_async()
        .await;

    let feed = client_for(&server, &config())
        .fetch_top_streams()
        .await
        .expect("feed");
    streams.assert_async().await;

    assert!(feed.streams.is_empty());
    assert_eq!(feed.stats.total_viewers, 0);
    assert_eq!(feed.stats.active_broadcasters, 0);
    assert_eq!(feed.stats.top_category, "Unknown");
}

#[tokio::test]
async fn test_token_is_fetched_every_call() {
    let mut server = Server::new_async().await;

    let token = server
        .mock("POST", "/oauth2/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(token_body())
        .expect(2)
        .create_async()
        .await;
    let _streams = server
        .mock("GET", "/helix/streams")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server, &config());
    assert!(client.fetch_top_streams().await.is_some());
    assert!(client.fetch_top_streams().await.is_some());

    token.assert_async().await;
}

// =============================================================================
// Token Acquisition
// =============================================================================

#[tokio::test]
async fn test_get_access_token_success() {
    let mut server = Server::new_async().await;
    let mock = token_mock(&mut server, 200, &token_body()).await;

    let token = client_for(&server, &config())
        .get_access_token()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(token.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_token_403_is_auth_error_and_fetch_returns_none() {
    let mut server = Server::new_async().await;

    let _token = token_mock(
        &mut server,
        403,
        r#"{"status": 403, "message": "missing two factor"}"#,
    )
    .await;
    let streams = server
        .mock("GET", "/helix/streams")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, &config());

    let err = client.get_access_token().await.unwrap_err();
    assert!(matches!(err, FetchError::Auth(ref msg) if msg.contains("Two-factor")));

    assert!(client.fetch_top_streams().await.is_none());

    streams.assert_async().await;
}

#[tokio::test]
async fn test_token_server_error_is_none() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server, 500, r#"{"message": "oops"}"#).await;

    let client = client_for(&server, &config());
    assert_eq!(client.get_access_token().await.unwrap(), None);
    assert!(client.fetch_top_streams().await.is_none());
}

#[tokio::test]
async fn test_token_missing_from_body_is_none() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server, 200, r#"{"token_type": "bearer"}"#).await;

    let client = client_for(&server, &config());
    assert_eq!(client.get_access_token().await.unwrap(), None);

    match client.try_fetch_top_streams().await {
        Err(FetchError::Auth(msg)) => assert_eq!(msg, "Failed to get Twitch access token"),
        other => panic!("unexpected result: {other:?}"),
    }
}

// =============================================================================
// Failures Collapse to None
// =============================================================================

#[tokio::test]
async fn test_missing_credentials_returns_none_without_requests() {
    let mut server = Server::new_async().await;

    let token = server
        .mock("POST", "/oauth2/token")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let only_id = Config {
        twitch_client_id: Some(CLIENT_ID.into()),
        ..Config::default()
    };
    let only_secret = Config {
        twitch_client_secret: Some(CLIENT_SECRET.into()),
        ..Config::default()
    };

    for config in [only_id, only_secret, Config::default()] {
        let client = client_for(&server, &config);
        assert!(client.fetch_top_streams().await.is_none());
        assert!(matches!(
            client.try_fetch_top_streams().await,
            Err(FetchError::Configuration(_))
        ));
    }

    token.assert_async().await;
}

#[tokio::test]
async fn test_streams_unauthorized() {
    let mut server = Server::new_async().await;

    let _token = token_mock(&mut server, 200, &token_body()).await;
    let _streams = server
        .mock("GET", "/helix/streams")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "Unauthorized", "status": 401, "message": "Invalid OAuth token"}"#)
        .create_async()
        .await;

    let client = client_for(&server, &config());

    match client.try_fetch_top_streams().await {
        Err(FetchError::Http { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid OAuth token");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(client.fetch_top_streams().await.is_none());
}

#[tokio::test]
async fn test_streams_invalid_json_is_none() {
    let mut server = Server::new_async().await;

    let _token = token_mock(&mut server, 200, &token_body()).await;
    let _streams = server
        .mock("GET", "/helix/streams")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("garbage")
        .create_async()
        .await;

    let client = client_for(&server, &config());
    assert!(matches!(
        client.try_fetch_top_streams().await,
        Err(FetchError::Platform(_))
    ));
    assert!(client.fetch_top_streams().await.is_none());
}
