use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::comments::{CommentPage, CommentPageSource, MAX_PAGE_SIZE};
use crate::error::{AppError, Result};
use crate::models::ChannelStats;

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/";
const SERVICE: &str = "YouTube";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    channel_id: Option<String>,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    statistics: Option<Statistics>,
    snippet: Option<ChannelSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
    video_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the YouTube Data API v3.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YoutubeClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creator-pulse/1.0")
            .build()
            .expect("Failed to create HTTP client");

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = Url::parse(&self.base_url)?.join(path)?;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                service: SERVICE,
                status,
                message: error_message(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Look up a channel id by free-text name. `None` when the search has no hit.
    pub async fn search_channel_id(&self, name: &str) -> Result<Option<String>> {
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "id"),
                    ("type", "channel"),
                    ("q", name),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id)
            .and_then(|id| id.channel_id))
    }

    /// Most recent video uploaded to the channel, if any.
    pub async fn latest_video_id(&self, channel_id: &str) -> Result<Option<String>> {
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "id"),
                    ("channelId", channel_id),
                    ("order", "date"),
                    ("type", "video"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id)
            .and_then(|id| id.video_id))
    }

    pub async fn channel_stats(&self, channel_id: &str) -> Result<Option<ChannelStats>> {
        let response: ChannelListResponse = self
            .get_json("channels", &[("part", "statistics"), ("id", channel_id)])
            .await?;

        let Some(stats) = response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.statistics)
        else {
            return Ok(None);
        };

        let subscriber_count = if stats.hidden_subscriber_count {
            None
        } else {
            parse_count(stats.subscriber_count)
        };

        Ok(Some(ChannelStats {
            subscriber_count,
            view_count: parse_count(stats.view_count),
            video_count: parse_count(stats.video_count),
        }))
    }

    /// The channel's public display name.
    pub async fn channel_title(&self, channel_id: &str) -> Result<Option<String>> {
        let response: ChannelListResponse = self
            .get_json("channels", &[("part", "snippet"), ("id", channel_id)])
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .and_then(|snippet| snippet.title)
            .filter(|title| !title.trim().is_empty()))
    }
}

#[async_trait]
impl CommentPageSource for YoutubeClient {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: usize,
    ) -> Result<CommentPage> {
        let max_results = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("textFormat", "plainText"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: CommentThreadsResponse = self.get_json("commentThreads", &query).await?;

        let total = response.items.len();
        let comments: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<CommentThread>(item) {
                Ok(thread) => Some(thread.snippet.top_level_comment.snippet.text_display),
                Err(e) => {
                    tracing::debug!("Skipping malformed comment thread: {}", e);
                    None
                }
            })
            .collect();

        if comments.len() < total {
            tracing::warn!(
                "Skipped {} malformed comment threads for {}",
                total - comments.len(),
                video_id
            );
        }

        Ok(CommentPage {
            comments,
            next_page_token: response.next_page_token,
        })
    }
}

fn parse_count(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fetch_comments;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> YoutubeClient {
        YoutubeClient::with_base_url("test-key".to_string(), &server.url())
    }

    fn params(pairs: &[(&str, &str)]) -> Matcher {
        Matcher::AllOf(
            pairs
                .iter()
                .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn search_channel_returns_first_hit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(params(&[
                ("key", "test-key"),
                ("type", "channel"),
                ("q", "Mark Rober"),
                ("maxResults", "1"),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"id":{"kind":"youtube#channel","channelId":"UC123"}}]}"#)
            .create_async()
            .await;

        let id = client(&server).search_channel_id("Mark Rober").await.unwrap();

        assert_eq!(id.as_deref(), Some("UC123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn search_channel_without_items_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        let id = client(&server).search_channel_id("nobody").await.unwrap();

        assert!(id.is_none());
    }

    #[tokio::test]
    async fn latest_video_filters_to_videos() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(params(&[
                ("channelId", "UC123"),
                ("order", "date"),
                ("type", "video"),
                ("maxResults", "1"),
            ]))
            .with_status(200)
            .with_body(r#"{"items":[{"id":{"kind":"youtube#video","videoId":"vid42"}}]}"#)
            .create_async()
            .await;

        let id = client(&server).latest_video_id("UC123").await.unwrap();

        assert_eq!(id.as_deref(), Some("vid42"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn latest_video_missing_id_field_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items":[{"id":{"kind":"youtube#playlist"}}]}"#)
            .create_async()
            .await;

        let id = client(&server).latest_video_id("UC123").await.unwrap();

        assert!(id.is_none());
    }

    #[tokio::test]
    async fn http_error_is_transport_failure_with_api_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"quotaExceeded"}}"#)
            .create_async()
            .await;

        let err = client(&server).latest_video_id("UC123").await.unwrap_err();

        assert!(err.is_transport());
        match err {
            AppError::Api { status, message, .. } => {
                assert_eq!(status, 403);
                assert_eq!(message, "quotaExceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client(&server).search_channel_id("x").await.unwrap_err();

        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn channel_stats_parses_string_counts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(params(&[("part", "statistics"), ("id", "UC123")]))
            .with_status(200)
            .with_body(
                r#"{"items":[{"statistics":{
                    "viewCount":"1500000","subscriberCount":"25000",
                    "hiddenSubscriberCount":false,"videoCount":"310"}}]}"#,
            )
            .create_async()
            .await;

        let stats = client(&server).channel_stats("UC123").await.unwrap().unwrap();

        assert_eq!(
            stats,
            ChannelStats {
                subscriber_count: Some(25000),
                view_count: Some(1_500_000),
                video_count: Some(310),
            }
        );
    }

    #[tokio::test]
    async fn hidden_subscriber_count_becomes_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"items":[{"statistics":{"viewCount":"10","hiddenSubscriberCount":true,"videoCount":"1"}}]}"#,
            )
            .create_async()
            .await;

        let stats = client(&server).channel_stats("UC1").await.unwrap().unwrap();

        assert_eq!(stats.subscriber_count, None);
        assert_eq!(stats.view_count, Some(10));
    }

    #[tokio::test]
    async fn unknown_channel_has_no_stats_or_title() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind":"youtube#channelListResponse","pageInfo":{"totalResults":0}}"#)
            .expect(2)
            .create_async()
            .await;

        let yt = client(&server);
        assert!(yt.channel_stats("nope").await.unwrap().is_none());
        assert!(yt.channel_title("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn channel_title_from_snippet() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(params(&[("part", "snippet"), ("id", "UC123")]))
            .with_status(200)
            .with_body(r#"{"items":[{"snippet":{"title":"Science Channel"}}]}"#)
            .create_async()
            .await;

        let title = client(&server).channel_title("UC123").await.unwrap();

        assert_eq!(title.as_deref(), Some("Science Channel"));
    }

    #[tokio::test]
    async fn comment_page_skips_malformed_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/commentThreads")
            .match_query(params(&[
                ("videoId", "vid42"),
                ("textFormat", "plainText"),
                ("maxResults", "50"),
                ("pageToken", "abc"),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "nextPageToken": "def",
                    "items": [
                        {"snippet":{"topLevelComment":{"snippet":{"textDisplay":"First!"}}}},
                        {"snippet":{"totalReplyCount":0}},
                        42,
                        {"snippet":{"topLevelComment":{"snippet":{"textDisplay":"Great video"}}}}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let page = client(&server)
            .fetch_page("vid42", Some("abc"), 50)
            .await
            .unwrap();

        assert_eq!(page.comments, vec!["First!", "Great video"]);
        assert_eq!(page.next_page_token.as_deref(), Some("def"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn comment_page_failure_surfaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"commentsDisabled"}}"#)
            .create_async()
            .await;

        let err = fetch_comments(&client(&server), "vid42", 10)
            .await
            .unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn undecodable_comment_page_is_an_error_not_exhaustion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>Service Unavailable</body></html>")
            .create_async()
            .await;

        let err = fetch_comments(&client(&server), "vid42", 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Http(_)), "got {err:?}");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn fetch_comments_over_http_respects_cap() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/commentThreads")
            .match_query(params(&[("videoId", "vid42"), ("maxResults", "2")]))
            .with_status(200)
            .with_body(
                r#"{"nextPageToken":"more","items":[
                    {"snippet":{"topLevelComment":{"snippet":{"textDisplay":"a"}}}},
                    {"snippet":{"topLevelComment":{"snippet":{"textDisplay":"b"}}}},
                    {"snippet":{"topLevelComment":{"snippet":{"textDisplay":"c"}}}}
                ]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let comments = fetch_comments(&client(&server), "vid42", 2).await.unwrap();

        assert_eq!(comments, vec!["a", "b"]);
    }
}
