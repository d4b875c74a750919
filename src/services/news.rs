use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::NewsArticle;

const GNEWS_API_URL: &str = "https://gnews.io/api/v4/";
const SERVICE: &str = "GNews";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GnewsArticle {
    title: String,
    description: Option<String>,
    url: String,
    source: GnewsSource,
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct GnewsSource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

impl From<GnewsArticle> for NewsArticle {
    fn from(article: GnewsArticle) -> Self {
        NewsArticle {
            title: article.title,
            description: article.description.unwrap_or_default(),
            url: article.url,
            source: article.source.name,
            published_at: article.published_at,
        }
    }
}

/// Combine search terms into one query: each non-empty term quoted, joined with OR.
///
/// Embedded double quotes are dropped and repeated terms (ignoring case) are
/// collapsed. Returns `None` when no usable term is left.
pub fn build_query<S: AsRef<str>>(terms: &[S]) -> Option<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut quoted: Vec<String> = Vec::new();

    for term in terms {
        let cleaned = term.as_ref().replace('"', "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }
        let folded = cleaned.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        quoted.push(format!("\"{cleaned}\""));
    }

    if quoted.is_empty() {
        None
    } else {
        Some(quoted.join(" OR "))
    }
}

/// Client for the GNews search endpoint.
pub struct NewsClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
    max_results: u32,
}

impl NewsClient {
    pub fn new(api_key: String, language: &str, max_results: u32) -> Self {
        Self::with_base_url(api_key, GNEWS_API_URL, language, max_results)
    }

    pub fn with_base_url(api_key: String, base_url: &str, language: &str, max_results: u32) -> Self {
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
            language: language.to_string(),
            max_results,
        }
    }

    /// Recent articles mentioning any of `terms`. An empty list means no coverage.
    pub async fn fetch_mentions<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<NewsArticle>> {
        let Some(query) = build_query(terms) else {
            tracing::debug!("No search terms given, skipping news lookup");
            return Ok(Vec::new());
        };

        let url = Url::parse(&self.base_url)?.join("search")?;
        let max = self.max_results.to_string();
        tracing::debug!("Searching news for {}", query);

        let response = self
            .client
            .get(url)
            .query(&[
                ("q", query.as_str()),
                ("lang", self.language.as_str()),
                ("max", max.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .filter(|e| !e.errors.is_empty())
                .map(|e| e.errors.join("; "))
                .unwrap_or_else(|| body.trim().to_string());
            return Err(AppError::Api {
                service: SERVICE,
                status,
                message,
            });
        }

        let search: SearchResponse = response.json().await?;

        let articles: Vec<NewsArticle> = search
            .articles
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<GnewsArticle>(raw) {
                Ok(article) => Some(article.into()),
                Err(e) => {
                    tracing::warn!("Skipping malformed news article: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Found {} news articles", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> NewsClient {
        NewsClient::with_base_url("news-token".to_string(), &server.url(), "en", 10)
    }

    #[test]
    fn query_quotes_each_term_and_ors_them() {
        assert_eq!(
            build_query(&["Mark Rober", "Mark Rober Science"]).as_deref(),
            Some("\"Mark Rober\" OR \"Mark Rober Science\"")
        );
    }

    #[test]
    fn query_skips_blank_and_duplicate_terms() {
        assert_eq!(
            build_query(&["  Alice ", "", "   ", "alice"]).as_deref(),
            Some("\"Alice\"")
        );
    }

    #[test]
    fn query_strips_embedded_quotes() {
        assert_eq!(
            build_query(&["The \"Real\" Bob"]).as_deref(),
            Some("\"The Real Bob\"")
        );
    }

    #[test]
    fn query_with_no_usable_terms_is_none() {
        let empty: [&str; 0] = [];
        assert_eq!(build_query(&empty), None);
        assert_eq!(build_query(&["", "\"\""]), None);
    }

    #[tokio::test]
    async fn fetch_sends_query_and_normalizes_articles() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "\"Alice\" OR \"Alice Makes\"".into()),
                Matcher::UrlEncoded("lang".into(), "en".into()),
                Matcher::UrlEncoded("max".into(), "10".into()),
                Matcher::UrlEncoded("token".into(), "news-token".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"totalArticles":2,"articles":[
                    {"title":"Alice hits 1M","description":"Milestone reached","content":"...",
                     "url":"https://news.example/1","image":null,"publishedAt":"2024-05-01T10:00:00Z",
                     "source":{"name":"Example News","url":"https://news.example"}},
                    {"title":"Interview","description":null,"url":"https://news.example/2",
                     "publishedAt":"2024-04-30T08:00:00Z","source":{"name":"Daily"}}
                ]}"#,
            )
            .create_async()
            .await;

        let articles = client(&server)
            .fetch_mentions(&["Alice", "Alice Makes"])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Alice hits 1M");
        assert_eq!(articles[0].source, "Example News");
        assert_eq!(articles[0].published_at, "2024-05-01T10:00:00Z");
        assert_eq!(articles[1].description, "");
    }

    #[tokio::test]
    async fn malformed_articles_are_skipped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"articles":[
                    {"title":"No url","source":{"name":"X"},"publishedAt":"2024-01-01T00:00:00Z"},
                    {"title":"Ok","url":"https://a/b","source":{"name":"Y"},"publishedAt":"2024-01-01T00:00:00Z"}
                ]}"#,
            )
            .create_async()
            .await;

        let articles = client(&server).fetch_mentions(&["Bob"]).await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Ok");
    }

    #[tokio::test]
    async fn no_articles_is_an_empty_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"totalArticles":0,"articles":[]}"#)
            .create_async()
            .await;

        let articles = client(&server).fetch_mentions(&["Nobody"]).await.unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn rejected_request_is_a_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"errors":["You did not provide an API key."]}"#)
            .create_async()
            .await;

        let err = client(&server).fetch_mentions(&["Bob"]).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "GNews API returned 401: You did not provide an API key."
        );
    }

    #[tokio::test]
    async fn blank_terms_make_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let articles = client(&server).fetch_mentions(&["", "  "]).await.unwrap();

        assert!(articles.is_empty());
        mock.assert_async().await;
    }
}
