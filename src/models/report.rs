use chrono::{DateTime, Utc};

use super::{ChannelStats, NewsArticle, SentimentReport};
use crate::error::AppError;

/// State of one dashboard section after a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loaded(T),
    /// The source answered but had nothing to show
    NotFound(String),
    /// The source could not be reached or its answer was unreadable
    Failed(String),
    MissingCredential(&'static str),
}

impl<T> Panel<T> {
    /// Fold a lookup result into a panel, keeping "not found" apart from failures.
    pub fn from_lookup(result: Result<Option<T>, AppError>, not_found: &str) -> Self {
        match result {
            Ok(Some(value)) => Panel::Loaded(value),
            Ok(None) => Panel::NotFound(not_found.to_string()),
            Err(e) => Panel::from_error(e),
        }
    }

    pub fn from_error(err: AppError) -> Self {
        match err {
            AppError::MissingCredential(name) => Panel::MissingCredential(name),
            other if other.is_transport() => {
                tracing::warn!("Dashboard request failed: {}", other);
                Panel::Failed(other.to_string())
            }
            other => {
                tracing::error!("Dashboard lookup failed: {}", other);
                Panel::Failed(other.to_string())
            }
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Panel::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Message to show in place of the content, if any.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            Panel::Loaded(_) => None,
            Panel::NotFound(msg) => Some(msg.clone()),
            Panel::Failed(msg) => Some(format!("Request failed: {msg}")),
            Panel::MissingCredential(name) => Some(format!(
                "{name} is not configured. Add it to the config file or environment."
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatorReport {
    pub creator_name: String,
    pub channel_title: Option<String>,
    pub stats: Panel<ChannelStats>,
    pub news: Panel<Vec<NewsArticle>>,
    pub video_id: Option<String>,
    pub sentiment: Panel<SentimentReport>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_results_map_to_distinct_panels() {
        let loaded: Panel<u32> = Panel::from_lookup(Ok(Some(7)), "none");
        assert_eq!(loaded.loaded(), Some(&7));

        let missing: Panel<u32> = Panel::from_lookup(Ok(None), "No channel");
        assert_eq!(missing, Panel::NotFound("No channel".into()));

        let failed: Panel<u32> = Panel::from_lookup(
            Err(AppError::Api {
                service: "YouTube",
                status: 500,
                message: "boom".into(),
            }),
            "none",
        );
        assert!(matches!(failed, Panel::Failed(_)));

        let no_key: Panel<u32> =
            Panel::from_lookup(Err(AppError::MissingCredential("gnews_api_key")), "none");
        assert_eq!(no_key, Panel::MissingCredential("gnews_api_key"));
    }

    #[test]
    fn transport_and_local_errors_both_fail_the_panel() {
        let transport: Panel<u32> = Panel::from_error(AppError::Api {
            service: "GNews",
            status: 429,
            message: "quota".into(),
        });
        assert_eq!(
            transport,
            Panel::Failed("GNews API returned 429: quota".into())
        );

        let local: Panel<u32> = Panel::from_error(AppError::Config("bad url".into()));
        assert_eq!(local, Panel::Failed("configuration error: bad url".into()));
    }

    #[test]
    fn placeholders_only_for_unloaded_panels() {
        assert!(Panel::Loaded(1).placeholder().is_none());
        assert_eq!(
            Panel::<u32>::NotFound("Nothing here".into()).placeholder(),
            Some("Nothing here".to_string())
        );
        assert!(Panel::<u32>::MissingCredential("youtube_api_key")
            .placeholder()
            .unwrap()
            .starts_with("youtube_api_key"));
    }
}
