use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article mentioning a creator, normalized from the news search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
}

impl NewsArticle {
    /// `published_at` as a timestamp, when the source sent RFC 3339.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn published_label(&self) -> String {
        self.published()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| self.published_at.clone())
    }
}
