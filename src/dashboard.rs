use std::fmt::Write as _;

use chrono::Utc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CreatorRecord, CreatorReport, NewsArticle, Panel, SentimentLabel, SentimentReport,
};
use crate::sentiment::{summarize, LexiconScorer};
use crate::services::{fetch_comments, NewsClient, YoutubeClient};

const NO_STATS: &str = "Could not fetch channel statistics.";
const NO_NEWS: &str = "No recent news mentions found.";
const NO_VIDEO: &str = "Could not find the latest video for this channel.";
const NO_COMMENTS: &str = "No comments found on the latest video.";

const WRAP_WIDTH: usize = 76;

/// Runs the lookups behind one creator's dashboard view.
pub struct Dashboard {
    youtube: Option<YoutubeClient>,
    news: Option<NewsClient>,
    scorer: LexiconScorer,
    comment_cap: usize,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        let youtube = config
            .youtube_key()
            .ok()
            .map(|key| YoutubeClient::new(key.to_string()));

        let news = config.gnews_key().ok().map(|key| {
            NewsClient::new(
                key.to_string(),
                &config.news_language,
                config.news_max_results,
            )
        });

        Self::from_parts(youtube, news, config.comment_cap)
    }

    pub fn from_parts(
        youtube: Option<YoutubeClient>,
        news: Option<NewsClient>,
        comment_cap: usize,
    ) -> Self {
        Self {
            youtube,
            news,
            scorer: LexiconScorer::new(),
            comment_cap,
        }
    }

    fn youtube(&self) -> Result<&YoutubeClient> {
        self.youtube
            .as_ref()
            .ok_or(AppError::MissingCredential("youtube_api_key"))
    }

    fn news(&self) -> Result<&NewsClient> {
        self.news
            .as_ref()
            .ok_or(AppError::MissingCredential("gnews_api_key"))
    }

    /// Find a channel id for a creator added without one.
    pub async fn resolve_channel_id(&self, name: &str) -> Result<Option<String>> {
        self.youtube()?.search_channel_id(name).await
    }

    /// Load every section for `creator`, one request after another.
    ///
    /// A failing section is reported in its panel and does not stop the others.
    pub async fn build_report(&self, creator: &CreatorRecord) -> CreatorReport {
        tracing::debug!("Building report for {}", creator.name);

        let stats = match self.youtube() {
            Ok(yt) => Panel::from_lookup(yt.channel_stats(&creator.channel_id).await, NO_STATS),
            Err(e) => Panel::from_error(e),
        };

        let channel_title = match self.youtube() {
            Ok(yt) => match yt.channel_title(&creator.channel_id).await {
                Ok(title) => title,
                Err(e) => {
                    tracing::warn!("Could not fetch channel title for {}: {}", creator.name, e);
                    None
                }
            },
            Err(_) => None,
        };

        let news = self
            .load_news(&creator.name, channel_title.as_deref())
            .await;
        let (video_id, sentiment) = self.load_sentiment(&creator.channel_id).await;

        CreatorReport {
            creator_name: creator.name.clone(),
            channel_title,
            stats,
            news,
            video_id,
            sentiment,
            generated_at: Utc::now(),
        }
    }

    async fn load_news(&self, name: &str, channel_title: Option<&str>) -> Panel<Vec<NewsArticle>> {
        let client = match self.news() {
            Ok(client) => client,
            Err(e) => return Panel::from_error(e),
        };

        let terms = [name, channel_title.unwrap_or(name)];
        match client.fetch_mentions(&terms).await {
            Ok(articles) if articles.is_empty() => Panel::NotFound(NO_NEWS.to_string()),
            Ok(articles) => Panel::Loaded(articles),
            Err(e) => Panel::from_error(e),
        }
    }

    async fn load_sentiment(&self, channel_id: &str) -> (Option<String>, Panel<SentimentReport>) {
        let yt = match self.youtube() {
            Ok(yt) => yt,
            Err(e) => return (None, Panel::from_error(e)),
        };

        let video_id = match yt.latest_video_id(channel_id).await {
            Ok(Some(id)) => id,
            Ok(None) => return (None, Panel::NotFound(NO_VIDEO.to_string())),
            Err(e) => return (None, Panel::from_error(e)),
        };

        let comments = match fetch_comments(yt, &video_id, self.comment_cap).await {
            Ok(comments) => comments,
            Err(e) => return (Some(video_id), Panel::from_error(e)),
        };

        if comments.is_empty() {
            return (Some(video_id), Panel::NotFound(NO_COMMENTS.to_string()));
        }

        let report = summarize(&self.scorer, &comments).unwrap_or_else(|never| match never {});
        (Some(video_id), Panel::Loaded(report))
    }
}

/// Plain-text rendering of a report, used by the headless `--report` command.
pub fn render_text(report: &CreatorReport) -> String {
    let mut out = String::new();
    let heading = match &report.channel_title {
        Some(title) if title != &report.creator_name => {
            format!("{} ({})", report.creator_name, title)
        }
        _ => report.creator_name.clone(),
    };
    let _ = writeln!(out, "== {heading} ==");

    let _ = writeln!(out, "\nChannel Stats");
    match &report.stats {
        Panel::Loaded(stats) => {
            let _ = writeln!(out, "  Subscribers:  {}", stats.subscribers_label());
            let _ = writeln!(out, "  Total Views:  {}", stats.views_label());
            let _ = writeln!(out, "  Total Videos: {}", stats.videos_label());
        }
        other => push_placeholder(&mut out, other.placeholder()),
    }

    let _ = writeln!(out, "\nComment Sentiment");
    if let Some(video_id) = &report.video_id {
        let _ = writeln!(out, "  Latest video: {video_id}");
    }
    match &report.sentiment {
        Panel::Loaded(sentiment) => {
            let _ = writeln!(out, "  Based on {} comments", sentiment.total);
            for label in SentimentLabel::ALL {
                let _ = writeln!(
                    out,
                    "  {:<9} {:>5.1}%",
                    label.label(),
                    sentiment.summary.get(label)
                );
            }
            for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
                let examples = sentiment.examples.get(label);
                if examples.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "  Example {} comments:", label.label().to_lowercase());
                let options = textwrap::Options::new(WRAP_WIDTH)
                    .initial_indent("    - ")
                    .subsequent_indent("      ");
                for example in examples {
                    for line in textwrap::wrap(example, &options) {
                        let _ = writeln!(out, "{line}");
                    }
                }
            }
        }
        other => push_placeholder(&mut out, other.placeholder()),
    }

    let _ = writeln!(out, "\nNews Mentions");
    match &report.news {
        Panel::Loaded(articles) => {
            for article in articles {
                let _ = writeln!(out, "  * {}", article.title);
                let _ = writeln!(
                    out,
                    "    {} - {}",
                    article.source,
                    article.published_label()
                );
                if !article.description.is_empty() {
                    let options = textwrap::Options::new(WRAP_WIDTH)
                        .initial_indent("    ")
                        .subsequent_indent("    ");
                    for line in textwrap::wrap(&article.description, &options) {
                        let _ = writeln!(out, "{line}");
                    }
                }
                let _ = writeln!(out, "    {}", article.url);
            }
        }
        other => push_placeholder(&mut out, other.placeholder()),
    }

    out
}

fn push_placeholder(out: &mut String, message: Option<String>) {
    if let Some(message) = message {
        let _ = writeln!(out, "  {message}");
    }
}
