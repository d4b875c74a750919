mod article;
mod channel;
mod creator;
mod report;
mod sentiment;

pub use article::NewsArticle;
pub use channel::ChannelStats;
pub use creator::{CreatorRecord, CreatorUpdate};
pub use report::{CreatorReport, Panel};
pub use sentiment::{SentimentExamples, SentimentLabel, SentimentReport, SentimentSummary};
