mod comments;
mod news;
mod youtube;

pub use comments::fetch_comments;
pub use news::NewsClient;
pub use youtube::YoutubeClient;
