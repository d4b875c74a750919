use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;

/// Largest page the comment source hands out per request.
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of top-level comment texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<String>,
    /// Absent when the source has no more data
    pub next_page_token: Option<String>,
}

/// A paged comment source keyed by resource (video) id.
#[async_trait]
pub trait CommentPageSource: Send + Sync {
    async fn fetch_page(
        &self,
        resource_id: &str,
        page_token: Option<&str>,
        page_size: usize,
    ) -> Result<CommentPage>;
}

/// Collect up to `cap` comments, following continuation tokens page by page.
///
/// Stops when `cap` is reached (trimming the last page) or when the source stops
/// returning a token. A failed page request ends the fetch with that error.
pub async fn fetch_comments<S>(source: &S, resource_id: &str, cap: usize) -> Result<Vec<String>>
where
    S: CommentPageSource + ?Sized,
{
    let mut comments: Vec<String> = Vec::new();
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut page_token: Option<String> = None;
    let mut requests = 0usize;

    while comments.len() < cap {
        let remaining = cap - comments.len();
        let page = source
            .fetch_page(
                resource_id,
                page_token.as_deref(),
                remaining.min(MAX_PAGE_SIZE),
            )
            .await?;
        requests += 1;

        let take = page.comments.len().min(remaining);
        comments.extend(page.comments.into_iter().take(take));

        if comments.len() >= cap {
            break;
        }

        match page.next_page_token.filter(|t| !t.is_empty()) {
            None => break,
            Some(token) => {
                if !seen_tokens.insert(token.clone()) {
                    tracing::warn!(
                        "Comment source for {} repeated page token {}, stopping",
                        resource_id,
                        token
                    );
                    break;
                }
                page_token = Some(token);
            }
        }
    }

    tracing::debug!(
        "Fetched {} comments for {} in {} requests",
        comments.len(),
        resource_id,
        requests
    );

    Ok(comments)
}
