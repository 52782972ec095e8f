//! Cursor walk over the comment feed.

use tracing::{debug, info};

use chatpeaks_models::ChatMessage;

use crate::client::{CommentSource, PagePosition};
use crate::error::{ChatError, ChatResult};

/// Options for a chat walk.
#[derive(Debug, Clone)]
pub struct IterateOptions {
    /// Maximum number of pages to fetch
    pub max_pages: u32,
    /// Offset to seed the first page with, in seconds
    pub start_offset_seconds: u32,
}

impl Default for IterateOptions {
    fn default() -> Self {
        Self {
            max_pages: 10_000,
            start_offset_seconds: 0,
        }
    }
}

/// What a completed (or budget-capped) walk observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationStats {
    /// Pages fetched, including a terminal empty page
    pub pages_processed: u32,
    /// Offset of the last message seen, in seconds
    pub last_offset_seconds: u32,
}

/// Walk the comment feed for a video, handing each non-empty page to
/// `on_batch` before the next fetch is issued.
///
/// The walk stops when the feed returns no continuation cursor, a page is
/// empty, or the page budget is reached. If `on_batch` returns
/// [`ChatError::Cancelled`] the walk stops immediately and the signal
/// propagates to the caller; no further pages are fetched.
pub async fn iterate_chat<S, F>(
    source: &S,
    video_id: &str,
    opts: IterateOptions,
    mut on_batch: F,
) -> ChatResult<IterationStats>
where
    S: CommentSource,
    F: FnMut(Vec<ChatMessage>) -> Result<(), ChatError>,
{
    let mut stats = IterationStats::default();
    let mut position = PagePosition::Offset(opts.start_offset_seconds);

    loop {
        let page = source.fetch_page(video_id, position).await?;
        stats.pages_processed += 1;

        if page.messages.is_empty() {
            debug!(video_id, pages = stats.pages_processed, "Empty page, stopping walk");
            break;
        }

        if let Some(last) = page.messages.last() {
            stats.last_offset_seconds = last.offset_seconds;
        }

        on_batch(page.messages)?;

        let Some(cursor) = page.next_cursor else {
            break;
        };

        if stats.pages_processed >= opts.max_pages {
            info!(
                video_id,
                pages = stats.pages_processed,
                "Page budget reached, stopping walk"
            );
            break;
        }

        position = PagePosition::Cursor(cursor);
    }

    Ok(stats)
}
