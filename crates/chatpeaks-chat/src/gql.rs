//! Persisted-query wire format for the comment feed.
//!
//! The feed is a GQL endpoint accepting a POST with an operation name,
//! variables (video id plus either a content offset or an opaque cursor),
//! and a persisted-query sha256 hash. The response is a JSON array whose
//! first element carries either an `errors` array or the comment connection.

use serde::{Deserialize, Serialize};

use chatpeaks_models::{ChatFragment, ChatMessage};

use crate::client::CommentPage;
use crate::error::{ChatError, ChatResult};

/// Operation name of the comment-replay persisted query.
pub const OPERATION_NAME: &str = "VideoCommentsByOffsetOrCursor";

/// sha256 hash registered for the persisted query.
pub const PERSISTED_QUERY_HASH: &str =
    "b70a3591ff0f4e0313d126c6a1502d79a1c02baebb288227c582044aa76adf6a";

// =============================================================================
// Request
// =============================================================================

#[derive(Debug, Serialize)]
pub struct GqlRequest {
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    pub variables: GqlVariables,
    pub extensions: GqlExtensions,
}

/// Query variables; exactly one of `cursor` / `content_offset_seconds` is set.
#[derive(Debug, Serialize)]
pub struct GqlVariables {
    #[serde(rename = "videoID")]
    pub video_id: String,
    #[serde(rename = "contentOffsetSeconds", skip_serializing_if = "Option::is_none")]
    pub content_offset_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GqlExtensions {
    #[serde(rename = "persistedQuery")]
    pub persisted_query: PersistedQuery,
}

#[derive(Debug, Serialize)]
pub struct PersistedQuery {
    pub version: u32,
    #[serde(rename = "sha256Hash")]
    pub sha256_hash: &'static str,
}

impl GqlRequest {
    /// Build a request for one page, keyed by cursor or starting offset.
    pub fn page(video_id: &str, cursor: Option<String>, offset_seconds: u32) -> Self {
        let content_offset_seconds = if cursor.is_none() {
            Some(offset_seconds)
        } else {
            None
        };
        Self {
            operation_name: OPERATION_NAME,
            variables: GqlVariables {
                video_id: video_id.to_string(),
                content_offset_seconds,
                cursor,
            },
            extensions: GqlExtensions {
                persisted_query: PersistedQuery {
                    version: 1,
                    sha256_hash: PERSISTED_QUERY_HASH,
                },
            },
        }
    }
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GqlResponse {
    #[serde(default)]
    pub errors: Option<Vec<GqlError>>,
    #[serde(default)]
    pub data: Option<GqlData>,
}

#[derive(Debug, Deserialize)]
pub struct GqlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GqlData {
    #[serde(default)]
    pub video: Option<GqlVideo>,
}

#[derive(Debug, Deserialize)]
pub struct GqlVideo {
    #[serde(default)]
    pub comments: Option<CommentConnection>,
}

#[derive(Debug, Deserialize)]
pub struct CommentConnection {
    #[serde(default)]
    pub edges: Vec<CommentEdge>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommentEdge {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: CommentNode,
}

#[derive(Debug, Deserialize)]
pub struct CommentNode {
    /// Offset of the comment; the feed may report a fractional second
    #[serde(rename = "contentOffsetSeconds", default)]
    pub content_offset_seconds: f64,
    #[serde(default)]
    pub commenter: Option<Commenter>,
    pub message: CommentBody,
}

#[derive(Debug, Deserialize)]
pub struct Commenter {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub fragments: Vec<GqlFragment>,
}

#[derive(Debug, Deserialize)]
pub struct GqlFragment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub emote: Option<GqlEmote>,
}

#[derive(Debug, Deserialize)]
pub struct GqlEmote {
    #[serde(rename = "emoteID", default)]
    pub emote_id: Option<String>,
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the raw response array into a comment page.
///
/// A non-empty `errors` array is a feed-level failure. An empty edge list
/// decodes to an empty page with no cursor; `hasNextPage == false` clears
/// the cursor even when edges carry one.
pub fn decode_page(responses: Vec<GqlResponse>) -> ChatResult<CommentPage> {
    let first = responses
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::Decode("empty response array".to_string()))?;

    if let Some(errors) = first.errors {
        if !errors.is_empty() {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ChatError::Feed(message));
        }
    }

    let comments = first
        .data
        .and_then(|d| d.video)
        .and_then(|v| v.comments)
        .ok_or_else(|| ChatError::Decode("response carried no comment connection".to_string()))?;

    let has_next_page = comments.page_info.has_next_page;
    let mut next_cursor = None;
    let mut messages = Vec::with_capacity(comments.edges.len());

    for edge in comments.edges {
        if has_next_page {
            if let Some(cursor) = edge.cursor {
                next_cursor = Some(cursor);
            }
        }

        let node = edge.node;
        let offset_seconds = node.content_offset_seconds.max(0.0) as u32;
        let commenter = node
            .commenter
            .and_then(|c| c.display_name)
            .unwrap_or_default();
        let fragments = node
            .message
            .fragments
            .into_iter()
            .map(|f| match f.emote.and_then(|e| e.emote_id) {
                Some(id) => ChatFragment::Emote { name: f.text, id },
                None => ChatFragment::Text { text: f.text },
            })
            .collect();

        messages.push(ChatMessage::new(offset_seconds, commenter, fragments));
    }

    if messages.is_empty() {
        next_cursor = None;
    }

    Ok(CommentPage {
        messages,
        next_cursor,
    })
}
