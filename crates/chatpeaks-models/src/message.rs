//! Chat message models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::CategoryScores;

/// One span of a chat message.
///
/// Emote recognition is boolean at this level: the fragment either names a
/// known emote or is ordinary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatFragment {
    /// Plain text span
    Text { text: String },
    /// Recognized emote with its feed-assigned id
    Emote { name: String, id: String },
}

impl ChatFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn emote(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Emote {
            name: name.into(),
            id: id.into(),
        }
    }

    /// The rendered text of the fragment (an emote renders as its name).
    pub fn as_text(&self) -> &str {
        match self {
            ChatFragment::Text { text } => text,
            ChatFragment::Emote { name, .. } => name,
        }
    }
}

/// A single replay-chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatMessage {
    /// Offset from video start, in whole seconds
    pub offset_seconds: u32,

    /// Commenter display name; empty when the feed omits it
    #[serde(default)]
    pub commenter: String,

    /// Ordered message fragments
    pub fragments: Vec<ChatFragment>,

    /// Concatenated fragment texts
    pub text: String,
}

impl ChatMessage {
    /// Build a message from fragments, deriving the concatenated text.
    pub fn new(offset_seconds: u32, commenter: impl Into<String>, fragments: Vec<ChatFragment>) -> Self {
        let text = fragments.iter().map(ChatFragment::as_text).collect::<String>();
        Self {
            offset_seconds,
            commenter: commenter.into(),
            fragments,
            text,
        }
    }

    /// Convenience constructor for a plain-text message.
    pub fn plain(offset_seconds: u32, commenter: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            offset_seconds,
            commenter: commenter.into(),
            fragments: vec![ChatFragment::Text { text: text.clone() }],
            text,
        }
    }
}

/// Score derived from a single message by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MessageScore {
    /// Aggregate reaction score, >= 0
    pub reaction_score: f64,
    /// Number of fragments credited as category emotes
    pub emote_count: u32,
    /// Per-category breakdown
    pub categories: CategoryScores,
}
