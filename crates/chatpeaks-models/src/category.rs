//! Reaction categories and per-category score vectors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reaction category for a chat message or a surfaced moment.
///
/// Closed set: every score vector carries all five entries, and moments are
/// tagged with exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Laughter and comedic reactions
    Fun,
    /// Excitement and hype spikes
    Hype,
    /// Moderation events (user bans)
    Ban,
    /// Mass-gift sub events
    Sub,
    /// Tips, bits, and donation chatter
    Donation,
}

impl Category {
    /// All categories in dominant-tag priority order.
    ///
    /// When two categories tie on score, the earlier entry wins.
    pub const PRIORITY: [Category; 5] = [
        Category::Fun,
        Category::Hype,
        Category::Ban,
        Category::Sub,
        Category::Donation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fun => "fun",
            Category::Hype => "hype",
            Category::Ban => "ban",
            Category::Sub => "sub",
            Category::Donation => "donation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score vector over the five reaction categories.
///
/// Scores are additive and never decremented; absent activity is a zero
/// entry, not a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CategoryScores {
    pub fun: f64,
    pub hype: f64,
    pub ban: f64,
    pub sub: f64,
    pub donation: f64,
}

impl CategoryScores {
    /// Get the score for a category.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Fun => self.fun,
            Category::Hype => self.hype,
            Category::Ban => self.ban,
            Category::Sub => self.sub,
            Category::Donation => self.donation,
        }
    }

    /// Add to a category's score.
    pub fn add(&mut self, category: Category, amount: f64) {
        let slot = match category {
            Category::Fun => &mut self.fun,
            Category::Hype => &mut self.hype,
            Category::Ban => &mut self.ban,
            Category::Sub => &mut self.sub,
            Category::Donation => &mut self.donation,
        };
        *slot += amount;
    }

    /// Accumulate another score vector into this one.
    pub fn merge(&mut self, other: &CategoryScores) {
        self.fun += other.fun;
        self.hype += other.hype;
        self.ban += other.ban;
        self.sub += other.sub;
        self.donation += other.donation;
    }

    /// Resolve the dominant category.
    ///
    /// Highest score wins; ties break by [`Category::PRIORITY`] order. An
    /// all-zero vector defaults to [`Category::Hype`].
    pub fn dominant(&self) -> Category {
        let mut best = Category::Hype;
        let mut best_score = 0.0;
        for category in Category::PRIORITY {
            let score = self.get(category);
            if score > best_score {
                best = category;
                best_score = score;
            }
        }
        best
    }

    /// True when every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.fun == 0.0 && self.hype == 0.0 && self.ban == 0.0 && self.sub == 0.0 && self.donation == 0.0
    }
}
