//! Compile-time category tables.
//!
//! Keyword patterns and emote-name sets are frozen at compile time; the
//! regexes are compiled once at first use and shared as immutable globals.
//! There is no runtime registration.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use chatpeaks_models::Category;

/// Keyword patterns and emote names for one category.
pub struct CategoryTable {
    pub category: Category,
    keywords: Vec<Regex>,
    emotes: HashSet<&'static str>,
}

impl CategoryTable {
    fn new(category: Category, keywords: &[&str], emotes: &[&'static str]) -> Self {
        Self {
            category,
            keywords: keywords
                .iter()
                .map(|p| Regex::new(p).expect("category pattern is valid"))
                .collect(),
            emotes: emotes.iter().copied().collect(),
        }
    }

    /// First-hit keyword check; at most one match counts per category.
    pub fn matches_keyword(&self, text: &str) -> bool {
        self.keywords.iter().any(|re| re.is_match(text))
    }

    /// Exact-name emote membership check.
    pub fn contains_emote(&self, name: &str) -> bool {
        self.emotes.contains(name)
    }
}

/// The five category tables, in dominant-tag priority order.
pub static CATEGORY_TABLES: LazyLock<Vec<CategoryTable>> = LazyLock::new(|| {
    vec![
        CategoryTable::new(
            Category::Fun,
            &[
                r"(?i)\b(mdr+|ptdr+|lmao+|lmfao|rofl)\b",
                r"(?i)\blo+l\b",
                r"(?i)(a?ha){3,}h?",
                r"(?i)\bx+dd+\b",
                r"(?i)\b(kekw?|lul+w?)\b",
            ],
            &["KEKW", "LUL", "LULW", "OMEGALUL", "ICANT", "KEKHeim", "pepeLaugh"],
        ),
        CategoryTable::new(
            Category::Hype,
            &[
                r"(?i)\bpog(gers|champ|u)?\b",
                r"(?i)let'?s\s*go+",
                r"(?i)\binsane\b",
                r"(?i)\bomg+\b",
                r"(?i)\bwtf\b",
                r"(?i)holy\s+shit",
                r"(?i)\bno\s+way\b",
                r"(?i)\bclutch\b",
                r"(?i)\bhype+\b",
            ],
            &["PogChamp", "Pog", "POGGERS", "PogU", "HYPERS", "Clap", "EZ", "PagMan"],
        ),
        CategoryTable::new(Category::Ban, &[r"(?i)has been banned"], &[]),
        CategoryTable::new(Category::Sub, &[r"(?i)is gifting"], &[]),
        CategoryTable::new(
            Category::Donation,
            &[
                r"(?i)\bcheer\d+\b",
                r"(?i)\bbits?\b",
                r"(?i)\bdon(o|at(e|ion|ed))\b",
                r"(?i)(\d+\s?[€$£]|[€$£]\s?\d+)",
            ],
            &[],
        ),
    ]
});

/// Moderation event marker, matched as a case-insensitive substring.
pub static BAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)has been banned").expect("ban pattern is valid"));

/// Mass-gift event marker; captures the gifted sub count.
pub static GIFT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)is gifting (\d+)").expect("gift pattern is valid"));

#[cfg(test)]
mod tests {
    use super::*;

    fn table(category: Category) -> &'static CategoryTable {
        CATEGORY_TABLES
            .iter()
            .find(|t| t.category == category)
            .expect("all categories have tables")
    }

    #[test]
    fn test_tables_cover_all_categories_in_priority_order() {
        let order: Vec<Category> = CATEGORY_TABLES.iter().map(|t| t.category).collect();
        assert_eq!(order, Category::PRIORITY.to_vec());
    }

    #[test]
    fn test_fun_keywords() {
        let fun = table(Category::Fun);
        assert!(fun.matches_keyword("LMAO what was that"));
        assert!(fun.matches_keyword("hahahaha"));
        assert!(fun.matches_keyword("xDDDD"));
        assert!(fun.matches_keyword("mdrrr"));
        assert!(!fun.matches_keyword("nice play"));
    }

    #[test]
    fn test_hype_keywords() {
        let hype = table(Category::Hype);
        assert!(hype.matches_keyword("POGGERS"));
        assert!(hype.matches_keyword("lets gooooo"));
        assert!(hype.matches_keyword("let's go"));
        assert!(hype.matches_keyword("that was insane"));
        assert!(hype.matches_keyword("HOLY  SHIT"));
        assert!(!hype.matches_keyword("boring"));
    }

    #[test]
    fn test_privileged_patterns() {
        assert!(BAN_PATTERN.is_match("xXx Has Been Banned."));
        let caps = GIFT_PATTERN.captures("Foo is gifting 20 subs!").unwrap();
        assert_eq!(&caps[1], "20");
        assert!(GIFT_PATTERN.captures("no gifts here").is_none());
    }

    #[test]
    fn test_donation_keywords() {
        let donation = table(Category::Donation);
        assert!(donation.matches_keyword("cheer100"));
        assert!(donation.matches_keyword("thanks for the 500 bits"));
        assert!(donation.matches_keyword("just donated"));
        assert!(donation.matches_keyword("5€ for you"));
        assert!(donation.matches_keyword("$10 well spent"));
        assert!(!donation.matches_keyword("cheers mate"));
    }

    #[test]
    fn test_emote_membership() {
        assert!(table(Category::Fun).contains_emote("KEKW"));
        assert!(table(Category::Hype).contains_emote("PogChamp"));
        assert!(!table(Category::Fun).contains_emote("PogChamp"));
        assert!(!table(Category::Ban).contains_emote("KEKW"));
    }
}
