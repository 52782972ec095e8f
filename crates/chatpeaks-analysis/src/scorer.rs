//! Per-message reaction scoring.

use chatpeaks_models::{Category, ChatFragment, ChatMessage, MessageScore};

use crate::patterns::{BAN_PATTERN, CATEGORY_TABLES, GIFT_PATTERN};

/// Score awarded for a moderation (ban) event.
const BAN_SCORE: f64 = 15.0;

/// Minimum gifted-sub count for a mass-gift event to score.
const GIFT_MIN_COUNT: u32 = 15;

/// Per-gift weight and cap for the mass-gift bonus.
const GIFT_WEIGHT: f64 = 0.6;
const GIFT_BONUS_CAP: f64 = 20.0;

/// Score per recognized category emote.
const EMOTE_SCORE: f64 = 2.0;

/// Score per matched category keyword.
const KEYWORD_SCORE: f64 = 1.0;

/// Bonus for shouted (ALL-CAPS) messages.
const CAPS_BONUS: f64 = 0.5;

/// Classify one message into the reaction categories.
///
/// Pure and deterministic: same message, same score. Privileged
/// system-originated events (bans, mass gifts) are scored first so a burst
/// of ordinary chatter cannot dilute them; gifts below the qualifying count
/// gate the sub category off entirely for that message.
pub fn score_message(msg: &ChatMessage) -> MessageScore {
    let mut score = MessageScore::default();
    let text = &msg.text;

    // Privileged events
    if BAN_PATTERN.is_match(text) {
        score.reaction_score += BAN_SCORE;
        score.categories.add(Category::Ban, BAN_SCORE);
    }

    let mut sub_keywords_allowed = false;
    if let Some(caps) = GIFT_PATTERN.captures(text) {
        let gifted: u32 = caps[1].parse().unwrap_or(0);
        if gifted >= GIFT_MIN_COUNT {
            let bonus = ((gifted as f64) * GIFT_WEIGHT).round().min(GIFT_BONUS_CAP);
            score.reaction_score += bonus;
            score.categories.add(Category::Sub, bonus);
            sub_keywords_allowed = true;
        }
        // Small gifts award nothing and keep the sub keyword loop gated.
    }

    // Emote scoring: at most one category credit per fragment
    for fragment in &msg.fragments {
        let ChatFragment::Emote { name, .. } = fragment else {
            continue;
        };
        if let Some(table) = CATEGORY_TABLES.iter().find(|t| t.contains_emote(name)) {
            score.reaction_score += EMOTE_SCORE;
            score.emote_count += 1;
            score.categories.add(table.category, EMOTE_SCORE);
        }
    }

    // Keyword scoring: at most one hit per category
    for table in CATEGORY_TABLES.iter() {
        if table.category == Category::Sub && !sub_keywords_allowed {
            continue;
        }
        if table.matches_keyword(text) {
            score.reaction_score += KEYWORD_SCORE;
            score.categories.add(table.category, KEYWORD_SCORE);
        }
    }

    // Shouting bonus
    if is_all_caps(text) {
        score.reaction_score += CAPS_BONUS;
        score.categories.add(Category::Hype, CAPS_BONUS);
    }

    score
}

/// A shouted message: at least 5 chars, at least one ASCII letter, and equal
/// to its own uppercase form.
fn is_all_caps(text: &str) -> bool {
    text.chars().count() >= 5
        && text.chars().any(|c| c.is_ascii_alphabetic())
        && text == text.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatpeaks_models::ChatFragment;

    #[test]
    fn test_ban_event_scores_fifteen() {
        let msg = ChatMessage::plain(10, "", "xXx has been banned.");
        let score = score_message(&msg);
        // Privileged +15 plus the ban keyword hit
        assert_eq!(score.categories.ban, 16.0);
        assert!(score.reaction_score >= 15.0);
    }

    #[test]
    fn test_mass_gift_bonus_scales_and_caps() {
        // 20 gifts: round(20 * 0.6) = 12, plus the "is gifting" keyword
        let msg = ChatMessage::plain(10, "", "Foo is gifting 20 subs");
        let score = score_message(&msg);
        assert_eq!(score.categories.sub, 13.0);
        assert_eq!(score.reaction_score, 13.0);

        // 100 gifts: bonus caps at 20
        let msg = ChatMessage::plain(10, "", "Whale is gifting 100 subs");
        let score = score_message(&msg);
        assert_eq!(score.categories.sub, 21.0);
    }

    #[test]
    fn test_small_gift_awards_nothing() {
        let msg = ChatMessage::plain(10, "", "Bar is gifting 10 subs");
        let score = score_message(&msg);
        assert_eq!(score.categories.sub, 0.0);
        assert_eq!(score.reaction_score, 0.0);
    }

    #[test]
    fn test_sub_keyword_gated_without_gift_event() {
        // "is gifting" with no parsable count never reaches the sub keyword loop
        let msg = ChatMessage::plain(10, "", "he is gifting something");
        let score = score_message(&msg);
        assert_eq!(score.categories.sub, 0.0);
    }

    #[test]
    fn test_emote_scoring_one_credit_per_fragment() {
        let msg = ChatMessage::new(
            5,
            "viewer",
            vec![
                ChatFragment::emote("KEKW", "1"),
                ChatFragment::emote("PogChamp", "2"),
                ChatFragment::emote("NotARealEmote", "3"),
            ],
        );
        let score = score_message(&msg);
        assert_eq!(score.emote_count, 2);
        assert_eq!(score.categories.fun, 2.0);
        assert_eq!(score.categories.hype, 2.0);
        assert_eq!(score.reaction_score, 4.0);
    }

    #[test]
    fn test_emote_credit_stacks_with_keyword_hit() {
        let msg = ChatMessage::new(
            5,
            "viewer",
            vec![ChatFragment::text("KEKW "), ChatFragment::emote("KEKW", "1")],
        );
        let score = score_message(&msg);
        // +2 for the emote fragment, +1 for the fun keyword in the text
        assert_eq!(score.categories.fun, 3.0);
        assert_eq!(score.emote_count, 1);
    }

    #[test]
    fn test_keyword_single_hit_per_category() {
        let msg = ChatMessage::plain(5, "", "lmao rofl hahaha");
        let score = score_message(&msg);
        assert_eq!(score.categories.fun, 1.0);
        assert_eq!(score.reaction_score, 1.0);
    }

    #[test]
    fn test_all_caps_bonus() {
        let msg = ChatMessage::plain(5, "", "NO WAY THAT HAPPENED");
        let score = score_message(&msg);
        // "no way" hype keyword + caps bonus
        assert_eq!(score.categories.hype, 1.5);

        // Too short
        let msg = ChatMessage::plain(5, "", "WOW");
        assert_eq!(score_message(&msg).reaction_score, 0.0);

        // No letters
        let msg = ChatMessage::plain(5, "", "12345!!");
        assert_eq!(score_message(&msg).reaction_score, 0.0);

        // Mixed case misses the bonus
        let msg = ChatMessage::plain(5, "", "No way that happened");
        let score = score_message(&msg);
        assert_eq!(score.categories.hype, 1.0);
    }

    #[test]
    fn test_scorer_is_idempotent_and_non_negative() {
        let msg = ChatMessage::new(
            7,
            "viewer",
            vec![
                ChatFragment::text("POGGERS "),
                ChatFragment::emote("PogChamp", "1"),
                ChatFragment::text(" lets goooo"),
            ],
        );
        let first = score_message(&msg);
        let second = score_message(&msg);
        assert_eq!(first, second);
        assert!(first.reaction_score >= 0.0);
        assert!(first.categories.fun >= 0.0);
        assert!(first.categories.hype >= 0.0);
        assert!(first.categories.ban >= 0.0);
        assert!(first.categories.sub >= 0.0);
        assert!(first.categories.donation >= 0.0);
    }

    #[test]
    fn test_neutral_message_scores_zero() {
        let msg = ChatMessage::plain(5, "", "what game is this");
        let score = score_message(&msg);
        assert_eq!(score.reaction_score, 0.0);
        assert_eq!(score.emote_count, 0);
        assert!(score.categories.is_zero());
    }
}
