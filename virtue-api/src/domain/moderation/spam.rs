//! Heuristic spam classification.

use std::sync::LazyLock;

use regex::Regex;

use super::types::SpamVerdict;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url pattern"));

/// Promotional phrases that mark a submission as spam, matched
/// case-insensitively as substrings.
const SPAM_PHRASES: &[&str] = &[
    "buy now",
    "click here",
    "make money",
    "free money",
    "get rich",
    "viagra",
    "casino",
    "lottery",
    "winner",
    "congratulations you",
];

struct SpamRule {
    reason: &'static str,
    check: fn(&str) -> bool,
}

/// The rules in evaluation order. First match wins, which makes the reported
/// reason deterministic when several heuristics would fire on the same text.
const RULES: &[SpamRule] = &[
    SpamRule {
        reason: "Too many links",
        check: too_many_links,
    },
    SpamRule {
        reason: "Excessive capitalization",
        check: excessive_caps,
    },
    SpamRule {
        reason: "Repeated characters",
        check: repeated_characters,
    },
    SpamRule {
        reason: "Contains spam keywords",
        check: spam_keywords,
    },
];

fn too_many_links(text: &str) -> bool {
    URL_PATTERN.find_iter(text).count() > 3
}

fn excessive_caps(text: &str) -> bool {
    let total = text.chars().count();
    if total <= 20 {
        return false;
    }
    let caps = text.chars().filter(char::is_ascii_uppercase).count();
    caps as f64 / total as f64 > 0.7
}

fn repeated_characters(text: &str) -> bool {
    let mut run = 0usize;
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= 11 {
                return true;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }
    false
}

fn spam_keywords(text: &str) -> bool {
    let lower = text.to_lowercase();
    SPAM_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Pattern-based spam classifier. Pure and synchronous, no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpamDetector;

impl SpamDetector {
    pub fn new() -> Self {
        Self
    }

    /// Classify `text`, short-circuiting on the first matching rule.
    pub fn classify(&self, text: &str) -> SpamVerdict {
        for rule in RULES {
            if (rule.check)(text) {
                return SpamVerdict::spam(rule.reason);
            }
        }
        SpamVerdict::clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_too_many_links() {
        let detector = SpamDetector::new();
        let verdict =
            detector.classify("Check this out http://a.co http://b.co http://c.co http://d.co");
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, Some("Too many links"));
    }

    #[test]
    fn three_links_are_fine() {
        let detector = SpamDetector::new();
        let verdict = detector.classify("see http://a.co http://b.co https://c.co");
        assert!(!verdict.is_spam);
    }

    #[test]
    fn flags_excessive_capitalization() {
        let detector = SpamDetector::new();
        let verdict = detector.classify("THIS IS VERY IMPORTANT NEWS FOR EVERYONE");
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, Some("Excessive capitalization"));
    }

    #[test]
    fn short_shouting_is_tolerated() {
        let detector = SpamDetector::new();
        // 20 characters or fewer never trips the caps rule.
        assert!(!detector.classify("AMEN TO THAT").is_spam);
    }

    #[test]
    fn flags_repeated_characters() {
        let detector = SpamDetector::new();
        let verdict = detector.classify("aaaaaaaaaaaaaa");
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, Some("Repeated characters"));
    }

    #[test]
    fn ten_repeats_pass() {
        let detector = SpamDetector::new();
        assert!(!detector.classify("aaaaaaaaaa").is_spam);
    }

    #[test]
    fn flags_spam_keywords() {
        let detector = SpamDetector::new();
        let verdict = detector.classify("You are todays lucky lottery participant");
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, Some("Contains spam keywords"));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let detector = SpamDetector::new();
        assert!(detector.classify("Limited offer, Buy Now while stock lasts").is_spam);
    }

    #[test]
    fn first_matching_rule_reports_its_reason() {
        let detector = SpamDetector::new();
        // Both the caps rule and the keyword rule fire; the caps rule is
        // evaluated first.
        let verdict = detector.classify("BUY NOW BUY NOW BUY NOW BUY NOW BUY NOW");
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, Some("Excessive capitalization"));
    }

    #[test]
    fn passes_ordinary_text() {
        let detector = SpamDetector::new();
        let verdict = detector.classify("I am grateful for this community today.");
        assert!(!verdict.is_spam);
        assert_eq!(verdict.reason, None);
    }
}
