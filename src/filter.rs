//! Content filter for incoming mentions. Pure functions, no configuration.
//!
//! A mention is rejected when it contains a profanity word, is shorter than
//! five characters after trimming, or contains one of the hate keywords.
//! Checks run in that order and the first hit wins.

const MIN_MENTION_CHARS: usize = 5;

// Matched as whole words, case-insensitive.
const PROFANITY: &[&str] = &[
    "fuck", "fucking", "fucked", "motherfucker", "shit", "bullshit", "bitch",
    "asshole", "bastard", "dick", "cunt", "piss", "pissed", "whore", "slut",
    "cock", "fag", "faggot", "retard", "retarded",
];

// Matched as substrings, case-insensitive. Substring semantics are
// deliberate: "die" also flags "diet".
const HATE_KEYWORDS: &[&str] = &[
    "kill", "nazi", "bomb", "rape", "suicide", "die", "genocide", "shoot",
    "torture",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Profanity,
    TooShort,
    HateKeyword,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::Profanity => "Profanity",
            RejectReason::TooShort => "Too short",
            RejectReason::HateKeyword => "Hate keyword",
        }
    }
}

/// Returns the reason a mention should be rejected, or `None` when it is
/// clean enough to answer.
pub fn screen(text: &str) -> Option<RejectReason> {
    if contains_profanity(text) {
        return Some(RejectReason::Profanity);
    }
    if text.trim().chars().count() < MIN_MENTION_CHARS {
        return Some(RejectReason::TooShort);
    }
    let lowered = text.to_lowercase();
    if HATE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return Some(RejectReason::HateKeyword);
    }
    None
}

fn contains_profanity(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| !word.is_empty() && PROFANITY.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_text_shorter_than_five_chars() {
        assert_eq!(screen("hi"), Some(RejectReason::TooShort));
        assert_eq!(screen(""), Some(RejectReason::TooShort));
    }

    #[test]
    fn trims_before_checking_length() {
        assert_eq!(screen("   calm   "), Some(RejectReason::TooShort));
    }

    #[test]
    fn five_chars_is_long_enough() {
        assert_eq!(screen("peace"), None);
    }

    #[test]
    fn rejects_hate_keywords_case_insensitive() {
        assert_eq!(
            screen("you will all DIE mad about this"),
            Some(RejectReason::HateKeyword)
        );
        assert_eq!(
            screen("Genocide is never the answer"),
            Some(RejectReason::HateKeyword)
        );
    }

    #[test]
    fn hate_keywords_match_substrings() {
        // "die" inside "diet"
        assert_eq!(
            screen("thoughts on my new diet plan"),
            Some(RejectReason::HateKeyword)
        );
    }

    #[test]
    fn rejects_profanity_as_whole_words() {
        assert_eq!(
            screen("this is fucking great"),
            Some(RejectReason::Profanity)
        );
        // embedded matches do not count, only whole words
        assert_eq!(screen("greetings from Scunthorpe"), None);
    }

    #[test]
    fn profanity_is_checked_before_length() {
        assert_eq!(screen("shit"), Some(RejectReason::Profanity));
    }

    #[test]
    fn accepts_clean_questions() {
        assert_eq!(screen("How do I stay calm today?"), None);
        assert_eq!(screen("I need help finding some inner peace"), None);
    }
}
