// src/providers/tests/twitter_tests.rs

use super::super::twitter::{max_mention_id, Twitter};
use crate::models::Mention;

fn mention(id: &str) -> Mention {
    Mention {
        id: id.to_string(),
        author_id: "42".to_string(),
        text: "How do I stay calm today?".to_string(),
    }
}

#[test]
fn watermark_is_batch_maximum() {
    let batch = vec![mention("5"), mention("9"), mention("7")];
    assert_eq!(max_mention_id(&batch), Some("9".to_string()));
}

#[test]
fn watermark_compares_numerically() {
    // Lexicographic comparison would pick "99"
    let batch = vec![mention("99"), mention("100")];
    assert_eq!(max_mention_id(&batch), Some("100".to_string()));
}

#[test]
fn empty_batch_has_no_watermark() {
    assert_eq!(max_mention_id(&[]), None);
}

#[test]
fn search_query_scopes_to_handle_and_excludes_retweets() {
    assert_eq!(
        Twitter::search_query("intentionbot"),
        "@intentionbot -is:retweet"
    );
}

#[test]
fn mention_deserializes_from_search_payload() {
    // conversation_id is requested but not modeled; serde ignores it
    let raw = r#"{
        "id": "1861",
        "author_id": "42",
        "text": "@intentionbot how do I let go of worry?",
        "conversation_id": "1860"
    }"#;

    let parsed: Mention = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.id, "1861");
    assert_eq!(parsed.author_id, "42");
    assert_eq!(parsed.text, "@intentionbot how do I let go of worry?");
}
