use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A platform post that mentions the bot handle. Transient; only the audit
/// logs keep any trace of it after a run.
#[derive(Deserialize, Clone, Debug)]
pub struct Mention {
    pub id: String,
    pub author_id: String,
    pub text: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ReplyRecord {
    pub tweet_id: String,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub reply: String,
}

impl ReplyRecord {
    pub fn new(mention: &Mention, reply: &str) -> Self {
        ReplyRecord {
            tweet_id: mention.id.clone(),
            user: mention.author_id.clone(),
            timestamp: Utc::now(),
            text: mention.text.clone(),
            reply: reply.to_string(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct RejectionRecord {
    pub tweet_id: String,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
    pub text: String,
}

impl RejectionRecord {
    pub fn new(mention: &Mention, reason: &str) -> Self {
        RejectionRecord {
            tweet_id: mention.id.clone(),
            user: mention.author_id.clone(),
            timestamp: Utc::now(),
            reason: reason.to_string(),
            text: mention.text.clone(),
        }
    }
}
