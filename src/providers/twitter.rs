use anyhow::Result;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::models::Mention;

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
const POST_URL: &str = "https://api.twitter.com/2/tweets";
const MAX_SEARCH_RESULTS: u32 = 10;
const AGENT_NAME: &str = "IntentionBot";

/// The platform the bot reads mentions from and publishes replies to.
#[allow(async_fn_in_trait)]
pub trait MentionSource {
    async fn fetch_mentions(&self, since_id: Option<&str>) -> Result<Vec<Mention>>;
    async fn post_reply(&self, tweet_id: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Mention>,
}

pub struct Twitter {
    bearer_token: String,
    bot_handle: String,
    client: reqwest::Client,
}

impl Twitter {
    pub fn new(bearer_token: &str, bot_handle: &str) -> Self {
        Twitter {
            bearer_token: bearer_token.to_string(),
            bot_handle: bot_handle.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn search_query(handle: &str) -> String {
        format!("@{} -is:retweet", handle)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT_NAME));
        Ok(headers)
    }
}

impl MentionSource for Twitter {
    /// Searches recent posts mentioning the bot handle, bounded below by
    /// `since_id` when present. Rate limits and API errors yield an empty
    /// batch rather than an error; only transport failures propagate.
    async fn fetch_mentions(&self, since_id: Option<&str>) -> Result<Vec<Mention>> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", Self::search_query(&self.bot_handle)),
            ("tweet.fields", "author_id,conversation_id".to_string()),
            ("max_results", MAX_SEARCH_RESULTS.to_string()),
        ];
        if let Some(id) = since_id {
            params.push(("since_id", id.to_string()));
        }

        debug!("requesting mentions since {:?}", since_id);
        let response = self
            .client
            .get(SEARCH_URL)
            .headers(self.headers()?)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("rate limit hit on mention search, returning empty batch");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("mention search failed with status {}: {}", status, body);
            return Ok(Vec::new());
        }

        if let Some(remaining) = response.headers().get("x-rate-limit-remaining") {
            debug!("rate limit remaining: {:?}", remaining);
        }

        let body = response.text().await?;
        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => Ok(parsed.data),
            Err(e) => {
                error!("failed to parse search response: {}", e);
                debug!("raw search response: {}", body);
                Ok(Vec::new())
            }
        }
    }

    async fn post_reply(&self, tweet_id: &str, text: &str) -> Result<()> {
        let payload = json!({
            "text": text,
            "reply": { "in_reply_to_tweet_id": tweet_id },
        });

        let response = self
            .client
            .post(POST_URL)
            .headers(self.headers()?)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "publish failed with status {}: {}",
                status,
                body
            ));
        }
        Ok(())
    }
}

/// Numeric maximum of the ids in a batch; the watermark the store advances
/// to after a fetch. Numeric, not lexicographic, so "100" beats "99".
pub fn max_mention_id(mentions: &[Mention]) -> Option<String> {
    mentions
        .iter()
        .max_by_key(|m| m.id.parse::<u64>().unwrap_or(0))
        .map(|m| m.id.clone())
}
