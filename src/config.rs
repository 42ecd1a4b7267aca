use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

const DEFAULT_MAX_REPLIES: usize = 3;
const DEFAULT_DATA_DIR: &str = "./storage";

/// Runtime configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub twitter_bearer_token: String,
    pub openai_api_key: String,
    pub bot_handle: String,
    pub max_replies_per_run: usize,
    /// `None` means a single pass; `Some` enables the poll loop.
    pub poll_interval: Option<Duration>,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            twitter_bearer_token: required("TWITTER_BEARER_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            bot_handle: normalize_handle(&required("BOT_HANDLE")?),
            max_replies_per_run: env::var("MAX_REPLIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_REPLIES),
            poll_interval: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("Missing environment variable: {}", name))
}

// The handle is stored without the leading @; search queries and reply
// prefixes add their own.
fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handle_strips_at_and_whitespace() {
        assert_eq!(normalize_handle("@intentionbot"), "intentionbot");
        assert_eq!(normalize_handle("  intentionbot \n"), "intentionbot");
        assert_eq!(normalize_handle("intentionbot"), "intentionbot");
    }
}
