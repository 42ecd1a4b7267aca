use std::time::Duration;

use anyhow::Result;
use log::{debug, error, info};
use tokio::time::sleep;

use crate::core::agent::ReplyGenerator;
use crate::filter::{self, RejectReason};
use crate::models::{Mention, RejectionRecord, ReplyRecord};
use crate::providers::twitter::{max_mention_id, MentionSource};
use crate::store::StateStore;

pub const MAX_TWEET_CHARS: usize = 280;
const OVERSIZE_REASON: &str = "Reply too long";

/// Fixed-interval poll schedule. The delays are exposed as a plain iterator
/// so tests can bound the loop and count attempts without sleeping.
pub struct PollPolicy {
    interval: Duration,
    max_cycles: Option<usize>,
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        PollPolicy {
            interval,
            max_cycles: None,
        }
    }

    pub fn bounded(interval: Duration, max_cycles: usize) -> Self {
        PollPolicy {
            interval,
            max_cycles: Some(max_cycles),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::repeat(self.interval).take(self.max_cycles.unwrap_or(usize::MAX))
    }
}

/// How a single mention was resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Replied,
    SkippedBlocked,
    Filtered(RejectReason),
    ReplyTooLong,
    PostFailed,
}

pub struct Runtime<P, G, S> {
    platform: P,
    generator: G,
    store: S,
    bot_handle: String,
    max_replies_per_run: usize,
}

impl<P, G, S> Runtime<P, G, S>
where
    P: MentionSource,
    G: ReplyGenerator,
    S: StateStore,
{
    pub fn new(
        platform: P,
        generator: G,
        store: S,
        bot_handle: &str,
        max_replies_per_run: usize,
    ) -> Self {
        Runtime {
            platform,
            generator,
            store,
            bot_handle: bot_handle.to_string(),
            max_replies_per_run,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[cfg(test)]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// One pass over the current mention batch.
    pub async fn run(&mut self) -> Result<()> {
        let mentions = self.fetch_mentions().await?;
        info!("mentions found: {}", mentions.len());

        let batch: Vec<Mention> = mentions
            .into_iter()
            .take(self.max_replies_per_run)
            .collect();
        for mention in &batch {
            let outcome = self.process_mention(mention).await?;
            debug!("mention {} resolved as {:?}", mention.id, outcome);
        }
        Ok(())
    }

    /// Fetches the batch and advances the watermark to its maximum id before
    /// any reply is attempted. A crash mid-batch therefore drops the
    /// remaining mentions instead of reprocessing them on the next run.
    async fn fetch_mentions(&mut self) -> Result<Vec<Mention>> {
        let since_id = self.store.last_seen_id();
        let mentions = self.platform.fetch_mentions(since_id.as_deref()).await?;
        if let Some(max_id) = max_mention_id(&mentions) {
            self.store.set_last_seen_id(&max_id)?;
        }
        Ok(mentions)
    }

    async fn process_mention(&mut self, mention: &Mention) -> Result<Outcome> {
        if self.store.is_blocked(&mention.author_id) {
            info!("user {} is blocked, skipping", mention.author_id);
            return Ok(Outcome::SkippedBlocked);
        }

        info!(
            "processing mention from {}: {}",
            mention.author_id, mention.text
        );

        if let Some(reason) = filter::screen(&mention.text) {
            info!("rejected by content filter: {}", reason.as_str());
            self.store
                .log_rejection(&RejectionRecord::new(mention, reason.as_str()))?;
            self.store.block_user(&mention.author_id)?;
            return Ok(Outcome::Filtered(reason));
        }

        let reply = self.generator.generate(&mention.text).await?;
        let rendered = render_reply(&self.bot_handle, &reply);
        if rendered.chars().count() > MAX_TWEET_CHARS {
            info!("reply too long, skipping");
            self.store
                .log_rejection(&RejectionRecord::new(mention, OVERSIZE_REASON))?;
            return Ok(Outcome::ReplyTooLong);
        }

        match self.platform.post_reply(&mention.id, &rendered).await {
            Ok(()) => {
                info!("replied to {}", mention.id);
                self.store.log_reply(&ReplyRecord::new(mention, &reply))?;
                Ok(Outcome::Replied)
            }
            Err(e) => {
                // No retry, no state rollback
                error!("reply to {} failed: {}", mention.id, e);
                Ok(Outcome::PostFailed)
            }
        }
    }

    /// Runs forever (or until the policy's cycle bound): one pass, a fixed
    /// sleep, repeat. Errors are logged at loop level and never break out.
    pub async fn run_periodically(&mut self, policy: &PollPolicy) -> Result<()> {
        info!("starting poll loop with interval {:?}", policy.interval());
        for delay in policy.delays() {
            if let Err(e) = self.run().await {
                error!("run failed: {}", e);
            }
            sleep(delay).await;
        }
        Ok(())
    }
}

pub fn render_reply(bot_handle: &str, reply: &str) -> String {
    format!("@{} {}", bot_handle, reply)
}
