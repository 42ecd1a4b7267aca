use anyhow::Result;
use log::warn;
use rig::agent::Agent as RigAgent;
use rig::completion::Prompt;
use rig::providers::openai::{self, CompletionModel};

pub const REPLY_MODEL: &str = "gpt-3.5-turbo";

/// Substituted when the completion API fails; the run continues instead of
/// aborting.
pub const FALLBACK_REPLY: &str =
    "Repeat after me: I am patient. Our guide is temporarily unavailable, please ask again soon.";

/// Produces the reply body for a mention. The platform handle prefix and the
/// length check are applied by the caller.
#[allow(async_fn_in_trait)]
pub trait ReplyGenerator {
    async fn generate(&self, text: &str) -> Result<String>;
}

pub struct Agent {
    agent: RigAgent<CompletionModel>,
}

impl Agent {
    pub fn new(openai_api_key: &str) -> Self {
        let client = openai::Client::new(openai_api_key);
        let agent = client
            .agent(REPLY_MODEL)
            .temperature(0.7)
            .max_tokens(256)
            .build();
        Agent { agent }
    }

    pub fn build_prompt(user_text: &str) -> String {
        format!(
            "You are a spiritual guide. When someone asks a question, you reply with a short, \
            emotionally supportive intention or affirmation they can repeat. It must be under 280 characters.\n\
            Use one of these formats: 'Repeat after me: ...', 'Say this: ...', or 'Affirmation: ...'\n\n\
            Tweet: \"{}\"\nReply:",
            user_text
        )
    }
}

impl ReplyGenerator for Agent {
    async fn generate(&self, text: &str) -> Result<String> {
        let prompt = Self::build_prompt(text);
        let reply = self.agent.prompt(&prompt).await?;
        Ok(reply.trim().to_string())
    }
}

/// Applies the generation-failure policy: an error from the inner generator
/// is logged and replaced with [`FALLBACK_REPLY`], so the run continues.
pub struct FallbackGenerator<G>(pub G);

impl<G: ReplyGenerator> ReplyGenerator for FallbackGenerator<G> {
    async fn generate(&self, text: &str) -> Result<String> {
        match self.0.generate(text).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!("reply generation failed, substituting fallback: {}", e);
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}
