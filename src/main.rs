mod config;
mod core;
mod filter;
mod models;
mod providers;
mod store;

use dotenv::dotenv;
use log::info;

use crate::config::Config;
use crate::core::agent::{Agent, FallbackGenerator};
use crate::core::runtime::{PollPolicy, Runtime};
use crate::providers::twitter::Twitter;
use crate::store::FileStore;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!(
        "starting intention bot for @{} (max {} replies per run)",
        config.bot_handle, config.max_replies_per_run
    );

    let store = FileStore::open(&config.data_dir)?;
    let twitter = Twitter::new(&config.twitter_bearer_token, &config.bot_handle);
    let agent = FallbackGenerator(Agent::new(&config.openai_api_key));
    let mut runtime = Runtime::new(
        twitter,
        agent,
        store,
        &config.bot_handle,
        config.max_replies_per_run,
    );

    match config.poll_interval {
        Some(interval) => {
            runtime.run_periodically(&PollPolicy::fixed(interval)).await?;
        }
        None => {
            runtime.run().await?;
            info!("bot run finished");
        }
    }

    Ok(())
}
