use std::sync::Arc;

use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

mod ai;
mod bot;
mod config;
mod conversation;
mod error;
mod store;

use config::AppConfig;
use conversation::Conversations;
use store::ReplyStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🤖 Starting reply bot...");

    // Missing secrets stop the bot here
    let config = AppConfig::from_env()?;
    tracing::info!(
        "Config loaded. Model: {}, replies file: {}",
        config.openai_model,
        config.replies_path.display()
    );

    let replies = ReplyStore::new(config.replies_path.clone(), config.trigger_case);
    let known = replies.load().await.len();
    tracing::info!("{} stored replies available.", known);

    let llm = Arc::new(ai::llm::OpenAiClient::new(&config));

    // Build shared application state
    let state = Arc::new(bot::AppState {
        config: config.clone(),
        replies,
        conversations: Conversations::in_memory(),
        llm,
    });

    // Create the Telegram bot
    let bot = Bot::new(&config.bot_token);

    // Build the dispatcher
    let handler = bot::build_handler();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
