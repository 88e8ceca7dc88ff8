pub mod callbacks;
pub mod commands;
pub mod event;
pub mod handlers;
pub mod router;
pub mod texts;
pub mod transport;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::prelude::*;

use crate::ai::llm::CompletionClient;
use crate::config::AppConfig;
use crate::conversation::Conversations;
use crate::store::ReplyStore;
use commands::BotCommand;
use event::{CallbackEvent, Event, IncomingMessage};
use transport::TelegramTransport;

type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared application state, accessible from all handlers.
pub struct AppState {
    pub config: AppConfig,
    pub replies: ReplyStore,
    pub conversations: Conversations,
    pub llm: Arc<dyn CompletionClient>,
}

/// Build the teloxide update handler tree.
///
/// Commands are tried before button presses, and both before plain text.
pub fn build_handler() -> UpdateHandler<HandlerError> {
    let command_handler = Update::filter_message()
        .filter_command::<BotCommand>()
        .endpoint(on_command);

    let callback_handler = Update::filter_callback_query().endpoint(on_callback);

    let message_handler = Update::filter_message().endpoint(on_message);

    dptree::entry()
        .branch(command_handler)
        .branch(callback_handler)
        .branch(message_handler)
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    state: Arc<AppState>,
) -> Result<(), HandlerError> {
    if let Some(message) = IncomingMessage::from_telegram(&msg) {
        let event = Event::Command {
            message,
            command: cmd,
        };
        router::dispatch(&state, &TelegramTransport::new(bot), event).await;
    }
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> Result<(), HandlerError> {
    let event = Event::Callback(CallbackEvent::from_telegram(&q));
    router::dispatch(&state, &TelegramTransport::new(bot), event).await;
    Ok(())
}

async fn on_message(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<(), HandlerError> {
    match IncomingMessage::from_telegram(&msg) {
        Some(message) => {
            router::dispatch(&state, &TelegramTransport::new(bot), Event::Text(message)).await;
        }
        None => tracing::debug!("Skipping non-text message {} in chat {}", msg.id.0, msg.chat.id.0),
    }
    Ok(())
}
