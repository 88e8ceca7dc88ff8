use crate::bot::event::Event;
use crate::bot::transport::{OutgoingMessage, Transport};
use crate::bot::{callbacks, commands, handlers, AppState};
use crate::config::DenialPolicy;
use crate::error::BotError;

/// Run the one handler an event belongs to and turn its failure, if any,
/// into a single notice for the user.
pub async fn dispatch(state: &AppState, transport: &dyn Transport, event: Event) {
    let (chat_id, reply_to) = event.reply_target();

    let result = match event {
        Event::Command { message, command } => {
            tracing::debug!("Command {:?} from user {}", command, message.user_id);
            commands::handle_command(state, transport, &message, command).await
        }
        Event::Callback(q) => callbacks::handle_callback(state, transport, &q).await,
        Event::Text(message) => handlers::handle_text(state, transport, &message).await,
    };

    let Err(err) = result else {
        return;
    };

    match &err {
        BotError::Transport(e) => {
            tracing::warn!("Send to chat {} failed: {}", chat_id, e);
            return;
        }
        BotError::PermissionDenied if state.config.denial == DenialPolicy::Silent => {
            tracing::info!("Dropped admin command in chat {}", chat_id);
            return;
        }
        BotError::Store(_) | BotError::Moderation(_) => {
            tracing::error!("Handler failed in chat {}: {}", chat_id, err);
        }
        _ => tracing::info!("Handler in chat {} ended with: {}", chat_id, err),
    }

    if let Some(text) = err.user_message() {
        let notice = OutgoingMessage::to(chat_id, text).replying_to(reply_to);
        if let Err(e) = transport.send(notice).await {
            tracing::warn!("Failed to deliver error notice to chat {}: {}", chat_id, e);
        }
    }
}
