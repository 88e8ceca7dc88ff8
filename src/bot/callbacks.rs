use crate::ai::prompts;
use crate::bot::commands::help_text;
use crate::bot::event::{CallbackAction, CallbackEvent};
use crate::bot::handlers::{self, PendingRequest};
use crate::bot::texts;
use crate::bot::transport::{OutgoingMessage, Transport};
use crate::bot::AppState;
use crate::conversation::Mode;
use crate::error::BotError;

pub async fn handle_callback(
    state: &AppState,
    transport: &dyn Transport,
    q: &CallbackEvent,
) -> Result<(), BotError> {
    // Acknowledge first so the button stops spinning whatever happens next.
    if let Err(e) = transport.answer_callback(&q.id).await {
        tracing::warn!("Failed to answer callback {}: {}", q.id, e);
    }

    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        tracing::debug!("Ignoring unknown callback data {:?}", q.data);
        return Ok(());
    };

    let user_chat = q.user_id as i64;

    match action {
        CallbackAction::Joke => {
            let request = PendingRequest::direct(q.user_id, user_chat, prompts::joke());
            handlers::complete_and_deliver(state, transport, request).await?;
        }

        CallbackAction::Talk => {
            state.conversations.select(q.user_id, Mode::Talking)?;
            transport
                .send(OutgoingMessage::to(user_chat, texts::TALK_STARTED))
                .await?;
        }

        CallbackAction::Translate => {
            state.conversations.select(q.user_id, Mode::Translating)?;
            transport
                .send(OutgoingMessage::to(user_chat, texts::TRANSLATE_STARTED))
                .await?;
        }

        CallbackAction::Help => {
            transport.send(OutgoingMessage::to(user_chat, help_text())).await?;
        }

        CallbackAction::Cancel => {
            let previous = state.conversations.cancel(q.user_id);
            transport
                .send(OutgoingMessage::to(user_chat, texts::cancelled(previous)))
                .await?;
        }
    }

    Ok(())
}
