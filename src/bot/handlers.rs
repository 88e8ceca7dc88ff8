use uuid::Uuid;

use crate::ai::llm::{ChatMessage, LlmError};
use crate::ai::prompts;
use crate::bot::event::{ChatScope, IncomingMessage};
use crate::bot::transport::{OutgoingMessage, Transport};
use crate::bot::AppState;
use crate::error::BotError;

/// Where a generated reply goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyChannel {
    Direct,
    ReplyTo(i32),
}

/// A completion waiting to be sent. Dropped on failure, never retried.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: Uuid,
    pub user_id: u64,
    pub chat_id: i64,
    pub channel: ReplyChannel,
    pub messages: Vec<ChatMessage>,
}

impl PendingRequest {
    pub fn direct(user_id: u64, chat_id: i64, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            chat_id,
            channel: ReplyChannel::Direct,
            messages,
        }
    }

    pub fn reply_to(msg: &IncomingMessage, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: msg.user_id,
            chat_id: msg.chat_id,
            channel: ReplyChannel::ReplyTo(msg.message_id),
            messages,
        }
    }

    fn outgoing(&self, text: String) -> OutgoingMessage {
        let message = OutgoingMessage::to(self.chat_id, text);
        match self.channel {
            ReplyChannel::Direct => message,
            ReplyChannel::ReplyTo(id) => message.replying_to(id),
        }
    }
}

/// Free text that is neither a command nor a button press.
///
/// An active mode takes the text first, then stored triggers, then the
/// plain completion fallback, which only runs in private chats.
pub async fn handle_text(
    state: &AppState,
    transport: &dyn Transport,
    msg: &IncomingMessage,
) -> Result<(), BotError> {
    let mode = state.conversations.mode(msg.user_id);
    if let Some(messages) = prompts::for_mode(mode, &msg.text) {
        tracing::debug!("User {} is in {} mode", msg.user_id, mode);
        return complete_and_deliver(state, transport, PendingRequest::reply_to(msg, messages))
            .await;
    }

    if let Some(response) = state.replies.lookup(&msg.text).await {
        transport
            .send(OutgoingMessage::to(msg.chat_id, response).replying_to(msg.message_id))
            .await?;
        return Ok(());
    }

    match msg.scope {
        ChatScope::Private => {
            let request = PendingRequest::reply_to(msg, prompts::plain(&msg.text));
            complete_and_deliver(state, transport, request).await
        }
        ChatScope::Group => Ok(()),
    }
}

pub async fn complete_and_deliver(
    state: &AppState,
    transport: &dyn Transport,
    request: PendingRequest,
) -> Result<(), BotError> {
    tracing::info!(
        "Completion {} for user {} ({} turns)",
        request.id,
        request.user_id,
        request.messages.len()
    );

    if let Err(e) = transport.typing(request.chat_id).await {
        tracing::debug!("Typing indicator failed: {}", e);
    }

    let limit = state.config.completion_timeout;
    let text = match tokio::time::timeout(limit, state.llm.complete(&request.messages)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::error!("Completion {} failed: {}", request.id, e);
            return Err(e.into());
        }
        Err(_) => {
            tracing::error!("Completion {} timed out after {:?}", request.id, limit);
            return Err(LlmError::Timeout(limit).into());
        }
    };

    transport.send(request.outgoing(text)).await?;
    Ok(())
}
