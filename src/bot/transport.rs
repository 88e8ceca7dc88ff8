use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, ChatPermissions, InlineKeyboardButton, InlineKeyboardMarkup, MessageId,
    ReplyParameters,
};

use crate::bot::event::CallbackAction;
use crate::bot::texts;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("{0}")]
    Other(String),
}

/// Caller's role as reported by the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Administrator,
    Member,
}

impl MemberRole {
    pub fn is_admin(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Administrator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    Ban,
    Unban,
    Mute,
    Unmute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    pub reply_to: Option<i32>,
    /// Attach the main menu keyboard.
    pub menu: bool,
}

impl OutgoingMessage {
    pub fn to(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_to: None,
            menu: false,
        }
    }

    pub fn replying_to(mut self, message_id: impl Into<Option<i32>>) -> Self {
        self.reply_to = message_id.into();
        self
    }

    pub fn with_menu(mut self) -> Self {
        self.menu = true;
        self
    }
}

/// Everything the router needs from the messaging platform.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: OutgoingMessage) -> Result<(), TransportError>;

    /// Clear the loading indicator of a pressed button.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;

    async fn typing(&self, chat_id: i64) -> Result<(), TransportError>;

    async fn member_role(&self, chat_id: i64, user_id: u64) -> Result<MemberRole, TransportError>;

    async fn moderate(
        &self,
        chat_id: i64,
        user_id: u64,
        action: Moderation,
    ) -> Result<(), TransportError>;
}

pub fn main_menu() -> InlineKeyboardMarkup {
    let button =
        |action: CallbackAction| InlineKeyboardButton::callback(texts::button_label(action), action.id());

    InlineKeyboardMarkup::new(vec![
        vec![button(CallbackAction::Joke), button(CallbackAction::Talk)],
        vec![button(CallbackAction::Translate), button(CallbackAction::Help)],
        vec![button(CallbackAction::Cancel)],
    ])
}

/// [`Transport`] backed by the Telegram Bot API.
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, message: OutgoingMessage) -> Result<(), TransportError> {
        let mut request = self.bot.send_message(ChatId(message.chat_id), message.text);
        if let Some(id) = message.reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(id)));
        }
        if message.menu {
            request = request.reply_markup(main_menu());
        }
        request.await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.bot.answer_callback_query(callback_id.to_string()).await?;
        Ok(())
    }

    async fn typing(&self, chat_id: i64) -> Result<(), TransportError> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await?;
        Ok(())
    }

    async fn member_role(&self, chat_id: i64, user_id: u64) -> Result<MemberRole, TransportError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id))
            .await?;

        Ok(if member.kind.is_owner() {
            MemberRole::Owner
        } else if member.kind.is_administrator() {
            MemberRole::Administrator
        } else {
            MemberRole::Member
        })
    }

    async fn moderate(
        &self,
        chat_id: i64,
        user_id: u64,
        action: Moderation,
    ) -> Result<(), TransportError> {
        let chat = ChatId(chat_id);
        let user = UserId(user_id);
        tracing::info!("Applying {:?} to user {} in chat {}", action, user_id, chat_id);

        match action {
            Moderation::Ban => {
                self.bot.ban_chat_member(chat, user).await?;
            }
            Moderation::Unban => {
                self.bot
                    .unban_chat_member(chat, user)
                    .only_if_banned(true)
                    .await?;
            }
            Moderation::Mute => {
                self.bot
                    .restrict_chat_member(chat, user, ChatPermissions::empty())
                    .await?;
            }
            Moderation::Unmute => {
                self.bot
                    .restrict_chat_member(chat, user, ChatPermissions::all())
                    .await?;
            }
        }
        Ok(())
    }
}
