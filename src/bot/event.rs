use teloxide::types::{CallbackQuery, Message};

use crate::bot::commands::BotCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatScope {
    /// One-to-one chat with the bot.
    Private,
    /// Groups, supergroups and channels.
    Group,
}

/// A text-carrying message, stripped down to what the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub scope: ChatScope,
    pub user_id: u64,
    pub message_id: i32,
    pub text: String,
    /// Author of the message this one replies to, if any.
    pub reply_to_user: Option<u64>,
}

impl IncomingMessage {
    /// `None` for messages without text or without a sender (channel posts).
    pub fn from_telegram(msg: &Message) -> Option<Self> {
        let text = msg.text()?.to_string();
        let user_id = msg.from.as_ref()?.id.0;
        let scope = if msg.chat.is_private() {
            ChatScope::Private
        } else {
            ChatScope::Group
        };

        Some(Self {
            chat_id: msg.chat.id.0,
            scope,
            user_id,
            message_id: msg.id.0,
            text,
            reply_to_user: msg
                .reply_to_message()
                .and_then(|r| r.from.as_ref())
                .map(|u| u.id.0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    pub id: String,
    pub user_id: u64,
    pub data: Option<String>,
}

impl CallbackEvent {
    pub fn from_telegram(q: &CallbackQuery) -> Self {
        Self {
            id: q.id.clone(),
            user_id: q.from.id.0,
            data: q.data.clone(),
        }
    }
}

/// Menu buttons. The identifiers are what Telegram echoes back as callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Joke,
    Talk,
    Translate,
    Help,
    Cancel,
}

impl CallbackAction {
    pub const ALL: [CallbackAction; 5] = [
        CallbackAction::Joke,
        CallbackAction::Talk,
        CallbackAction::Translate,
        CallbackAction::Help,
        CallbackAction::Cancel,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CallbackAction::Joke => "joke",
            CallbackAction::Talk => "talk",
            CallbackAction::Translate => "translate",
            CallbackAction::Help => "help",
            CallbackAction::Cancel => "cancel",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == data)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Command {
        message: IncomingMessage,
        command: BotCommand,
    },
    Callback(CallbackEvent),
    Text(IncomingMessage),
}

impl Event {
    /// Chat (and message to reply to) that failure notices go to.
    /// Button presses are answered in the user's private chat.
    pub fn reply_target(&self) -> (i64, Option<i32>) {
        match self {
            Event::Command { message, .. } | Event::Text(message) => {
                (message.chat_id, Some(message.message_id))
            }
            Event::Callback(cb) => (cb.user_id as i64, None),
        }
    }
}
