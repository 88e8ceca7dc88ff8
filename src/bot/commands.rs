use teloxide::macros::BotCommands;
use teloxide::utils::command::BotCommands as _;

use crate::bot::event::{ChatScope, IncomingMessage};
use crate::bot::texts;
use crate::bot::transport::{Moderation, OutgoingMessage, Transport};
use crate::bot::AppState;
use crate::error::BotError;
use crate::store::{Removal, StoreError, Upserted};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "دستورهای ربات:")]
pub enum BotCommand {
    #[command(description = "شروع و نمایش منو")]
    Start,
    #[command(description = "نمایش راهنما")]
    Help,
    #[command(description = "خروج از حالت درد و دل یا ترجمه")]
    Cancel,
    #[command(description = "ثبت پاسخ: /addreply متن => پاسخ (مدیر)")]
    AddReply(String),
    #[command(description = "حذف پاسخ: /delreply متن (مدیر)")]
    DelReply(String),
    #[command(description = "فهرست پاسخ‌ها (مدیر)")]
    ListReplies,
    #[command(description = "اخراج کاربر، با ریپلای روی پیامش (مدیر)")]
    Ban,
    #[command(description = "رفع اخراج کاربر، با ریپلای (مدیر)")]
    Unban,
    #[command(description = "ساکت کردن کاربر، با ریپلای (مدیر)")]
    Mute,
    #[command(description = "رفع سکوت کاربر، با ریپلای (مدیر)")]
    Unmute,
}

impl BotCommand {
    fn requires_admin(&self) -> bool {
        !matches!(self, BotCommand::Start | BotCommand::Help | BotCommand::Cancel)
    }
}

pub fn help_text() -> String {
    BotCommand::descriptions().to_string()
}

/// Split `<trigger> => <response>` at the first arrow.
pub fn parse_reply_rule(args: &str) -> Option<(&str, &str)> {
    let (trigger, response) = args.split_once("=>")?;
    let (trigger, response) = (trigger.trim(), response.trim());
    if trigger.is_empty() || response.is_empty() {
        return None;
    }
    Some((trigger, response))
}

pub async fn handle_command(
    state: &AppState,
    transport: &dyn Transport,
    msg: &IncomingMessage,
    cmd: BotCommand,
) -> Result<(), BotError> {
    if cmd.requires_admin() {
        ensure_admin(transport, msg).await?;
    }

    let reply = |text: String| OutgoingMessage::to(msg.chat_id, text).replying_to(msg.message_id);

    match cmd {
        BotCommand::Start => {
            transport
                .send(OutgoingMessage::to(msg.chat_id, texts::GREETING).with_menu())
                .await?;
        }

        BotCommand::Help => {
            transport.send(OutgoingMessage::to(msg.chat_id, help_text())).await?;
        }

        BotCommand::Cancel => {
            let previous = state.conversations.cancel(msg.user_id);
            transport
                .send(reply(texts::cancelled(previous).to_string()))
                .await?;
        }

        BotCommand::AddReply(args) => {
            let (trigger, response) =
                parse_reply_rule(&args).ok_or(BotError::Usage(texts::ADDREPLY_USAGE))?;

            let outcome = state
                .replies
                .upsert(trigger, response)
                .await
                .map_err(|e| match e {
                    StoreError::Validation(_) => BotError::Usage(texts::ADDREPLY_USAGE),
                    other => other.into(),
                })?;

            let text = match outcome {
                Upserted::Added => texts::REPLY_SAVED,
                Upserted::Replaced => texts::REPLY_UPDATED,
            };
            transport.send(reply(text.to_string())).await?;
        }

        BotCommand::DelReply(args) => {
            let trigger = args.trim();
            if trigger.is_empty() {
                return Err(BotError::Usage(texts::DELREPLY_USAGE));
            }

            match state.replies.remove(trigger).await? {
                Removal::Removed(_) => {
                    transport.send(reply(texts::REPLY_DELETED.to_string())).await?;
                }
                Removal::NotFound => return Err(BotError::NotFound(trigger.to_string())),
            }
        }

        BotCommand::ListReplies => {
            let entries = state.replies.list().await;
            let text = if entries.is_empty() {
                texts::NO_REPLIES.to_string()
            } else {
                let mut text = String::from(texts::REPLIES_HEADER);
                for entry in &entries {
                    text.push_str(&format!("\n{} => {}", entry.trigger, entry.response));
                }
                text
            };
            transport.send(reply(text)).await?;
        }

        BotCommand::Ban => moderate(transport, msg, Moderation::Ban, texts::BANNED).await?,
        BotCommand::Unban => moderate(transport, msg, Moderation::Unban, texts::UNBANNED).await?,
        BotCommand::Mute => moderate(transport, msg, Moderation::Mute, texts::MUTED).await?,
        BotCommand::Unmute => moderate(transport, msg, Moderation::Unmute, texts::UNMUTED).await?,
    }

    Ok(())
}

/// Private chats are always trusted; in groups only owners and administrators are.
async fn ensure_admin(transport: &dyn Transport, msg: &IncomingMessage) -> Result<(), BotError> {
    if msg.scope == ChatScope::Private {
        return Ok(());
    }

    match transport.member_role(msg.chat_id, msg.user_id).await {
        Ok(role) if role.is_admin() => Ok(()),
        Ok(_) => Err(BotError::PermissionDenied),
        Err(e) => {
            tracing::warn!(
                "Admin lookup for user {} in chat {} failed: {}",
                msg.user_id,
                msg.chat_id,
                e
            );
            Err(BotError::PermissionDenied)
        }
    }
}

async fn moderate(
    transport: &dyn Transport,
    msg: &IncomingMessage,
    action: Moderation,
    done: &'static str,
) -> Result<(), BotError> {
    if msg.scope == ChatScope::Private {
        return Err(BotError::Usage(texts::MODERATION_GROUP_ONLY));
    }
    let target = msg
        .reply_to_user
        .ok_or(BotError::Usage(texts::MODERATION_USAGE))?;

    transport
        .moderate(msg.chat_id, target, action)
        .await
        .map_err(BotError::Moderation)?;

    transport
        .send(OutgoingMessage::to(msg.chat_id, done).replying_to(msg.message_id))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::utils::command::BotCommands;

    #[test]
    fn parses_reply_rules() {
        assert_eq!(parse_reply_rule("hi => hello"), Some(("hi", "hello")));
        assert_eq!(parse_reply_rule(" سلام=>سلام عزیزم "), Some(("سلام", "سلام عزیزم")));
        assert_eq!(parse_reply_rule("a => b => c"), Some(("a", "b => c")));
    }

    #[test]
    fn rejects_malformed_rules() {
        assert_eq!(parse_reply_rule("hi hello"), None);
        assert_eq!(parse_reply_rule(" => hello"), None);
        assert_eq!(parse_reply_rule("hi =>   "), None);
        assert_eq!(parse_reply_rule(""), None);
    }

    #[test]
    fn commands_parse_by_leading_token() {
        assert_eq!(
            BotCommand::parse("/addreply hi => hello", "reply_bot").unwrap(),
            BotCommand::AddReply("hi => hello".to_string())
        );
        assert_eq!(BotCommand::parse("/listreplies", "reply_bot").unwrap(), BotCommand::ListReplies);
        assert_eq!(BotCommand::parse("/ban@reply_bot", "reply_bot").unwrap(), BotCommand::Ban);
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert!(BotCommand::parse("/Start", "reply_bot").is_err());
        assert!(BotCommand::parse("/ADDREPLY hi => hello", "reply_bot").is_err());
        assert!(BotCommand::parse("hello", "reply_bot").is_err());
    }

    #[test]
    fn help_lists_admin_commands() {
        let help = help_text();
        assert!(help.contains("/addreply"));
        assert!(help.contains("/unmute"));
    }

    #[test]
    fn only_menu_commands_skip_the_admin_check() {
        assert!(!BotCommand::Start.requires_admin());
        assert!(!BotCommand::Cancel.requires_admin());
        assert!(BotCommand::ListReplies.requires_admin());
        assert!(BotCommand::Mute.requires_admin());
    }
}
