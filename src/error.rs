use crate::ai::llm::LlmError;
use crate::bot::texts;
use crate::bot::transport::TransportError;
use crate::conversation::TransitionError;
use crate::store::StoreError;

/// Failure of a single update handler. Nothing here escapes the router.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Malformed command; carries the usage text to show.
    #[error("invalid usage")]
    Usage(&'static str),
    #[error("no reply stored for {0:?}")]
    NotFound(String),
    #[error("admin privileges required")]
    PermissionDenied,
    #[error(transparent)]
    Mode(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Completion(#[from] LlmError),
    #[error("moderation failed: {0}")]
    Moderation(#[source] TransportError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl BotError {
    /// Text shown to the user for this failure. A failed send has nobody left to tell.
    pub fn user_message(&self) -> Option<&'static str> {
        let text = match self {
            BotError::Usage(usage) => *usage,
            BotError::NotFound(_) => texts::REPLY_NOT_FOUND,
            BotError::PermissionDenied => texts::PERMISSION_DENIED,
            BotError::Mode(_) => texts::MODE_BUSY,
            BotError::Store(_) => texts::STORE_FAILED,
            BotError::Completion(_) => texts::COMPLETION_FAILED,
            BotError::Moderation(_) => texts::MODERATION_FAILED,
            BotError::Transport(_) => return None,
        };
        Some(text)
    }
}
