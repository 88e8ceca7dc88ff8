use crate::ai::llm::ChatMessage;
use crate::conversation::Mode;

pub const JOKE_REQUEST: &str = "یک جوک بامزه و کوتاه فارسی بگو";

const TALK_FRAMING: &str = "You are a warm, patient friend listening to someone who wants to \
     talk about what is on their mind. Answer in the language the user writes in, keep replies \
     short and kind, and never lecture.";

const TRANSLATE_FRAMING: &str = "You are a translator. If the user's message is in Persian, \
     translate it into English; otherwise translate it into Persian. Reply with the translation \
     only, without notes or quotation marks.";

/// One-shot joke request, sent without any framing.
pub fn joke() -> Vec<ChatMessage> {
    vec![ChatMessage::user(JOKE_REQUEST)]
}

/// Private-chat fallback: the text as-is.
pub fn plain(text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(text)]
}

/// Turns for free text received inside a mode, or `None` when idle.
pub fn for_mode(mode: Mode, text: &str) -> Option<Vec<ChatMessage>> {
    let framing = match mode {
        Mode::Idle => return None,
        Mode::Talking => TALK_FRAMING,
        Mode::Translating => TRANSLATE_FRAMING,
    };
    Some(vec![ChatMessage::system(framing), ChatMessage::user(text)])
}
