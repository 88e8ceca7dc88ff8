//! User-facing strings. Every failure kind has its own text so that
//! replies can be told apart.

use crate::bot::event::CallbackAction;
use crate::conversation::Mode;

pub const GREETING: &str = "سلام! من یه ربات هوشمندم 😎\nیه گزینه رو انتخاب کن:";

pub const TALK_STARTED: &str = "درد دلتو بگو... 🗣️\nهر وقت خواستی تموم کنی /cancel رو بزن.";
pub const TRANSLATE_STARTED: &str =
    "متنی که می‌خوای ترجمه بشه رو بفرست 🌐\nبرای خروج /cancel رو بزن.";
pub const CANCELLED: &str = "✖️ حالت فعلی لغو شد. از منو یه گزینه دیگه انتخاب کن.";
pub const NOTHING_TO_CANCEL: &str = "الان توی هیچ حالتی نیستی.";
pub const MODE_BUSY: &str = "⏳ اول حالت فعلی رو با /cancel لغو کن.";

pub const REPLY_SAVED: &str = "✅ پاسخ جدید ثبت شد";
pub const REPLY_UPDATED: &str = "✅ پاسخ قبلی به‌روز شد";
pub const REPLY_DELETED: &str = "🗑️ پاسخ حذف شد";
pub const REPLY_NOT_FOUND: &str = "ℹ️ پاسخی برای این متن ثبت نشده";
pub const NO_REPLIES: &str = "هنوز هیچ پاسخی ثبت نشده";
pub const REPLIES_HEADER: &str = "📋 پاسخ‌های ثبت‌شده:";

pub const ADDREPLY_USAGE: &str = "❌ فرمت اشتباهه. مثال: /addreply سلام => سلام عزیزم";
pub const DELREPLY_USAGE: &str = "❌ فرمت اشتباهه. مثال: /delreply سلام";
pub const MODERATION_USAGE: &str = "❌ این دستور رو باید روی پیام همون کاربر ریپلای کنی";
pub const MODERATION_GROUP_ONLY: &str = "❌ این دستور فقط توی گروه کار می‌کنه";

pub const BANNED: &str = "🚫 کاربر از گروه اخراج شد";
pub const UNBANNED: &str = "✅ محرومیت کاربر برداشته شد";
pub const MUTED: &str = "🔇 کاربر ساکت شد";
pub const UNMUTED: &str = "🔊 کاربر دوباره می‌تونه پیام بده";

pub const PERMISSION_DENIED: &str = "⛔ این دستور فقط برای مدیرهای گروهه";
pub const COMPLETION_FAILED: &str = "😔 ببخشید، الان نمی‌تونم جواب بدم. چند دقیقه دیگه دوباره امتحان کن.";
pub const STORE_FAILED: &str = "⚠️ خواندن یا ذخیره پاسخ‌ها با خطا مواجه شد";
pub const MODERATION_FAILED: &str = "⚠️ انجام این کار ممکن نشد. دسترسی‌های ربات رو چک کن.";

pub fn button_label(action: CallbackAction) -> &'static str {
    match action {
        CallbackAction::Joke => "🃏 جوک",
        CallbackAction::Talk => "🗣️ درد و دل",
        CallbackAction::Translate => "🌐 ترجمه",
        CallbackAction::Help => "❓ راهنما",
        CallbackAction::Cancel => "✖️ لغو",
    }
}

/// Answer to a cancel request, given the mode that was active.
pub fn cancelled(previous: Mode) -> &'static str {
    if previous.is_idle() {
        NOTHING_TO_CANCEL
    } else {
        CANCELLED
    }
}
