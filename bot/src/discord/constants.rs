use const_format::formatcp;
use std::time::Duration;

pub const COMMAND_COOLDOWN: Duration = Duration::from_secs(15);
pub const MAX_SESSIONS_PER_USER: usize = 1;
pub const MAX_SESSIONS_PER_CHANNEL: usize = 4;

pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(180);
/// How long a battle waits for the user's next roast
pub const BATTLE_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
/// How long the AI gets to answer one turn
pub const BATTLE_TURN_TIMEOUT: Duration = Duration::from_secs(30);
pub const BATTLE_TIRED_DELAY: Duration = Duration::from_secs(1);

pub const EXPLAIN_TIMEOUT: Duration = Duration::from_secs(15);
pub const EXPLAIN_DELAY: Duration = Duration::from_millis(1500);

pub const MAX_BATTLE_MESSAGES: usize = 10;
pub const MAX_BATTLE_MESSAGE_CHARS: usize = 250;
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;
/// Length the persona is asked to keep its comebacks under
pub const PERSONA_REPLY_CHARS: usize = 400;

pub const STOP_BUTTON_PREFIX: &str = "roast-stop:";
pub const CONFIRM_BUTTON_PREFIX: &str = "roast-confirm:";
pub const CANCEL_BUTTON_PREFIX: &str = "roast-cancel:";

/// Persona for battle conversations, `{language}` is filled per locale
pub const BATTLE_PREAMBLE: &str = formatcp!(
    r#"[PERSONA]
You are a savage roast battle opponent in a Discord server. The user started a roast battle
with you: you take turns roasting each other.

[RULES]
- Answer every message with one comeback that roasts the user back, ideally using what they
  just said against them.
- Keep it short and punchy: one to three sentences, never more than {PERSONA_REPLY_CHARS} characters.
- Be mean and funny, not hateful. No slurs, no jokes about protected characteristics,
  no threats, nothing sexual.
- Never break character, never apologize, never explain that you are an AI.
- Plain text only, at most one emoji.
- Always answer in {{language}}."#
);
