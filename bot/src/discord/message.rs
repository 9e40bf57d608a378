use serenity::all::Message;

use crate::discord::constants::DISCORD_MESSAGE_LIMIT;

/// Cut text down to what Discord accepts in a single message
pub fn truncate_for_discord(content: &str) -> String {
    match content.char_indices().nth(DISCORD_MESSAGE_LIMIT - 3) {
        Some((n, _)) if content.chars().count() > DISCORD_MESSAGE_LIMIT => {
            format!("{}...", &content[..n])
        }
        _ => content.to_string(),
    }
}

/// Display name of a message author, using the member data attached to guild messages
pub fn author_display_name(msg: &Message) -> String {
    msg.member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .unwrap_or_else(|| msg.author.display_name().to_string())
}
