use crate::discord::conversation::ConversationError;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("Discord request failed: {0}")]
    Discord(#[from] serenity::Error),

    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Session event channel closed: {0}")]
    SessionClosed(String),
}
