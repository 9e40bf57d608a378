use std::time::Duration;

use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{CompletionModel, Message as RigMessage, Prompt},
    providers::openai,
};

use crate::{
    config::OpenAiConfig,
    discord::constants::{
        BATTLE_PREAMBLE, BATTLE_TURN_TIMEOUT, MAX_BATTLE_MESSAGE_CHARS, MAX_BATTLE_MESSAGES,
    },
    locale::Strings,
    utils::render_template,
};

#[derive(thiserror::Error, Debug)]
pub enum ConversationError {
    #[error("The conversation did not answer in time")]
    Timeout,

    #[error("The conversation reached its limit of {0} messages")]
    MessageLimitExceeded(usize),

    #[error("Message has {len} characters, the limit is {limit}")]
    CharacterLimitExceeded { len: usize, limit: usize },

    #[error("The conversation was already terminated")]
    Terminated,

    #[error("Completion request failed: {0}")]
    Completion(String),
}

/// A turn-taking AI chat. One user message in, one reply out.
#[async_trait]
pub trait Conversation: Send {
    async fn send(&mut self, message: &str) -> Result<String, ConversationError>;

    fn kill(&mut self);

    fn is_alive(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct ConversationLimits {
    pub max_messages: usize,
    pub max_chars: usize,
    pub turn_timeout: Duration,
}

impl Default for ConversationLimits {
    fn default() -> Self {
        Self {
            max_messages: MAX_BATTLE_MESSAGES,
            max_chars: MAX_BATTLE_MESSAGE_CHARS,
            turn_timeout: BATTLE_TURN_TIMEOUT,
        }
    }
}

impl ConversationLimits {
    /// Character limit is checked first so an oversized message never uses up a turn
    pub fn check(&self, sent: usize, message: &str) -> Result<(), ConversationError> {
        let len = message.chars().count();
        if len > self.max_chars {
            return Err(ConversationError::CharacterLimitExceeded {
                len,
                limit: self.max_chars,
            });
        }
        if sent >= self.max_messages {
            return Err(ConversationError::MessageLimitExceeded(self.max_messages));
        }
        Ok(())
    }
}

/// Builds battle conversations backed by an OpenAI agent
pub struct BattleAi {
    client: openai::Client,
    model: String,
    preamble: String,
    limits: ConversationLimits,
}

impl BattleAi {
    pub fn new(config: &OpenAiConfig, strings: &Strings) -> Self {
        Self {
            client: openai::Client::new(&config.api_key),
            model: config.model.clone(),
            preamble: render_template(
                BATTLE_PREAMBLE,
                &[("{language}", strings.persona_language)],
            ),
            limits: ConversationLimits::default(),
        }
    }

    pub fn start(&self) -> impl Conversation + 'static {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(&self.preamble)
            .build();

        tracing::debug!(model = %self.model, "Starting battle conversation");

        RigConversation {
            agent,
            history: Vec::new(),
            sent: 0,
            alive: true,
            limits: self.limits,
        }
    }
}

pub struct RigConversation<M: CompletionModel> {
    agent: Agent<M>,
    history: Vec<RigMessage>,
    sent: usize,
    alive: bool,
    limits: ConversationLimits,
}

#[async_trait]
impl<M> Conversation for RigConversation<M>
where
    M: CompletionModel + 'static,
{
    async fn send(&mut self, message: &str) -> Result<String, ConversationError> {
        if !self.alive {
            return Err(ConversationError::Terminated);
        }
        self.limits.check(self.sent, message)?;

        let reply = tokio::time::timeout(
            self.limits.turn_timeout,
            self.agent
                .prompt(message.to_string())
                .with_history(&mut self.history),
        )
        .await
        .map_err(|_| ConversationError::Timeout)?
        .map_err(|e| ConversationError::Completion(e.to_string()))?;

        self.sent += 1;
        Ok(reply)
    }

    fn kill(&mut self) {
        if self.alive {
            tracing::debug!(
                messages = self.sent,
                "Battle conversation terminated"
            );
        }
        self.alive = false;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
