use std::sync::Arc;

use async_trait::async_trait;
use futures::{
    SinkExt as _,
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use serenity::all::{
    ButtonStyle, ChannelId, Context, CreateActionRow, CreateButton, CreateMessage, EditMessage,
    Http, Mentionable, Message, MessageId, UserId,
};
use tracing::Instrument as _;

use crate::{
    discord::{
        battle::{BattleChannel, BattleSession, SessionEvent, Turn},
        constants::STOP_BUTTON_PREFIX,
        conversation::Conversation,
        gate::GatePermit,
        message::truncate_for_discord,
    },
    error::BotError,
    locale::Strings,
};

/// A battle is bound to the user who started it and the channel it was started in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: UserId,
    pub channel_id: ChannelId,
}

/// Routes Discord events to running battles
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<scc::HashMap<SessionKey, UnboundedSender<SessionEvent>>>,
}

impl SessionRegistry {
    pub async fn register(&self, key: SessionKey) -> UnboundedReceiver<SessionEvent> {
        let (event_send, event_recv) = mpsc::unbounded();

        if self.sessions.remove_async(&key).await.is_some() {
            tracing::warn!(?key, "Replacing a battle that was still registered");
        }
        if self.sessions.insert_async(key, event_send).await.is_err() {
            tracing::error!(?key, "Battle registered twice at once");
        }

        event_recv
    }

    /// Hand an event to the battle under `key`. Returns false when there is no live battle.
    pub async fn dispatch(&self, key: &SessionKey, event: SessionEvent) -> Result<bool, BotError> {
        let Some(mut event_send) = self.sessions.get_async(key).await.map(|e| e.get().clone())
        else {
            return Ok(false);
        };

        match event_send.send(event).await {
            Ok(()) => Ok(true),
            // the battle finished and is about to unregister
            Err(e) if e.is_disconnected() => Ok(false),
            Err(e) => Err(BotError::SessionClosed(e.to_string())),
        }
    }

    pub async fn remove(&self, key: &SessionKey) {
        self.sessions.remove_async(key).await;
    }
}

pub fn stop_button_id(owner: UserId) -> String {
    format!("{STOP_BUTTON_PREFIX}{owner}")
}

/// Owner encoded in a Stop button id, `None` for any other component
pub fn parse_stop_owner(custom_id: &str) -> Option<UserId> {
    custom_id
        .strip_prefix(STOP_BUTTON_PREFIX)?
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(UserId::new)
}

/// Battle output going to a Discord text channel
pub struct DiscordBattleChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
    invocation_id: MessageId,
    stop_id: String,
    strings: &'static Strings,
}

impl DiscordBattleChannel {
    pub fn new(ctx: &Context, invocation: &Message, strings: &'static Strings) -> Self {
        Self {
            http: ctx.http.clone(),
            channel_id: invocation.channel_id,
            invocation_id: invocation.id,
            stop_id: stop_button_id(invocation.author.id),
            strings,
        }
    }

    fn stop_row(&self) -> CreateActionRow {
        CreateActionRow::Buttons(vec![
            CreateButton::new(&self.stop_id)
                .label(self.strings.stop_label)
                .style(ButtonStyle::Secondary),
        ])
    }
}

#[async_trait]
impl BattleChannel for DiscordBattleChannel {
    type Sent = MessageId;

    async fn start_typing(&mut self) {
        if let Err(e) = self.channel_id.broadcast_typing(&self.http).await {
            tracing::warn!(?e, "Failed to show typing indicator");
        }
    }

    async fn say(&mut self, content: &str) -> Result<(), BotError> {
        self.channel_id
            .say(&self.http, truncate_for_discord(content))
            .await?;
        Ok(())
    }

    async fn reply_to_invocation(&mut self, content: &str) -> Result<(), BotError> {
        self.channel_id
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(truncate_for_discord(content))
                    .reference_message((self.channel_id, self.invocation_id)),
            )
            .await?;
        Ok(())
    }

    async fn reply_with_stop(&mut self, turn: &Turn, content: &str) -> Result<MessageId, BotError> {
        let sent = self
            .channel_id
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(truncate_for_discord(content))
                    .reference_message((self.channel_id, turn.message_id))
                    .components(vec![self.stop_row()]),
            )
            .await?;
        Ok(sent.id)
    }

    async fn clear_stop(&mut self, sent: &MessageId) -> Result<(), BotError> {
        self.channel_id
            .edit_message(&self.http, *sent, EditMessage::new().components(vec![]))
            .await?;
        Ok(())
    }
}

/// Register a battle for the invocation author and run it in the background. The gate permit
/// is held until the battle is over.
pub async fn spawn_battle<C>(
    ctx: &Context,
    invocation: &Message,
    conversation: C,
    strings: &'static Strings,
    registry: SessionRegistry,
    permit: GatePermit,
) where
    C: Conversation + 'static,
{
    let key = SessionKey {
        user_id: invocation.author.id,
        channel_id: invocation.channel_id,
    };
    let events = registry.register(key).await;

    let mut session = BattleSession::new(
        conversation,
        DiscordBattleChannel::new(ctx, invocation, strings),
        strings,
        invocation.author.mention().to_string(),
    );

    tokio::spawn(
        async move {
            match session.run(events).await {
                Ok(state) => tracing::info!(?state, "Battle finished"),
                Err(e) => tracing::error!(?e, "Battle aborted"),
            }

            registry.remove(&key).await;
            drop(permit);
        }
        .instrument(tracing::info_span!(
            "battle_session",
            user_id = key.user_id.get(),
            channel_id = key.channel_id.get()
        )),
    );
}
