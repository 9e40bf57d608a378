use crate::{
    config::BotConfig,
    discord::{
        battle::{SessionEvent, Turn},
        command::{CommandParser, TargetSpec, resolve_target},
        constants::{COMMAND_COOLDOWN, MAX_SESSIONS_PER_CHANNEL, MAX_SESSIONS_PER_USER},
        conversation::BattleAi,
        gate::{ConcurrencyGate, Cooldown, GatePermit, format_retry_after},
        prompt::{PromptOutcome, confirm_battle},
        roast::roast_someone,
        session::{SessionKey, SessionRegistry, parse_stop_owner, spawn_battle},
    },
    error::BotError,
    locale::Strings,
    roast::RoastStore,
    utils::render_template,
};
use arc_swap::ArcSwap;
use serenity::all::{
    ComponentInteraction, CreateInteractionResponse, CreateInteractionResponseMessage,
    Interaction, Message, Ready, UserId,
};
use serenity::async_trait;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::Instrument as _;

pub struct DiscordEventHandler {
    strings: &'static Strings,
    parser: CommandParser,
    store: RoastStore,
    /// `None` when no OpenAI key is configured
    battle_ai: Option<BattleAi>,
    sessions: SessionRegistry,
    cooldown: Cooldown,
    gate: ConcurrencyGate,
    bot_user_id: ArcSwap<Option<UserId>>,
}

impl DiscordEventHandler {
    pub fn new(config: &BotConfig, store: RoastStore) -> Self {
        let strings = config.locale.strings();

        if config.openai.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set, roast battles are disabled");
        }

        Self {
            strings,
            parser: CommandParser::new(&config.command_name, config.command_prefix.clone()),
            store,
            battle_ai: config
                .openai
                .as_ref()
                .map(|openai| BattleAi::new(openai, strings)),
            sessions: SessionRegistry::default(),
            cooldown: Cooldown::new(COMMAND_COOLDOWN),
            gate: ConcurrencyGate::new(MAX_SESSIONS_PER_USER, MAX_SESSIONS_PER_CHANNEL),
            bot_user_id: ArcSwap::new(Arc::new(None)),
        }
    }

    async fn run_command(
        &self,
        ctx: &Context,
        msg: &Message,
        argument: Option<&str>,
    ) -> Result<(), BotError> {
        if let Err(wait) = self.cooldown.check(msg.author.id) {
            let notice = render_template(
                self.strings.cooldown,
                &[("{retry_after}", &format_retry_after(wait))],
            );
            msg.reply(ctx, notice).await?;
            return Ok(());
        }

        let permit = match self.gate.acquire(msg.author.id, msg.channel_id) {
            Ok(permit) => permit,
            Err(rejection) => {
                tracing::debug!(?rejection, "Too many roasts running");
                msg.reply(ctx, self.strings.busy).await?;
                return Ok(());
            }
        };

        match TargetSpec::parse(argument) {
            TargetSpec::Me => self.start_battle(ctx, msg, permit).await,
            spec => {
                let target = resolve_target(ctx, msg, &spec).await;
                let result = roast_someone(ctx, msg, target, &self.store, self.strings).await;
                drop(permit);
                result
            }
        }
    }

    async fn start_battle(
        &self,
        ctx: &Context,
        msg: &Message,
        permit: GatePermit,
    ) -> Result<(), BotError> {
        let Some(battle_ai) = &self.battle_ai else {
            msg.reply(ctx, self.strings.battles_offline).await?;
            return Ok(());
        };

        match confirm_battle(ctx, msg, self.strings).await? {
            PromptOutcome::Confirmed => {
                spawn_battle(
                    ctx,
                    msg,
                    battle_ai.start(),
                    self.strings,
                    self.sessions.clone(),
                    permit,
                )
                .await;
            }
            outcome => tracing::debug!(?outcome, "Battle was not started"),
        }

        Ok(())
    }

    async fn stop_battle(
        &self,
        ctx: &Context,
        press: &ComponentInteraction,
        owner: UserId,
    ) -> Result<(), BotError> {
        if press.user.id != owner {
            press
                .create_response(
                    ctx,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content(self.strings.not_your_battle)
                            .ephemeral(true),
                    ),
                )
                .await?;
            return Ok(());
        }

        let key = SessionKey {
            user_id: owner,
            channel_id: press.channel_id,
        };
        let stopped = self.sessions.dispatch(&key, SessionEvent::Stop).await?;

        press
            .create_response(
                ctx,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new().components(vec![]),
                ),
            )
            .await?;

        if stopped {
            press.channel_id.say(ctx, self.strings.battle_stopped).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl EventHandler for DiscordEventHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        // a running battle takes every message of its owner in its channel
        let key = SessionKey {
            user_id: msg.author.id,
            channel_id: msg.channel_id,
        };
        let turn = SessionEvent::Message(Turn {
            message_id: msg.id,
            content: msg.content.clone(),
        });
        match self.sessions.dispatch(&key, turn).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(?e, "Failed to forward message to battle");
                return;
            }
        }

        let Some(bot_user_id) = **self.bot_user_id.load() else {
            tracing::debug!("Ignoring message received before the bot was ready");
            return;
        };

        let Some(argument) = self.parser.parse(&msg.content, bot_user_id) else {
            return;
        };

        let _ = self
            .run_command(&ctx, &msg, argument.as_deref())
            .instrument(tracing::info_span!(
                "roast_command",
                user_id = msg.author.id.get(),
                channel_id = msg.channel_id.get()
            ))
            .await
            .inspect_err(|e| {
                tracing::error!(?e, "Roast command failed");
            });
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // confirm and cancel presses are picked up by the prompt collector
        let Interaction::Component(press) = interaction else {
            return;
        };
        let Some(owner) = parse_stop_owner(&press.data.custom_id) else {
            return;
        };

        if let Err(e) = self.stop_battle(&ctx, &press, owner).await {
            tracing::error!(?e, "Failed to handle Stop button");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!("Discord bot {} is connected!", ready.user.name);

        // Store bot user ID for mention detection
        self.bot_user_id.store(Arc::new(Some(ready.user.id)));
    }
}
