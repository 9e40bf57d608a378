use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{ChannelId, Context, Message, MessageCollector};

use crate::{
    discord::{
        constants::{EXPLAIN_DELAY, EXPLAIN_TIMEOUT},
        message::{author_display_name, truncate_for_discord},
    },
    error::BotError,
    locale::Strings,
    roast::{RoastRequest, RoastStore, RoastTarget, is_explain_trigger},
};

/// Answer a roast command that does not start a battle
pub async fn roast_someone(
    ctx: &Context,
    invocation: &Message,
    target: Option<RoastTarget>,
    store: &RoastStore,
    strings: &'static Strings,
) -> Result<(), BotError> {
    let invoker = RoastTarget {
        id: invocation.author.id,
        display_name: author_display_name(invocation),
    };
    let member_count = invocation
        .guild_id
        .and_then(|guild_id| ctx.cache.guild(guild_id).map(|g| g.member_count));

    let plan = {
        let request = RoastRequest {
            strings,
            store,
            invoker: &invoker,
            bot_user_id: ctx.cache.current_user().id,
            member_count,
            now: chrono::Utc::now().timestamp(),
        };
        request.plan(target.as_ref(), &mut rand::thread_rng())
    };

    if let Some(reply) = plan.reply {
        invocation
            .reply(ctx, truncate_for_discord(&reply))
            .await?;
    }

    let Some(roast) = plan.roast else {
        return Ok(());
    };

    invocation
        .channel_id
        .say(ctx, truncate_for_discord(&roast.text))
        .await?;

    if let Some(explanation) = roast.explanation {
        let mut channel = DiscordExplainChannel {
            ctx,
            channel_id: invocation.channel_id,
        };
        explain_on_request(&mut channel, &explanation).await?;
    }

    Ok(())
}

/// Where explanation requests are heard and answered
#[async_trait]
pub trait ExplainChannel: Send {
    type Question: Send;

    /// First message asking about the roast, `None` once `wait` has passed
    async fn next_question(&mut self, wait: Duration) -> Option<Self::Question>;

    async fn start_typing(&mut self);

    async fn answer(&mut self, question: Self::Question, content: &str) -> Result<(), BotError>;
}

pub struct DiscordExplainChannel<'a> {
    ctx: &'a Context,
    channel_id: ChannelId,
}

#[async_trait]
impl ExplainChannel for DiscordExplainChannel<'_> {
    type Question = Message;

    async fn next_question(&mut self, wait: Duration) -> Option<Message> {
        let bot_user_id = self.ctx.cache.current_user().id;

        MessageCollector::new(self.ctx)
            .channel_id(self.channel_id)
            .timeout(wait)
            .filter(move |m| m.author.id != bot_user_id && is_explain_trigger(&m.content))
            .await
    }

    async fn start_typing(&mut self) {
        if let Err(e) = self.channel_id.broadcast_typing(&self.ctx.http).await {
            tracing::warn!(?e, "Failed to show typing indicator");
        }
    }

    async fn answer(&mut self, question: Message, content: &str) -> Result<(), BotError> {
        question
            .reply(self.ctx, truncate_for_discord(content))
            .await?;
        Ok(())
    }
}

/// Wait a little for someone in the channel to ask what the roast meant, and tell them.
/// Returns whether the explanation was sent.
async fn explain_on_request<E: ExplainChannel>(
    channel: &mut E,
    explanation: &str,
) -> Result<bool, BotError> {
    let Some(question) = channel.next_question(EXPLAIN_TIMEOUT).await else {
        tracing::debug!("Nobody asked for an explanation");
        return Ok(false);
    };

    channel.start_typing().await;
    tokio::time::sleep(EXPLAIN_DELAY).await;
    channel.answer(question, explanation).await?;

    Ok(true)
}
