use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    ButtonStyle, ComponentInteraction, ComponentInteractionCollector, Context, CreateActionRow,
    CreateButton, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
    EditMessage, Message, UserId,
};
use tokio::time::Instant;

use crate::{
    discord::constants::{CANCEL_BUTTON_PREFIX, CONFIRM_BUTTON_PREFIX, PROMPT_TIMEOUT},
    error::BotError,
    locale::Strings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Confirmed,
    Cancelled,
    /// Nobody answered before the prompt timed out
    Expired,
}

#[derive(Debug, PartialEq, Eq)]
enum Press {
    Confirm,
    Cancel,
    NotOwner,
    Unrelated,
}

struct PromptButtons {
    confirm_id: String,
    cancel_id: String,
}

impl PromptButtons {
    fn new() -> Self {
        let prompt_id = uuid::Uuid::new_v4();
        Self {
            confirm_id: format!("{CONFIRM_BUTTON_PREFIX}{prompt_id}"),
            cancel_id: format!("{CANCEL_BUTTON_PREFIX}{prompt_id}"),
        }
    }

    fn classify(&self, custom_id: &str, presser: UserId, owner: UserId) -> Press {
        if custom_id != self.confirm_id && custom_id != self.cancel_id {
            Press::Unrelated
        } else if presser != owner {
            Press::NotOwner
        } else if custom_id == self.confirm_id {
            Press::Confirm
        } else {
            Press::Cancel
        }
    }

    fn row(&self, strings: &Strings) -> CreateActionRow {
        CreateActionRow::Buttons(vec![
            CreateButton::new(&self.confirm_id)
                .label(strings.confirm_label)
                .style(ButtonStyle::Success),
            CreateButton::new(&self.cancel_id)
                .label(strings.cancel_label)
                .style(ButtonStyle::Danger),
        ])
    }
}

/// A button press on the prompt, with whatever is needed to answer it
pub struct Pressed<H> {
    pub custom_id: String,
    pub user: UserId,
    pub handle: H,
}

/// Where a confirmation prompt lives. The Discord implementation is [`DiscordPrompt`].
#[async_trait]
pub trait PromptChannel: Send {
    type Handle: Send;

    /// Next press on the prompt, `None` once `wait` has passed without one
    async fn next_press(&mut self, wait: Duration) -> Result<Option<Pressed<Self::Handle>>, BotError>;

    /// Ephemeral answer to someone who is not allowed to press
    async fn reject(&mut self, press: Self::Handle, content: &str) -> Result<(), BotError>;

    /// Replace the prompt with `content` and remove its buttons
    async fn close(&mut self, press: Self::Handle, content: &str) -> Result<(), BotError>;

    /// Remove the buttons of an unanswered prompt
    async fn expire(&mut self) -> Result<(), BotError>;
}

pub struct DiscordPrompt<'a> {
    ctx: &'a Context,
    message: Message,
}

#[async_trait]
impl PromptChannel for DiscordPrompt<'_> {
    type Handle = ComponentInteraction;

    async fn next_press(&mut self, wait: Duration) -> Result<Option<Pressed<Self::Handle>>, BotError> {
        let press = ComponentInteractionCollector::new(self.ctx)
            .message_id(self.message.id)
            .timeout(wait)
            .await;

        Ok(press.map(|press| Pressed {
            custom_id: press.data.custom_id.clone(),
            user: press.user.id,
            handle: press,
        }))
    }

    async fn reject(&mut self, press: Self::Handle, content: &str) -> Result<(), BotError> {
        press
            .create_response(
                self.ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(content)
                        .ephemeral(true),
                ),
            )
            .await?;
        Ok(())
    }

    async fn close(&mut self, press: Self::Handle, content: &str) -> Result<(), BotError> {
        press
            .create_response(
                self.ctx,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .content(content)
                        .components(vec![]),
                ),
            )
            .await?;
        Ok(())
    }

    async fn expire(&mut self) -> Result<(), BotError> {
        tracing::debug!(message_id = self.message.id.get(), "Battle prompt expired");
        self.message
            .edit(self.ctx, EditMessage::new().components(vec![]))
            .await?;
        Ok(())
    }
}

/// Ask the command author to confirm a roast battle. Only the author can answer, everyone
/// else gets an ephemeral notice.
pub async fn confirm_battle(
    ctx: &Context,
    invocation: &Message,
    strings: &Strings,
) -> Result<PromptOutcome, BotError> {
    let buttons = PromptButtons::new();

    let message = invocation
        .channel_id
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .content(strings.battle_prompt)
                .reference_message(invocation)
                .components(vec![buttons.row(strings)]),
        )
        .await?;

    let mut prompt = DiscordPrompt { ctx, message };
    await_answer(&mut prompt, &buttons, invocation.author.id, strings).await
}

async fn await_answer<P: PromptChannel>(
    prompt: &mut P,
    buttons: &PromptButtons,
    owner: UserId,
    strings: &Strings,
) -> Result<PromptOutcome, BotError> {
    let deadline = Instant::now() + PROMPT_TIMEOUT;
    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        let Some(press) = prompt.next_press(wait).await? else {
            prompt.expire().await?;
            return Ok(PromptOutcome::Expired);
        };

        let (content, outcome) = match buttons.classify(&press.custom_id, press.user, owner) {
            Press::Confirm => (strings.battle_accepted, PromptOutcome::Confirmed),
            Press::Cancel => (strings.battle_cancelled, PromptOutcome::Cancelled),
            Press::NotOwner => {
                prompt.reject(press.handle, strings.not_your_battle).await?;
                continue;
            }
            Press::Unrelated => continue,
        };

        prompt.close(press.handle, content).await?;
        return Ok(outcome);
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use super::*;
    use crate::locale::Locale;

    #[derive(Debug, PartialEq)]
    enum Answer {
        Rejected(UserId),
        Closed(String),
        Expired,
    }

    /// Presses arrive after the given delays, counted from the previous press
    #[derive(Default)]
    struct ScriptedPrompt {
        presses: VecDeque<(Duration, String, UserId)>,
        answers: Vec<Answer>,
    }

    impl ScriptedPrompt {
        fn press(mut self, after_secs: u64, custom_id: &str, user: UserId) -> Self {
            self.presses
                .push_back((Duration::from_secs(after_secs), custom_id.to_string(), user));
            self
        }
    }

    #[async_trait]
    impl PromptChannel for ScriptedPrompt {
        type Handle = UserId;

        async fn next_press(&mut self, wait: Duration) -> Result<Option<Pressed<UserId>>, BotError> {
            match self.presses.pop_front() {
                Some((delay, custom_id, user)) if delay <= wait => {
                    tokio::time::sleep(delay).await;
                    Ok(Some(Pressed {
                        custom_id,
                        user,
                        handle: user,
                    }))
                }
                _ => {
                    tokio::time::sleep(wait).await;
                    Ok(None)
                }
            }
        }

        async fn reject(&mut self, press: UserId, _content: &str) -> Result<(), BotError> {
            self.answers.push(Answer::Rejected(press));
            Ok(())
        }

        async fn close(&mut self, _press: UserId, content: &str) -> Result<(), BotError> {
            self.answers.push(Answer::Closed(content.to_string()));
            Ok(())
        }

        async fn expire(&mut self) -> Result<(), BotError> {
            self.answers.push(Answer::Expired);
            Ok(())
        }
    }

    const OWNER: UserId = UserId::new(1);
    const STRANGER: UserId = UserId::new(2);

    #[tokio::test(start_paused = true)]
    async fn unanswered_prompt_expires_and_loses_its_buttons() {
        let strings = Locale::English.strings();
        let mut prompt = ScriptedPrompt::default();

        let started = Instant::now();
        let outcome = await_answer(&mut prompt, &PromptButtons::new(), OWNER, strings)
            .await
            .unwrap();

        assert_eq!(outcome, PromptOutcome::Expired);
        assert_eq!(started.elapsed(), PROMPT_TIMEOUT);
        assert_eq!(prompt.answers, vec![Answer::Expired]);
    }

    #[tokio::test(start_paused = true)]
    async fn confirm_and_cancel_close_the_prompt() {
        let strings = Locale::English.strings();

        for (confirm, outcome, content) in [
            (true, PromptOutcome::Confirmed, strings.battle_accepted),
            (false, PromptOutcome::Cancelled, strings.battle_cancelled),
        ] {
            let buttons = PromptButtons::new();
            let id = if confirm {
                &buttons.confirm_id
            } else {
                &buttons.cancel_id
            };
            let mut prompt = ScriptedPrompt::default().press(3, id, OWNER);

            let answered = await_answer(&mut prompt, &buttons, OWNER, strings)
                .await
                .unwrap();

            assert_eq!(answered, outcome);
            assert_eq!(prompt.answers, vec![Answer::Closed(content.to_string())]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn strangers_are_turned_away_until_the_owner_answers() {
        let strings = Locale::English.strings();
        let buttons = PromptButtons::new();
        let mut prompt = ScriptedPrompt::default()
            .press(10, &buttons.confirm_id, STRANGER)
            .press(10, "roast-stop:1", OWNER)
            .press(10, &buttons.confirm_id, OWNER);

        let outcome = await_answer(&mut prompt, &buttons, OWNER, strings)
            .await
            .unwrap();

        assert_eq!(outcome, PromptOutcome::Confirmed);
        assert_eq!(
            prompt.answers,
            vec![
                Answer::Rejected(STRANGER),
                Answer::Closed(strings.battle_accepted.to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stranger_presses_do_not_extend_the_deadline() {
        let strings = Locale::English.strings();
        let buttons = PromptButtons::new();
        let mut prompt = ScriptedPrompt::default()
            .press(100, &buttons.confirm_id, STRANGER)
            .press(100, &buttons.confirm_id, OWNER);

        let started = Instant::now();
        let outcome = await_answer(&mut prompt, &buttons, OWNER, strings)
            .await
            .unwrap();

        assert_eq!(outcome, PromptOutcome::Expired);
        assert_eq!(started.elapsed(), PROMPT_TIMEOUT);
        assert_eq!(
            prompt.answers,
            vec![Answer::Rejected(STRANGER), Answer::Expired]
        );
    }

    #[test]
    fn only_the_owner_can_answer() {
        let buttons = PromptButtons::new();
        let owner = UserId::new(1);
        let stranger = UserId::new(2);

        assert_eq!(buttons.classify(&buttons.confirm_id, owner, owner), Press::Confirm);
        assert_eq!(buttons.classify(&buttons.cancel_id, owner, owner), Press::Cancel);
        assert_eq!(
            buttons.classify(&buttons.confirm_id, stranger, owner),
            Press::NotOwner
        );
        assert_eq!(
            buttons.classify(&buttons.cancel_id, stranger, owner),
            Press::NotOwner
        );
    }

    #[test]
    fn buttons_of_other_prompts_are_ignored() {
        let ours = PromptButtons::new();
        let theirs = PromptButtons::new();
        let owner = UserId::new(1);

        assert_eq!(ours.classify(&theirs.confirm_id, owner, owner), Press::Unrelated);
        assert_eq!(ours.classify("roast-stop:1", owner, owner), Press::Unrelated);
    }
}
