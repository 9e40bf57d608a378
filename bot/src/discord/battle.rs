use std::{collections::VecDeque, time::Duration};

use async_trait::async_trait;
use futures::{FutureExt as _, Stream, StreamExt as _};
use serenity::all::MessageId;

use crate::{
    discord::{
        constants::{BATTLE_IDLE_TIMEOUT, BATTLE_TIRED_DELAY},
        conversation::{Conversation, ConversationError},
    },
    error::BotError,
    locale::Strings,
    utils::render_template,
};

/// One message the battle owner sent in the battle channel
#[derive(Debug, Clone)]
pub struct Turn {
    pub message_id: MessageId,
    pub content: String,
}

#[derive(Debug)]
pub enum SessionEvent {
    Message(Turn),
    /// The owner pressed the Stop button on one of the replies
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    /// The user did not send anything in time
    Idle,
    /// The AI did not answer in time
    Turn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    CancelledByUser,
    /// The user typed a quit word
    Forfeited,
    TimedOut(TimeoutKind),
    LimitReached,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}

/// Where a battle writes to. The Discord implementation lives in the session module.
#[async_trait]
pub trait BattleChannel: Send {
    /// Handle to a sent reply that carries a Stop button
    type Sent: Send + Sync;

    async fn start_typing(&mut self);

    /// Plain message in the battle channel
    async fn say(&mut self, content: &str) -> Result<(), BotError>;

    /// Reply to the command that started the battle
    async fn reply_to_invocation(&mut self, content: &str) -> Result<(), BotError>;

    /// Reply to a turn with a fresh Stop button attached
    async fn reply_with_stop(&mut self, turn: &Turn, content: &str)
    -> Result<Self::Sent, BotError>;

    async fn clear_stop(&mut self, sent: &Self::Sent) -> Result<(), BotError>;
}

/// A running roast battle between one user and the AI
pub struct BattleSession<C: Conversation, T: BattleChannel> {
    conversation: C,
    channel: T,
    strings: &'static Strings,
    owner_mention: String,
    state: SessionState,
    idle_timeout: Duration,
    /// Turns that arrived while the AI was answering
    backlog: VecDeque<Turn>,
    last_reply: Option<T::Sent>,
}

impl<C: Conversation, T: BattleChannel> BattleSession<C, T> {
    pub fn new(conversation: C, channel: T, strings: &'static Strings, owner_mention: String) -> Self {
        Self {
            conversation,
            channel,
            strings,
            owner_mention,
            state: SessionState::Active,
            idle_timeout: BATTLE_IDLE_TIMEOUT,
            backlog: VecDeque::new(),
            last_reply: None,
        }
    }

    fn mention_template(&self, template: &str) -> String {
        render_template(template, &[("{mention}", &self.owner_mention)])
    }

    /// Run the battle until it terminates. Events must only contain messages from the
    /// battle owner in the battle channel.
    pub async fn run<S>(&mut self, mut events: S) -> Result<SessionState, BotError>
    where
        S: Stream<Item = SessionEvent> + Unpin + Send,
    {
        let result = self.run_turns(&mut events).await;

        // every exit path ends the conversation, including the message limit
        self.conversation.kill();
        if let Some(sent) = self.last_reply.take() {
            if let Err(e) = self.channel.clear_stop(&sent).await {
                tracing::warn!(?e, "Failed to remove the last Stop button");
            }
        }

        result.map(|_| self.state)
    }

    async fn run_turns<S>(&mut self, events: &mut S) -> Result<(), BotError>
    where
        S: Stream<Item = SessionEvent> + Unpin + Send,
    {
        let opening = self.mention_template(self.strings.battle_opening);
        self.channel.say(&opening).await?;

        while self.state.is_active() && self.conversation.is_alive() {
            let turn = match self.backlog.pop_front() {
                Some(turn) => turn,
                None => match tokio::time::timeout(self.idle_timeout, events.next()).await {
                    Err(_) => {
                        tracing::debug!("Battle owner went quiet");
                        self.state = SessionState::TimedOut(TimeoutKind::Idle);
                        break;
                    }
                    // the handle was dropped, nobody can reach this battle anymore
                    Ok(None) | Ok(Some(SessionEvent::Stop)) => {
                        self.state = SessionState::CancelledByUser;
                        break;
                    }
                    Ok(Some(SessionEvent::Message(turn))) => turn,
                },
            };

            self.take_turn(turn, events).await?;
        }

        Ok(())
    }

    async fn take_turn<S>(&mut self, turn: Turn, events: &mut S) -> Result<(), BotError>
    where
        S: Stream<Item = SessionEvent> + Unpin + Send,
    {
        if turn.content.trim().is_empty() {
            return Ok(());
        }

        if self.strings.is_quit_word(&turn.content) {
            let forfeit = self.mention_template(self.strings.battle_forfeit);
            self.channel.say(&forfeit).await?;
            self.state = SessionState::Forfeited;
            return Ok(());
        }

        self.channel.start_typing().await;

        let Some(result) = self.await_reply(&turn, events).await else {
            self.state = SessionState::CancelledByUser;
            return Ok(());
        };
        // nothing of this turn is sent once the owner pressed Stop
        if self.drain_pending(events) {
            self.state = SessionState::CancelledByUser;
            return Ok(());
        }

        match result {
            Ok(reply) => {
                if let Some(previous) = self.last_reply.take() {
                    self.channel.clear_stop(&previous).await?;
                }
                self.last_reply = Some(self.channel.reply_with_stop(&turn, &reply).await?);
            }
            Err(ConversationError::Timeout) => {
                tokio::time::sleep(BATTLE_TIRED_DELAY).await;
                if self.drain_pending(events) {
                    self.state = SessionState::CancelledByUser;
                    return Ok(());
                }
                let tired = self.mention_template(self.strings.battle_tired);
                self.channel.say(&tired).await?;
                self.state = SessionState::TimedOut(TimeoutKind::Turn);
            }
            Err(ConversationError::MessageLimitExceeded(limit)) => {
                tracing::debug!(limit, "Battle reached its message limit");
                self.channel
                    .reply_to_invocation(self.strings.battle_limit)
                    .await?;
                self.state = SessionState::LimitReached;
            }
            Err(ConversationError::CharacterLimitExceeded { limit, .. }) => {
                let retry = render_template(
                    self.strings.battle_too_long,
                    &[("{limit}", &limit.to_string())],
                );
                self.channel.reply_to_invocation(&retry).await?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    /// Wait for the AI while still listening to the owner. Returns `None` when Stop was
    /// pressed before the AI answered; other messages are queued for later turns.
    async fn await_reply<S>(
        &mut self,
        turn: &Turn,
        events: &mut S,
    ) -> Option<Result<String, ConversationError>>
    where
        S: Stream<Item = SessionEvent> + Unpin + Send,
    {
        let backlog = &mut self.backlog;
        let reply = self.conversation.send(&turn.content);
        tokio::pin!(reply);

        let mut listening = true;
        loop {
            tokio::select! {
                biased;
                result = &mut reply => return Some(result),
                event = events.next(), if listening => match event {
                    Some(SessionEvent::Stop) => return None,
                    Some(SessionEvent::Message(queued)) => backlog.push_back(queued),
                    None => listening = false,
                },
            }
        }
    }

    /// Pick up events that arrived while the AI was answering. Returns true when the owner
    /// pressed Stop in the meantime.
    fn drain_pending<S>(&mut self, events: &mut S) -> bool
    where
        S: Stream<Item = SessionEvent> + Unpin,
    {
        while let Some(Some(event)) = events.next().now_or_never() {
            match event {
                SessionEvent::Stop => return true,
                SessionEvent::Message(turn) => self.backlog.push_back(turn),
            }
        }
        false
    }
}

#[cfg(test)]
mod test {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use futures::channel::mpsc;

    use super::*;
    use crate::locale::Locale;

    #[derive(Debug, Clone, PartialEq)]
    enum Outbound {
        Say(String),
        Invocation(String),
        Reply { to: u64, content: String },
        ClearStop(u64),
    }

    #[derive(Default, Clone)]
    struct RecordingChannel {
        log: Arc<Mutex<Vec<Outbound>>>,
    }

    impl RecordingChannel {
        fn log(&self) -> Vec<Outbound> {
            self.log.lock().unwrap().clone()
        }

        /// Messages that show up in Discord, Stop button edits excluded
        fn messages(&self) -> Vec<Outbound> {
            self.log()
                .into_iter()
                .filter(|o| !matches!(o, Outbound::ClearStop(_)))
                .collect()
        }
    }

    #[async_trait]
    impl BattleChannel for RecordingChannel {
        type Sent = u64;

        async fn start_typing(&mut self) {}

        async fn say(&mut self, content: &str) -> Result<(), BotError> {
            self.log.lock().unwrap().push(Outbound::Say(content.into()));
            Ok(())
        }

        async fn reply_to_invocation(&mut self, content: &str) -> Result<(), BotError> {
            self.log
                .lock()
                .unwrap()
                .push(Outbound::Invocation(content.into()));
            Ok(())
        }

        async fn reply_with_stop(&mut self, turn: &Turn, content: &str) -> Result<u64, BotError> {
            let to = turn.message_id.get();
            self.log.lock().unwrap().push(Outbound::Reply {
                to,
                content: content.into(),
            });
            Ok(to + 1000)
        }

        async fn clear_stop(&mut self, sent: &u64) -> Result<(), BotError> {
            self.log.lock().unwrap().push(Outbound::ClearStop(*sent));
            Ok(())
        }
    }

    struct ScriptedConversation {
        replies: VecDeque<Result<String, ConversationError>>,
        received: Vec<String>,
        alive: bool,
        /// How long each answer takes
        delay: Duration,
    }

    impl ScriptedConversation {
        fn new(replies: Vec<Result<String, ConversationError>>) -> Self {
            Self {
                replies: replies.into(),
                received: vec![],
                alive: true,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl Conversation for ScriptedConversation {
        async fn send(&mut self, message: &str) -> Result<String, ConversationError> {
            self.received.push(message.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.replies
                .pop_front()
                .unwrap_or_else(|| Ok(format!("comeback to {message}")))
        }

        fn kill(&mut self) {
            self.alive = false;
        }

        fn is_alive(&self) -> bool {
            self.alive
        }
    }

    fn turn(id: u64, content: &str) -> SessionEvent {
        SessionEvent::Message(Turn {
            message_id: MessageId::new(id),
            content: content.into(),
        })
    }

    fn session(
        replies: Vec<Result<String, ConversationError>>,
    ) -> (
        BattleSession<ScriptedConversation, RecordingChannel>,
        RecordingChannel,
    ) {
        let channel = RecordingChannel::default();
        let session = BattleSession::new(
            ScriptedConversation::new(replies),
            channel.clone(),
            Locale::English.strings(),
            "<@1>".into(),
        );
        (session, channel)
    }

    fn opening() -> Outbound {
        Outbound::Say(render_template(
            Locale::English.strings().battle_opening,
            &[("{mention}", "<@1>")],
        ))
    }

    fn forfeit() -> Outbound {
        Outbound::Say(render_template(
            Locale::English.strings().battle_forfeit,
            &[("{mention}", "<@1>")],
        ))
    }

    #[tokio::test]
    async fn reply_then_quit_sends_three_messages() {
        let (mut session, channel) = session(vec![Ok("you smell worse".into())]);
        let events = futures::stream::iter(vec![turn(1, "you smell"), turn(2, "quit")]);

        let state = session.run(events).await.unwrap();

        assert_eq!(state, SessionState::Forfeited);
        assert_eq!(
            channel.messages(),
            vec![
                opening(),
                Outbound::Reply {
                    to: 1,
                    content: "you smell worse".into()
                },
                forfeit(),
            ]
        );
        assert!(!session.conversation.is_alive());
        assert_eq!(session.conversation.received, vec!["you smell"]);
        // last Stop button removed on the way out
        assert_eq!(channel.log().last(), Some(&Outbound::ClearStop(1001)));
    }

    #[tokio::test]
    async fn quit_words_are_case_insensitive() {
        for word in ["STOP", "Quit", "stop"] {
            let (mut session, channel) = session(vec![]);
            let events = futures::stream::iter(vec![turn(1, word)]);

            let state = session.run(events).await.unwrap();

            assert_eq!(state, SessionState::Forfeited);
            assert_eq!(channel.messages(), vec![opening(), forfeit()]);
            assert!(session.conversation.received.is_empty());
        }
    }

    #[tokio::test]
    async fn previous_stop_button_is_cleared_on_each_reply() {
        let (mut session, channel) = session(vec![]);
        let events =
            futures::stream::iter(vec![turn(1, "one"), turn(2, "two"), turn(3, "stop")]);

        session.run(events).await.unwrap();

        let log = channel.log();
        let second_reply = log
            .iter()
            .position(|o| matches!(o, Outbound::Reply { to: 2, .. }))
            .unwrap();
        assert_eq!(log[second_reply - 1], Outbound::ClearStop(1001));
    }

    #[tokio::test]
    async fn character_limit_keeps_the_session_alive() {
        let (mut session, channel) = session(vec![
            Err(ConversationError::CharacterLimitExceeded {
                len: 300,
                limit: 250,
            }),
            Ok("short and still weak".into()),
        ]);
        let (send, recv) = mpsc::unbounded();
        send.unbounded_send(turn(1, "a very long roast")).unwrap();
        send.unbounded_send(turn(2, "short roast")).unwrap();
        send.unbounded_send(turn(3, "quit")).unwrap();

        let state = session.run(recv).await.unwrap();

        assert_eq!(state, SessionState::Forfeited);
        let messages = channel.messages();
        assert!(matches!(&messages[1], Outbound::Invocation(m) if m.contains("250")));
        assert_eq!(
            messages[2],
            Outbound::Reply {
                to: 2,
                content: "short and still weak".into()
            }
        );
    }

    #[tokio::test]
    async fn message_limit_ends_and_kills_the_conversation() {
        let (mut session, channel) =
            session(vec![Err(ConversationError::MessageLimitExceeded(10))]);
        let (send, recv) = mpsc::unbounded();
        send.unbounded_send(turn(1, "one more")).unwrap();

        let state = session.run(recv).await.unwrap();

        assert_eq!(state, SessionState::LimitReached);
        assert_eq!(
            channel.messages(),
            vec![
                opening(),
                Outbound::Invocation(Locale::English.strings().battle_limit.into())
            ]
        );
        assert!(!session.conversation.is_alive());
        drop(send);
    }

    #[tokio::test(start_paused = true)]
    async fn turn_timeout_apologises_and_ends() {
        let (mut session, channel) = session(vec![Err(ConversationError::Timeout)]);
        let (send, recv) = mpsc::unbounded();
        send.unbounded_send(turn(1, "hey")).unwrap();

        let state = session.run(recv).await.unwrap();

        assert_eq!(state, SessionState::TimedOut(TimeoutKind::Turn));
        let tired = render_template(
            Locale::English.strings().battle_tired,
            &[("{mention}", "<@1>")],
        );
        assert_eq!(channel.messages(), vec![opening(), Outbound::Say(tired)]);
        assert!(!session.conversation.is_alive());
        drop(send);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_owner_times_out_silently() {
        let (mut session, channel) = session(vec![]);
        let (send, recv) = mpsc::unbounded::<SessionEvent>();

        let state = session.run(recv).await.unwrap();

        assert_eq!(state, SessionState::TimedOut(TimeoutKind::Idle));
        assert_eq!(channel.messages(), vec![opening()]);
        assert!(!session.conversation.is_alive());
        drop(send);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_button_ends_a_parked_session() {
        let (mut session, channel) = session(vec![]);
        let (send, recv) = mpsc::unbounded();

        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            send.unbounded_send(SessionEvent::Stop).unwrap();
            send
        });

        let state = session.run(recv).await.unwrap();
        let _send = stopper.await.unwrap();

        assert_eq!(state, SessionState::CancelledByUser);
        assert_eq!(channel.messages(), vec![opening()]);
    }

    #[tokio::test]
    async fn stop_during_a_turn_suppresses_the_reply() {
        let (mut session, channel) = session(vec![Ok("too late".into())]);
        let (send, recv) = mpsc::unbounded();
        send.unbounded_send(turn(1, "roast")).unwrap();
        send.unbounded_send(SessionEvent::Stop).unwrap();

        let state = session.run(recv).await.unwrap();

        assert_eq!(state, SessionState::CancelledByUser);
        assert_eq!(channel.messages(), vec![opening()]);
        drop(send);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_a_failed_turn_is_answered_sends_nothing() {
        let failures = [
            ConversationError::Timeout,
            ConversationError::MessageLimitExceeded(10),
            ConversationError::CharacterLimitExceeded {
                len: 300,
                limit: 250,
            },
        ];

        for failure in failures {
            let (mut session, channel) = session(vec![Err(failure)]);
            let (send, recv) = mpsc::unbounded();
            send.unbounded_send(turn(1, "roast")).unwrap();
            send.unbounded_send(SessionEvent::Stop).unwrap();

            let state = session.run(recv).await.unwrap();

            assert_eq!(state, SessionState::CancelledByUser);
            assert_eq!(channel.messages(), vec![opening()]);
            assert!(!session.conversation.is_alive());
            drop(send);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_interrupts_a_slow_turn() {
        let (mut session, channel) = session(vec![Ok("eventually".into())]);
        session.conversation.delay = Duration::from_secs(20);
        let (send, recv) = mpsc::unbounded();
        send.unbounded_send(turn(1, "roast")).unwrap();

        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            send.unbounded_send(turn(2, "and another")).unwrap();
            send.unbounded_send(SessionEvent::Stop).unwrap();
            send
        });

        let started = tokio::time::Instant::now();
        let state = session.run(recv).await.unwrap();
        let _send = stopper.await.unwrap();

        assert_eq!(state, SessionState::CancelledByUser);
        assert!(started.elapsed() < Duration::from_secs(20));
        assert_eq!(channel.messages(), vec![opening()]);
        assert_eq!(session.conversation.received, vec!["roast"]);
        assert!(!session.conversation.is_alive());
    }

    #[tokio::test]
    async fn messages_during_a_turn_are_kept_for_the_next_one() {
        let (mut session, channel) = session(vec![]);
        let (send, recv) = mpsc::unbounded();
        send.unbounded_send(turn(1, "first")).unwrap();
        send.unbounded_send(turn(2, "second")).unwrap();
        send.unbounded_send(turn(3, "quit")).unwrap();

        session.run(recv).await.unwrap();

        assert_eq!(session.conversation.received, vec!["first", "second"]);
        assert_eq!(channel.messages().len(), 4);
        drop(send);
    }

    #[tokio::test]
    async fn unexpected_failures_surface_and_kill() {
        let (mut session, _channel) =
            session(vec![Err(ConversationError::Completion("boom".into()))]);
        let events = futures::stream::iter(vec![turn(1, "hi")]);

        let result = session.run(events).await;

        assert!(matches!(
            result,
            Err(BotError::Conversation(ConversationError::Completion(_)))
        ));
        assert!(!session.conversation.is_alive());
    }
}
