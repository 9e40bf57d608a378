use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DefaultKeyedStateStore,
};
use serenity::all::{ChannelId, UserId};

/// Per-user command cooldown: one invocation per period
pub struct Cooldown<C: Clock = DefaultClock> {
    limiter: RateLimiter<UserId, DefaultKeyedStateStore<UserId>, C, NoOpMiddleware<C::Instant>>,
    clock: C,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self::with_clock(period, DefaultClock::default())
    }
}

impl<C: Clock> Cooldown<C> {
    pub fn with_clock(period: Duration, clock: C) -> Self {
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(std::num::NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::new(quota, DefaultKeyedStateStore::default(), clock.clone()),
            clock,
        }
    }

    /// Take the user's token, or return how long until it is available again
    pub fn check(&self, user: UserId) -> Result<(), Duration> {
        // users whose cooldown is over are forgotten
        self.limiter.retain_recent();

        self.limiter
            .check_key(&user)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

/// Seconds with one decimal, the way the cooldown notice shows them
pub fn format_retry_after(wait: Duration) -> String {
    format!("{:.1}", wait.as_secs_f64())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    UserBusy,
    ChannelBusy,
}

#[derive(Default)]
struct GateCounts {
    per_user: HashMap<UserId, usize>,
    per_channel: HashMap<ChannelId, usize>,
}

/// Caps how many roast flows run at once per user and per channel
#[derive(Clone)]
pub struct ConcurrencyGate {
    counts: Arc<Mutex<GateCounts>>,
    max_per_user: usize,
    max_per_channel: usize,
}

impl ConcurrencyGate {
    pub fn new(max_per_user: usize, max_per_channel: usize) -> Self {
        Self {
            counts: Arc::new(Mutex::new(GateCounts::default())),
            max_per_user,
            max_per_channel,
        }
    }

    /// Reserve a slot for `user` in `channel`. The slot is released when the permit drops.
    pub fn acquire(&self, user: UserId, channel: ChannelId) -> Result<GatePermit, GateRejection> {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);

        if counts.per_user.get(&user).copied().unwrap_or(0) >= self.max_per_user {
            return Err(GateRejection::UserBusy);
        }
        if counts.per_channel.get(&channel).copied().unwrap_or(0) >= self.max_per_channel {
            return Err(GateRejection::ChannelBusy);
        }

        *counts.per_user.entry(user).or_default() += 1;
        *counts.per_channel.entry(channel).or_default() += 1;

        Ok(GatePermit {
            counts: self.counts.clone(),
            user,
            channel,
        })
    }
}

#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct GatePermit {
    counts: Arc<Mutex<GateCounts>>,
    user: UserId,
    channel: ChannelId,
}

fn release<K: std::hash::Hash + Eq>(map: &mut HashMap<K, usize>, key: &K) {
    if let Some(n) = map.get_mut(key) {
        *n = n.saturating_sub(1);
        if *n == 0 {
            map.remove(key);
        }
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        release(&mut counts.per_user, &self.user);
        release(&mut counts.per_channel, &self.channel);
    }
}
