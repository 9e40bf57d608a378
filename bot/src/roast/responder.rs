use rand::{Rng, seq::SliceRandom};
use serenity::all::{Mentionable, UserId};

use crate::{
    locale::Strings,
    roast::store::{RenderedRoast, RoastStore},
    utils::render_template,
};

/// Range, in seconds from now, of the fake "roast ready at" timestamps
const READY_AT_OFFSET_SECS: std::ops::Range<i64> = 50_000..500_000_000;

/// A resolved user to roast
#[derive(Debug, Clone)]
pub struct RoastTarget {
    pub id: UserId,
    pub display_name: String,
}

/// Everything needed to decide on a reply, gathered before any await point
pub struct RoastRequest<'a> {
    pub strings: &'static Strings,
    pub store: &'a RoastStore,
    pub invoker: &'a RoastTarget,
    pub bot_user_id: UserId,
    /// Members in the guild the command came from, if any
    pub member_count: Option<u64>,
    /// Unix timestamp in seconds
    pub now: i64,
}

/// What the single target command sends
#[derive(Debug, Default)]
pub struct RoastPlan {
    /// Reply to the command message
    pub reply: Option<String>,
    /// Roast posted in the channel, already prefixed with the target mention
    pub roast: Option<RenderedRoast>,
}

fn pick<R: Rng + ?Sized>(lines: &'static [&'static str], rng: &mut R) -> &'static str {
    lines.choose(rng).copied().unwrap_or_default()
}

impl RoastRequest<'_> {
    fn fill<R: Rng + ?Sized>(&self, line: &str, rng: &mut R) -> String {
        let ready_at = (self.now + rng.gen_range(READY_AT_OFFSET_SECS)).to_string();
        let others = self.member_count.unwrap_or(1).saturating_sub(1).to_string();
        render_template(line, &[("{ready_at}", &ready_at), ("{others}", &others)])
    }

    pub fn plan<R: Rng + ?Sized>(&self, target: Option<&RoastTarget>, rng: &mut R) -> RoastPlan {
        let Some(target) = target else {
            return RoastPlan {
                reply: Some(self.fill(pick(self.strings.no_target, rng), rng)),
                roast: None,
            };
        };

        if target.id == self.invoker.id {
            return RoastPlan {
                reply: Some(self.fill(pick(self.strings.self_target, rng), rng)),
                roast: None,
            };
        }

        // the bot refuses, then roasts anyway
        let reply = (target.id == self.bot_user_id)
            .then(|| self.fill(pick(self.strings.bot_target, rng), rng));

        let roast = self.store.choose(rng).map(|entry| {
            let rendered = entry.render(&target.display_name, &self.invoker.display_name);
            RenderedRoast {
                text: format!("{} {}", target.id.mention(), rendered.text),
                explanation: rendered.explanation,
            }
        });
        if roast.is_none() {
            tracing::warn!("Roast database has no entries");
        }

        RoastPlan { reply, roast }
    }
}

/// Messages that count as asking for a roast to be explained
pub fn is_explain_trigger(content: &str) -> bool {
    const TRIGGERS: [&str; 4] = ["what", "what?", "i dont get it", "i don't get it"];

    let content = content.to_lowercase();
    TRIGGERS.iter().any(|t| content.starts_with(t))
}
