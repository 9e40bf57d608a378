use std::sync::LazyLock;

use regex::Regex;
use serenity::all::{Context, GuildId, Message, UserId};

use crate::roast::RoastTarget;

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@!?(\d+)>$").expect("user mention regex is valid"));

/// Recognizes `<prefix><command> [argument]`. The bot mention always works as a prefix.
pub struct CommandParser {
    name: String,
    prefix: Option<String>,
}

impl CommandParser {
    pub fn new(name: impl Into<String>, prefix: Option<String>) -> Self {
        Self {
            name: name.into(),
            prefix,
        }
    }

    fn strip_prefix<'a>(&self, content: &'a str, bot_user_id: UserId) -> Option<&'a str> {
        let mentions = [format!("<@{bot_user_id}>"), format!("<@!{bot_user_id}>")];
        mentions
            .iter()
            .map(String::as_str)
            .chain(self.prefix.as_deref())
            .find_map(|p| content.strip_prefix(p))
    }

    /// Returns `None` when the message is not this command, otherwise its first argument
    pub fn parse(&self, content: &str, bot_user_id: UserId) -> Option<Option<String>> {
        let rest = self
            .strip_prefix(content.trim_start(), bot_user_id)?
            .trim_start();

        let (command, tail) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        if command != self.name {
            return None;
        }

        Some(first_argument(tail.trim()))
    }
}

/// First word of the argument list, or the quoted text if it starts with a quote
fn first_argument(tail: &str) -> Option<String> {
    if tail.is_empty() {
        return None;
    }

    if let Some(quoted) = tail.strip_prefix('"') {
        let arg = quoted.split('"').next().unwrap_or_default();
        return (!arg.is_empty()).then(|| arg.to_string());
    }

    tail.split_whitespace().next().map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    Missing,
    /// Start a battle with the bot
    Me,
    User(UserId),
    Name(String),
}

impl TargetSpec {
    pub fn parse(argument: Option<&str>) -> Self {
        let Some(arg) = argument.map(str::trim).filter(|a| !a.is_empty()) else {
            return TargetSpec::Missing;
        };

        if arg == "me" {
            return TargetSpec::Me;
        }

        let id = USER_MENTION
            .captures(arg)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .or_else(|| arg.chars().all(|c| c.is_ascii_digit()).then_some(arg))
            .and_then(|id| id.parse::<u64>().ok())
            .filter(|id| *id != 0);

        match id {
            Some(id) => TargetSpec::User(UserId::new(id)),
            None => TargetSpec::Name(arg.to_string()),
        }
    }
}

fn member_by_name(ctx: &Context, guild_id: GuildId, name: &str) -> Option<RoastTarget> {
    let guild = ctx.cache.guild(guild_id)?;
    guild.member_named(name).map(|member| RoastTarget {
        id: member.user.id,
        display_name: member.display_name().to_string(),
    })
}

/// Look the target up the way a member converter would. Unknown users resolve to `None`.
pub async fn resolve_target(
    ctx: &Context,
    invocation: &Message,
    spec: &TargetSpec,
) -> Option<RoastTarget> {
    match spec {
        TargetSpec::Missing | TargetSpec::Me => None,
        TargetSpec::Name(name) => member_by_name(ctx, invocation.guild_id?, name),
        TargetSpec::User(id) => match invocation.guild_id {
            Some(guild_id) => guild_id
                .member(ctx, *id)
                .await
                .inspect_err(|e| tracing::debug!(?e, user_id = id.get(), "Target is not a member"))
                .ok()
                .map(|member| RoastTarget {
                    id: member.user.id,
                    display_name: member.display_name().to_string(),
                }),
            None => id
                .to_user(ctx)
                .await
                .inspect_err(|e| tracing::debug!(?e, user_id = id.get(), "Unknown target user"))
                .ok()
                .map(|user| RoastTarget {
                    id: user.id,
                    display_name: user.display_name().to_string(),
                }),
        },
    }
}
