use std::str::FromStr;

mod en;
mod pt;

/// Every user-facing line the bot can send. Templates use `{placeholder}` markers that are
/// filled with [`crate::utils::render_template`].
#[derive(Debug)]
pub struct Strings {
    /// Command name used when `BOT_COMMAND` is not set
    pub default_command: &'static str,
    /// Extra forfeit words on top of "stop" and "quit"
    pub quit_words: &'static [&'static str],

    /// Replies when nobody was named. `{ready_at}` is a unix timestamp.
    pub no_target: &'static [&'static str],
    /// Replies when the invoker names themselves. `{ready_at}`, `{others}`.
    pub self_target: &'static [&'static str],
    /// Replies when the invoker names the bot
    pub bot_target: &'static [&'static str],

    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pub stop_label: &'static str,

    pub battle_prompt: &'static str,
    pub battle_accepted: &'static str,
    pub battle_cancelled: &'static str,
    pub not_your_battle: &'static str,

    /// `{mention}`
    pub battle_opening: &'static str,
    /// `{mention}`
    pub battle_forfeit: &'static str,
    /// `{mention}`
    pub battle_tired: &'static str,
    pub battle_limit: &'static str,
    /// `{limit}`
    pub battle_too_long: &'static str,
    pub battle_stopped: &'static str,
    pub battles_offline: &'static str,

    /// `{retry_after}` in seconds with one decimal
    pub cooldown: &'static str,
    pub busy: &'static str,

    /// Language the AI is told to answer in
    pub persona_language: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Portuguese,
}

#[derive(thiserror::Error, Debug)]
#[error("Unknown locale `{0}`, expected one of `en`, `pt`")]
pub struct UnknownLocale(String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::English),
            "pt" | "pt-br" | "portuguese" => Ok(Locale::Portuguese),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

impl Locale {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::English => &en::STRINGS,
            Locale::Portuguese => &pt::STRINGS,
        }
    }
}

impl Strings {
    /// Whether a battle message means the user wants out
    pub fn is_quit_word(&self, content: &str) -> bool {
        let content = content.trim().to_lowercase();
        content == "stop" || content == "quit" || self.quit_words.contains(&content.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_locale_aliases() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::Portuguese);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn stop_and_quit_work_in_every_locale() {
        for locale in [Locale::English, Locale::Portuguese] {
            let strings = locale.strings();
            assert!(strings.is_quit_word("STOP"));
            assert!(strings.is_quit_word(" Quit "));
            assert!(!strings.is_quit_word("stop it"));
        }
        assert!(Locale::Portuguese.strings().is_quit_word("Parar"));
        assert!(!Locale::English.strings().is_quit_word("parar"));
    }

    #[test]
    fn default_commands_differ_per_deployment() {
        assert_eq!(Locale::English.strings().default_command, "roast");
        assert_eq!(Locale::Portuguese.strings().default_command, "ativar");
    }
}
