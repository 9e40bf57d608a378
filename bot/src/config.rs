use std::path::PathBuf;

use crate::locale::Locale;

const DEFAULT_ROAST_DATABASE_PATH: &str = "database/roast.json";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

pub struct BotConfig {
    pub env: Env,
    pub discord_token: String,
    pub locale: Locale,
    pub command_name: String,
    /// Text prefix accepted in addition to mentioning the bot
    pub command_prefix: Option<String>,
    pub roast_database_path: PathBuf,
    /// Battles are disabled when this is `None`
    pub openai: Option<OpenAiConfig>,
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable `{0}` is required")]
    Missing(&'static str),

    #[error("Could not get the environment variable `{0}` due to unicode error")]
    NotUnicode(&'static str),

    #[error("Environment variable `{dependent}` is set but `{required}` is not")]
    Incomplete {
        dependent: &'static str,
        required: &'static str,
    },

    #[error(transparent)]
    Locale(#[from] crate::locale::UnknownLocale),
}

fn var(key: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(env) if env.trim().is_empty() => Ok(None),
        Ok(env) => Ok(Some(env)),
        Err(std::env::VarError::NotPresent) => {
            tracing::debug!("Missing environment variable `{key}`");
            Ok(None)
        }
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
    }
}

impl BotConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(var)
    }

    /// Build the config from any variable source, `lookup` returns `Ok(None)` for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let discord_token = match lookup("DISCORD_TOKEN")? {
            Some(token) => token,
            None => lookup("TOKEN")?.ok_or(ConfigError::Missing("DISCORD_TOKEN"))?,
        };

        let locale = match lookup("BOT_LOCALE")? {
            Some(locale) => locale.parse()?,
            None => Locale::default(),
        };

        let openai = match (lookup("OPENAI_API_KEY")?, lookup("OPENAI_MODEL")?) {
            (Some(api_key), model) => Some(OpenAiConfig {
                api_key,
                model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            }),
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    dependent: "OPENAI_MODEL",
                    required: "OPENAI_API_KEY",
                });
            }
            (None, None) => None,
        };

        Ok(BotConfig {
            env: match lookup("ENVIRONMENT")? {
                Some(env) => match env.as_str() {
                    "dev" => Env::Dev,
                    "staging" => Env::Staging,
                    "production" => Env::Production,
                    _ => Env::Dev,
                },
                None => Env::Dev,
            },
            discord_token,
            command_name: lookup("BOT_COMMAND")?
                .unwrap_or_else(|| locale.strings().default_command.to_string()),
            locale,
            command_prefix: lookup("BOT_PREFIX")?,
            roast_database_path: lookup("ROAST_DATABASE_PATH")?
                .unwrap_or_else(|| DEFAULT_ROAST_DATABASE_PATH.to_string())
                .into(),
            openai,
        })
    }
}
