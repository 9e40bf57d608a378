use dotenv::dotenv;
use serenity::{Client, all::GatewayIntents};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::{
    config::{BotConfig, Env},
    discord::bot::DiscordEventHandler,
    roast::RoastStore,
};

mod config;
mod discord;
mod error;
mod locale;
mod roast;
mod utils;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    let config = BotConfig::new_from_env();

    let json_logs = config
        .as_ref()
        .is_ok_and(|config| config.env == Env::Production);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,roastbot=debug".into()))
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = RoastStore::load(&config.roast_database_path)?;
    tracing::info!(
        entries = store.len(),
        locale = ?config.locale,
        command = %config.command_name,
        "Roast database loaded"
    );

    let handler = DiscordEventHandler::new(&config, store);

    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await?;

    client.start().await?;

    Ok(())
}
