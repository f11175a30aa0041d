// Suggestion Bot - Rust Edition
// A single-guild Discord bot that turns channel messages into voteable suggestions

mod api;
mod commands;
mod error;
mod features;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::discord::{inbound_message, DiscordPlatform};
use crate::commands::router::handle_message;
use crate::features::config_store::ConfigStore;
use crate::features::presence::spawn_presence_updater;
use crate::utils::config::Settings;

/// User data shared across all event handlers
pub struct Data {
    pub http_client: reqwest::Client,
    pub config: Arc<ConfigStore>,
    pub settings: Settings,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("http_client", &"reqwest::Client")
            .field("config", &self.config.path())
            .field("settings", &self.settings)
            .finish()
    }
}

type Error = Box<dyn std::error::Error + Send + Sync>;

/// Route gateway events to the bot features
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        let msg = inbound_message(ctx, new_message);
        let platform = DiscordPlatform::new(ctx.http.clone(), data.http_client.clone());

        if let Err(e) =
            handle_message(&platform, &data.config, data.settings.failure_policy, &msg).await
        {
            error!("Failed to handle message {}: {:?}", new_message.id, e);
        }
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("Invalid settings")?;

    info!("Starting Suggestion Bot (Rust Edition)...");

    let config = Arc::new(ConfigStore::load(&settings.config_path).await);

    // Build HTTP client for image downloads
    let http_client = reqwest::Client::builder()
        .user_agent("Suggestion-Bot/1.0")
        .build()
        .context("Failed to create HTTP client")?;

    let token = settings.token.clone();

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            on_error: |error| {
                Box::pin(async move {
                    error!("Framework error: {:?}", error);
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, _framework| {
            Box::pin(async move {
                info!("[NAME] {}", ready.user.name);
                info!("[GUILDS] {}", ready.guilds.len());

                spawn_presence_updater(
                    ctx.clone(),
                    settings.presence_statuses.clone(),
                    settings.presence_interval,
                );

                Ok(Data {
                    http_client,
                    config,
                    settings,
                })
            })
        })
        .build();

    // MESSAGE_CONTENT is privileged, enable it in the Discord Dev Portal
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Failed to create client")?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to register Ctrl+C handler: {:?}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    client.start().await.context("Client error")?;

    info!("Goodbye!");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "suggestbot_rs=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
