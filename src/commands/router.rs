// Command router - turn a message into a command, or hand it to the suggestion poster

use tracing::{debug, warn};

use crate::api::platform::ChatPlatform;
use crate::commands::help::send_help;
use crate::commands::setup::{run_setup, SetupCommand};
use crate::error::PlatformError;
use crate::features::config_store::ConfigStore;
use crate::features::suggestion::{post_suggestion, PostOutcome};
use crate::models::message::InboundMessage;
use crate::utils::config::SuggestionFailurePolicy;

/// Every command the bot recognizes
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Setup(SetupCommand),
}

/// Parse `msg` against `prefix`; `None` means it is not a command
///
/// Prefixed tokens other than `help` and `setup` are not commands either.
pub fn parse_command(prefix: &str, msg: &InboundMessage) -> Option<Command> {
    let tokens = msg.tokens();
    let command = tokens.first()?.to_lowercase();
    let name = command.strip_prefix(&prefix.to_lowercase())?;

    match name {
        "help" => Some(Command::Help),
        "setup" => Some(Command::Setup(SetupCommand::parse(
            &tokens,
            &msg.mentioned_channels,
        ))),
        _ => None,
    }
}

/// Entry point for every inbound message
pub async fn handle_message(
    platform: &dyn ChatPlatform,
    store: &ConfigStore,
    policy: SuggestionFailurePolicy,
    msg: &InboundMessage,
) -> Result<(), PlatformError> {
    if msg.author.bot {
        return Ok(());
    }

    let config = store.get().await;
    match parse_command(config.prefix(), msg) {
        Some(Command::Help) => send_help(platform, msg, config.prefix()).await,
        Some(Command::Setup(command)) => {
            debug!("Setup command from {}: {:?}", msg.author.name, command);
            run_setup(platform, store, msg, command).await
        }
        None if config.suggestion_channel() == Some(msg.channel_id) => {
            match post_suggestion(platform, &config, policy, msg).await? {
                PostOutcome::Posted { failed } if !failed.is_empty() => warn!(
                    "Suggestion from {} posted with failed steps: {:?}",
                    msg.author.name, failed
                ),
                PostOutcome::Aborted { step } => {
                    warn!("Suggestion from {} aborted at {:?}", msg.author.name, step)
                }
                _ => {}
            }
            Ok(())
        }
        None => Ok(()),
    }
}
