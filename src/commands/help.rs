// Help command - list every command the bot understands

use poise::serenity_prelude as serenity;

use crate::api::platform::ChatPlatform;
use crate::error::PlatformError;
use crate::models::message::InboundMessage;
use crate::utils::config::colors;

/// Command usage and description pairs, rendered with the active prefix
pub fn command_table(prefix: &str) -> Vec<(String, &'static str)> {
    vec![
        (
            format!("{prefix}setup #channel"),
            "Sets the suggestion channel. Requires the Manage Channels permission.",
        ),
        (
            format!("{prefix}setup react <upvote_emoji> <downvote_emoji>"),
            "Updates the emoji used to vote on suggestions.",
        ),
        (
            format!("{prefix}setup line <length>"),
            "Changes the maximum suggestion length.",
        ),
        (
            format!("{prefix}setup imageLink <link>"),
            "Sets the image posted after every suggestion.",
        ),
        (format!("{prefix}help"), "Shows this list of commands."),
    ]
}

pub fn help_embed(prefix: &str) -> serenity::CreateEmbed {
    command_table(prefix).into_iter().fold(
        serenity::CreateEmbed::new()
            .title("Command List")
            .description("Here are the available commands:")
            .color(colors::HELP)
            .timestamp(serenity::Timestamp::now()),
        |embed, (usage, description)| embed.field(usage, description, false),
    )
}

/// Reply to `msg` with the command list
pub async fn send_help(
    platform: &dyn ChatPlatform,
    msg: &InboundMessage,
    prefix: &str,
) -> Result<(), PlatformError> {
    platform.send_embed(msg.channel_id, help_embed(prefix)).await?;
    Ok(())
}
