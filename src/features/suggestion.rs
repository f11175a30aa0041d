// Suggestion Poster
// Reposts member suggestions as an embed with vote reactions

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use crate::api::platform::ChatPlatform;
use crate::error::PlatformError;
use crate::models::config::BotConfig;
use crate::models::message::{InboundMessage, Suggestion};
use crate::utils::config::{colors, SuggestionFailurePolicy};

/// Steps of the repost pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStep {
    DeleteOriginal,
    SendEmbed,
    Upvote,
    Downvote,
    SendImageLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Too long; the original message was left in place
    Rejected { limit: u32 },
    /// The pipeline ran to the end; `failed` lists the steps that errored
    Posted { failed: Vec<PostStep> },
    /// The pipeline stopped at `step`
    Aborted { step: PostStep },
}

/// Build the embed that replaces a member's message
pub fn suggestion_embed(suggestion: &Suggestion) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .author(
            serenity::CreateEmbedAuthor::new(&suggestion.author_name)
                .icon_url(&suggestion.author_avatar),
        )
        .color(colors::SUGGESTION)
        .thumbnail(&suggestion.author_avatar);

    if !suggestion.text.is_empty() {
        embed = embed.description(format!("**{}**", suggestion.text));
    }

    if let Some(guild_name) = &suggestion.guild_name {
        let mut footer = serenity::CreateEmbedFooter::new(guild_name);
        if let Some(icon) = &suggestion.guild_icon {
            footer = footer.icon_url(icon);
        }
        embed = embed.footer(footer);
    }

    if let Some(image) = &suggestion.image {
        embed = embed.image(image);
    }

    embed
}

/// Repost `msg` as a suggestion
///
/// Once the original message is deleted there is no way back: later
/// failures are handled by `policy` and never restore the original. A failed
/// delete always stops the pipeline. Only a failed rejection reply is
/// returned as an error.
pub async fn post_suggestion(
    platform: &dyn ChatPlatform,
    config: &BotConfig,
    policy: SuggestionFailurePolicy,
    msg: &InboundMessage,
) -> Result<PostOutcome, PlatformError> {
    let suggestion = Suggestion::from_message(msg);

    if let Some(limit) = config.max_suggestion_length() {
        if suggestion.char_count() > limit as usize {
            debug!(
                "Rejected suggestion from {}: {} > {} characters",
                msg.author.name,
                suggestion.char_count(),
                limit
            );
            let notice = format!(
                "Your suggestion is longer than the maximum suggestion length ({} characters).",
                limit
            );
            platform.reply(msg, &notice).await?;
            return Ok(PostOutcome::Rejected { limit });
        }
    }

    if let Err(e) = platform.delete_message(msg.channel_id, msg.id).await {
        error!("Failed to delete suggestion from {}: {:?}", msg.author.name, e);
        return Ok(PostOutcome::Aborted {
            step: PostStep::DeleteOriginal,
        });
    }

    let mut failed = Vec::new();

    let posted = match platform
        .send_embed(msg.channel_id, suggestion_embed(&suggestion))
        .await
    {
        Ok(id) => Some(id),
        Err(e) => {
            if record_failure(policy, PostStep::SendEmbed, &e, &mut failed) {
                return Ok(notify_author(platform, msg, PostStep::SendEmbed).await);
            }
            None
        }
    };

    // Reactions need the posted embed
    if let Some(posted) = posted {
        let votes = [
            (PostStep::Upvote, config.upvote_emoji()),
            (PostStep::Downvote, config.downvote_emoji()),
        ];
        for (step, emoji) in votes {
            let Some(emoji) = emoji else {
                warn!("No emoji configured for {:?}, skipping reaction", step);
                continue;
            };
            if let Err(e) = platform.react(msg.channel_id, posted, emoji).await {
                if record_failure(policy, step, &e, &mut failed) {
                    return Ok(notify_author(platform, msg, step).await);
                }
            }
        }
    }

    match config.image_link() {
        Some(link) => {
            if let Err(e) = platform.send_file(msg.channel_id, link).await {
                if record_failure(policy, PostStep::SendImageLink, &e, &mut failed) {
                    return Ok(notify_author(platform, msg, PostStep::SendImageLink).await);
                }
            }
        }
        None => debug!("No image link configured"),
    }

    info!("Posted suggestion from {}", msg.author.name);
    Ok(PostOutcome::Posted { failed })
}

/// Log a failed step; returns true when the pipeline should stop
fn record_failure(
    policy: SuggestionFailurePolicy,
    step: PostStep,
    err: &PlatformError,
    failed: &mut Vec<PostStep>,
) -> bool {
    error!("Suggestion step {:?} failed: {:?}", step, err);
    failed.push(step);
    policy == SuggestionFailurePolicy::AbortAndNotify
}

async fn notify_author(
    platform: &dyn ChatPlatform,
    msg: &InboundMessage,
    step: PostStep,
) -> PostOutcome {
    let notice = format!(
        "<@{}> something went wrong while posting your suggestion. Please submit it again.",
        msg.author.id
    );
    if let Err(e) = platform.say(msg.channel_id, &notice).await {
        error!("Failed to notify {} about a lost suggestion: {:?}", msg.author.name, e);
    }
    PostOutcome::Aborted { step }
}
