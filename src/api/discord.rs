// Discord implementation of the chat platform, on top of serenity's HTTP client

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use poise::serenity_prelude as serenity;
use regex::Regex;
use tracing::debug;

use crate::api::platform::ChatPlatform;
use crate::error::PlatformError;
use crate::models::message::{Author, GuildInfo, InboundMessage};

const FALLBACK_FILENAME: &str = "image.png";

static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<#(\d+)>").expect("channel mention pattern"));

/// Talks to Discord through serenity; downloads files with reqwest
pub struct DiscordPlatform {
    http: Arc<serenity::Http>,
    http_client: reqwest::Client,
}

impl DiscordPlatform {
    pub fn new(http: Arc<serenity::Http>, http_client: reqwest::Client) -> Self {
        Self { http, http_client }
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn reply(&self, msg: &InboundMessage, content: &str) -> Result<(), PlatformError> {
        msg.channel_id
            .send_message(
                &self.http,
                serenity::CreateMessage::new()
                    .content(content)
                    .reference_message((msg.channel_id, msg.id)),
            )
            .await?;
        Ok(())
    }

    async fn say(&self, channel: serenity::ChannelId, content: &str) -> Result<(), PlatformError> {
        channel.say(&self.http, content).await?;
        Ok(())
    }

    async fn send_embed(
        &self,
        channel: serenity::ChannelId,
        embed: serenity::CreateEmbed,
    ) -> Result<serenity::MessageId, PlatformError> {
        let sent = channel
            .send_message(&self.http, serenity::CreateMessage::new().embed(embed))
            .await?;
        Ok(sent.id)
    }

    async fn delete_message(
        &self,
        channel: serenity::ChannelId,
        message: serenity::MessageId,
    ) -> Result<(), PlatformError> {
        channel.delete_message(&self.http, message).await?;
        Ok(())
    }

    async fn react(
        &self,
        channel: serenity::ChannelId,
        message: serenity::MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        let reaction = serenity::ReactionType::try_from(emoji)
            .map_err(|_| PlatformError::InvalidEmoji(emoji.to_string()))?;
        channel.create_reaction(&self.http, message, reaction).await?;
        Ok(())
    }

    async fn send_file(&self, channel: serenity::ChannelId, url: &str) -> Result<(), PlatformError> {
        let bytes = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        let attachment = serenity::CreateAttachment::bytes(bytes.to_vec(), attachment_filename(url));
        channel
            .send_message(&self.http, serenity::CreateMessage::new().add_file(attachment))
            .await?;
        Ok(())
    }
}

/// Build the platform-neutral view of a serenity message
///
/// Guild data and permissions come from the cache; a cache miss leaves the
/// guild footer empty and treats the author as lacking MANAGE_CHANNELS.
/// Permissions are guild-wide: channel overwrites do not grant or deny setup.
pub fn inbound_message(ctx: &serenity::Context, msg: &serenity::Message) -> InboundMessage {
    let (guild, can_manage_channels) = match msg.guild(&ctx.cache) {
        Some(guild) => {
            let info = GuildInfo {
                name: guild.name.clone(),
                icon_url: guild.icon_url(),
            };
            let can_manage = msg.member.as_ref().is_some_and(|member| {
                let everyone = guild
                    .roles
                    .get(&serenity::RoleId::new(guild.id.get()))
                    .map(|role| role.permissions)
                    .unwrap_or_else(serenity::Permissions::empty);
                let roles = member
                    .roles
                    .iter()
                    .filter_map(|id| guild.roles.get(id))
                    .map(|role| role.permissions);
                grants_manage_channels(guild.owner_id == msg.author.id, everyone, roles)
            });
            (Some(info), can_manage)
        }
        None => (None, false),
    };

    let mut mentioned_channels = channel_mentions(&msg.content);
    for mention in &msg.mention_channels {
        if !mentioned_channels.contains(&mention.id) {
            mentioned_channels.push(mention.id);
        }
    }

    InboundMessage {
        id: msg.id,
        channel_id: msg.channel_id,
        author: Author {
            id: msg.author.id,
            name: msg.author.name.clone(),
            avatar_url: msg
                .author
                .avatar_url()
                .unwrap_or_else(|| msg.author.default_avatar_url()),
            bot: msg.author.bot,
        },
        content: msg.content.clone(),
        guild,
        attachments: msg.attachments.iter().map(|a| a.proxy_url.clone()).collect(),
        mentioned_channels,
        can_manage_channels,
    }
}

/// Whether guild-level permissions allow changing the setup
fn grants_manage_channels(
    is_owner: bool,
    everyone: serenity::Permissions,
    roles: impl IntoIterator<Item = serenity::Permissions>,
) -> bool {
    if is_owner {
        return true;
    }
    let perms = roles.into_iter().fold(everyone, |acc, perms| acc | perms);
    perms.contains(serenity::Permissions::ADMINISTRATOR)
        || perms.contains(serenity::Permissions::MANAGE_CHANNELS)
}

/// Channels mentioned as `<#id>` anywhere in `content`, first occurrence first
fn channel_mentions(content: &str) -> Vec<serenity::ChannelId> {
    let mut channels: Vec<serenity::ChannelId> = Vec::new();
    for caps in CHANNEL_MENTION.captures_iter(content) {
        let Some(id) = caps[1].parse::<u64>().ok().filter(|&id| id != 0) else {
            continue;
        };
        let channel = serenity::ChannelId::new(id);
        if !channels.contains(&channel) {
            channels.push(channel);
        }
    }
    channels
}

/// File name for an attachment downloaded from `url`
fn attachment_filename(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && name.contains('.'))
        .unwrap_or(FALLBACK_FILENAME)
        .to_string()
}
