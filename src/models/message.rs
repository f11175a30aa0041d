use poise::serenity_prelude as serenity;

/// Platform-neutral view of an inbound guild message
///
/// Built once per `Message` event by the Discord adapter so the command
/// router and the suggestion poster never touch serenity's event types.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: serenity::MessageId,
    pub channel_id: serenity::ChannelId,
    pub author: Author,
    pub content: String,
    pub guild: Option<GuildInfo>,
    /// Proxy URLs of the message attachments, in upload order
    pub attachments: Vec<String>,
    /// Channels mentioned in the content, in order of appearance
    pub mentioned_channels: Vec<serenity::ChannelId>,
    /// Whether the author holds MANAGE_CHANNELS in this channel
    pub can_manage_channels: bool,
}

#[derive(Debug, Clone)]
pub struct Author {
    pub id: serenity::UserId,
    pub name: String,
    pub avatar_url: String,
    pub bot: bool,
}

#[derive(Debug, Clone)]
pub struct GuildInfo {
    pub name: String,
    pub icon_url: Option<String>,
}

impl InboundMessage {
    /// Whitespace-separated tokens of the content
    pub fn tokens(&self) -> Vec<&str> {
        self.content.split_whitespace().collect()
    }
}

/// A member suggestion, alive only for one handling pass
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub author_name: String,
    pub author_avatar: String,
    pub text: String,
    pub image: Option<String>,
    pub guild_name: Option<String>,
    pub guild_icon: Option<String>,
}

impl Suggestion {
    pub fn from_message(msg: &InboundMessage) -> Self {
        Self {
            author_name: msg.author.name.clone(),
            author_avatar: msg.author.avatar_url.clone(),
            text: msg.tokens().join(" "),
            image: msg.attachments.first().cloned(),
            guild_name: msg.guild.as_ref().map(|g| g.name.clone()),
            guild_icon: msg.guild.as_ref().and_then(|g| g.icon_url.clone()),
        }
    }

    /// Length as counted against the configured limit
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
