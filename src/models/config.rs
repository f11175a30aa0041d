use poise::serenity_prelude as serenity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::config::DEFAULT_PREFIX;

/// Bot configuration document, stored as `config.json`
///
/// Every field is optional because the file is hand-editable and has no
/// schema version. Keys this struct does not know about are kept in `extra`
/// so a persist never drops them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvote_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvote_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_suggestion_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BotConfig {
    /// Command prefix, falling back to the built-in default
    pub fn prefix(&self) -> &str {
        self.prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PREFIX)
    }

    /// Configured suggestion channel, if it holds a valid snowflake
    pub fn suggestion_channel(&self) -> Option<serenity::ChannelId> {
        self.suggestion_channel_id
            .as_deref()
            .and_then(|id| id.trim().parse::<u64>().ok())
            .filter(|&id| id != 0)
            .map(serenity::ChannelId::new)
    }

    /// Length limit; zero from a hand-edited file counts as unset
    pub fn max_suggestion_length(&self) -> Option<u32> {
        self.max_suggestion_length.filter(|&len| len > 0)
    }

    pub fn upvote_emoji(&self) -> Option<&str> {
        non_empty(self.upvote_emoji.as_deref())
    }

    pub fn downvote_emoji(&self) -> Option<&str> {
        non_empty(self.downvote_emoji.as_deref())
    }

    pub fn image_link(&self) -> Option<&str> {
        non_empty(self.image_link.as_deref())
    }

    /// Apply a single mutation to the in-memory document
    pub fn apply(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::SuggestionChannel(channel_id) => {
                self.suggestion_channel_id = Some(channel_id.to_string());
            }
            ConfigUpdate::VoteEmoji { upvote, downvote } => {
                self.upvote_emoji = Some(upvote);
                self.downvote_emoji = Some(downvote);
            }
            ConfigUpdate::MaxSuggestionLength(length) => {
                self.max_suggestion_length = Some(length);
            }
            ConfigUpdate::ImageLink(link) => {
                self.image_link = Some(link);
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A mutation produced by one of the `setup` sub-commands
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    SuggestionChannel(serenity::ChannelId),
    VoteEmoji { upvote: String, downvote: String },
    MaxSuggestionLength(u32),
    ImageLink(String),
}
