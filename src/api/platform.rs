// Outbound chat platform calls used by the command and suggestion handlers

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use crate::error::PlatformError;
use crate::models::message::InboundMessage;

/// Everything the handlers need to say or do in a channel
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Reply to `msg` in its channel
    async fn reply(&self, msg: &InboundMessage, content: &str) -> Result<(), PlatformError>;

    /// Send a plain text message
    async fn say(&self, channel: serenity::ChannelId, content: &str) -> Result<(), PlatformError>;

    /// Send an embed and return the id of the created message
    async fn send_embed(
        &self,
        channel: serenity::ChannelId,
        embed: serenity::CreateEmbed,
    ) -> Result<serenity::MessageId, PlatformError>;

    async fn delete_message(
        &self,
        channel: serenity::ChannelId,
        message: serenity::MessageId,
    ) -> Result<(), PlatformError>;

    /// React with a unicode emoji or a `<:name:id>` custom emoji
    async fn react(
        &self,
        channel: serenity::ChannelId,
        message: serenity::MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError>;

    /// Post the file found at `url` as an attachment
    async fn send_file(&self, channel: serenity::ChannelId, url: &str) -> Result<(), PlatformError>;
}

#[cfg(test)]
pub mod recording {
    use std::sync::Mutex;

    use super::*;

    /// One outbound call captured by `RecordingPlatform`
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Reply(String),
        Say(serenity::ChannelId, String),
        /// The embed serialized as Discord would receive it
        Embed(serenity::ChannelId, serde_json::Value),
        Delete(serenity::MessageId),
        React(serenity::MessageId, String),
        File(serenity::ChannelId, String),
    }

    /// Which call kind should fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailOn {
        Delete,
        Embed,
        React,
        File,
    }

    impl FailOn {
        fn name(self) -> &'static str {
            match self {
                FailOn::Delete => "delete",
                FailOn::Embed => "embed",
                FailOn::React => "react",
                FailOn::File => "file",
            }
        }
    }

    pub const POSTED_MESSAGE: u64 = 800_000_000_000_000_001;

    /// Records every call instead of talking to Discord
    #[derive(Debug, Default)]
    pub struct RecordingPlatform {
        calls: Mutex<Vec<Call>>,
        fail_on: Option<FailOn>,
    }

    impl RecordingPlatform {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(fail_on: FailOn) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(fail_on),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn replies(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Reply(text) => Some(text),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: Call, kind: Option<FailOn>) -> Result<(), PlatformError> {
            if let Some(kind) = kind.filter(|k| Some(*k) == self.fail_on) {
                return Err(PlatformError::Simulated(kind.name()));
            }
            self.calls.lock().unwrap().push(call);
            Ok(())
        }
    }

    #[async_trait]
    impl ChatPlatform for RecordingPlatform {
        async fn reply(&self, _msg: &InboundMessage, content: &str) -> Result<(), PlatformError> {
            self.record(Call::Reply(content.to_string()), None)
        }

        async fn say(
            &self,
            channel: serenity::ChannelId,
            content: &str,
        ) -> Result<(), PlatformError> {
            self.record(Call::Say(channel, content.to_string()), None)
        }

        async fn send_embed(
            &self,
            channel: serenity::ChannelId,
            embed: serenity::CreateEmbed,
        ) -> Result<serenity::MessageId, PlatformError> {
            let value = serde_json::to_value(&embed).unwrap();
            self.record(Call::Embed(channel, value), Some(FailOn::Embed))?;
            Ok(serenity::MessageId::new(POSTED_MESSAGE))
        }

        async fn delete_message(
            &self,
            _channel: serenity::ChannelId,
            message: serenity::MessageId,
        ) -> Result<(), PlatformError> {
            self.record(Call::Delete(message), Some(FailOn::Delete))
        }

        async fn react(
            &self,
            _channel: serenity::ChannelId,
            message: serenity::MessageId,
            emoji: &str,
        ) -> Result<(), PlatformError> {
            self.record(Call::React(message, emoji.to_string()), Some(FailOn::React))
        }

        async fn send_file(
            &self,
            channel: serenity::ChannelId,
            url: &str,
        ) -> Result<(), PlatformError> {
            self.record(Call::File(channel, url.to_string()), Some(FailOn::File))
        }
    }
}
