// Setup command - configure the suggestion channel, vote emoji, length limit and image link

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::api::platform::ChatPlatform;
use crate::error::PlatformError;
use crate::features::config_store::ConfigStore;
use crate::models::config::ConfigUpdate;
use crate::models::message::InboundMessage;

const PERMISSION_DENIED: &str = "You don't have enough permissions to change the setup.";
const OPTIONS_PROMPT: &str =
    "Please add one of the options: `react`, `line`, `imageLink` or mention a channel.";
const CHANNEL_PROMPT: &str = "Please mention a valid channel to use as the suggestion channel.";
const LINE_PROMPT: &str = "Please enter a valid length greater than zero.";
const SAVE_FAILED: &str =
    "The setting was changed but could not be saved, it will be lost on restart.";

/// A parsed `setup` sub-command, selected by the second token
#[derive(Debug, Clone, PartialEq)]
pub enum SetupCommand {
    /// No sub-command given
    Options,
    /// Anything that is not a known sub-command: use the first mentioned channel
    Channel(Option<serenity::ChannelId>),
    React {
        upvote: Option<String>,
        downvote: Option<String>,
    },
    Line(Option<String>),
    ImageLink(Option<String>),
}

impl SetupCommand {
    /// Parse from the full token list (`tokens[0]` is the command itself)
    pub fn parse(tokens: &[&str], mentioned_channels: &[serenity::ChannelId]) -> Self {
        let arg = |i: usize| tokens.get(i).map(|t| t.to_string());

        match tokens.get(1) {
            None => Self::Options,
            Some(sub) if sub.eq_ignore_ascii_case("react") => Self::React {
                upvote: arg(2),
                downvote: arg(3),
            },
            Some(sub) if sub.eq_ignore_ascii_case("line") => Self::Line(arg(2)),
            Some(sub) if sub.eq_ignore_ascii_case("imageLink") => Self::ImageLink(arg(2)),
            Some(_) => Self::Channel(mentioned_channels.first().copied()),
        }
    }
}

/// Parse a suggestion length; only positive integers are accepted
pub fn parse_length(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&len| len > 0)
}

/// Run a setup sub-command on behalf of `msg`'s author
///
/// The MANAGE_CHANNELS check happens before anything else, so a member
/// without it never reaches a mutation.
pub async fn run_setup(
    platform: &dyn ChatPlatform,
    store: &ConfigStore,
    msg: &InboundMessage,
    command: SetupCommand,
) -> Result<(), PlatformError> {
    if !msg.can_manage_channels {
        return platform.reply(msg, PERMISSION_DENIED).await;
    }

    let (update, confirmation) = match command {
        SetupCommand::Options => return platform.reply(msg, OPTIONS_PROMPT).await,
        SetupCommand::Channel(None) => return platform.reply(msg, CHANNEL_PROMPT).await,
        SetupCommand::Channel(Some(channel_id)) => (
            ConfigUpdate::SuggestionChannel(channel_id),
            format!("Suggestion channel set to <#{}>.", channel_id),
        ),
        SetupCommand::React { upvote, downvote } => {
            let config = store.get().await;
            let upvote = upvote.or_else(|| config.upvote_emoji().map(String::from));
            let downvote = downvote.or_else(|| config.downvote_emoji().map(String::from));
            match (upvote, downvote) {
                (Some(upvote), Some(downvote)) => {
                    let confirmation = format!(
                        "Vote emoji updated. Upvote: {}, Downvote: {}",
                        upvote, downvote
                    );
                    (ConfigUpdate::VoteEmoji { upvote, downvote }, confirmation)
                }
                _ => {
                    let prompt = format!(
                        "Please enter the vote emoji. For example: `{}setup react 👍 👎`",
                        config.prefix()
                    );
                    return platform.reply(msg, &prompt).await;
                }
            }
        }
        SetupCommand::Line(raw) => match raw.as_deref().and_then(parse_length) {
            Some(length) => (
                ConfigUpdate::MaxSuggestionLength(length),
                format!("Maximum suggestion length set to {} characters.", length),
            ),
            None => return platform.reply(msg, LINE_PROMPT).await,
        },
        SetupCommand::ImageLink(None) => {
            let prompt = format!(
                "Please enter the image link. For example: `{}setup imageLink http://example.com/image.png`",
                store.get().await.prefix()
            );
            return platform.reply(msg, &prompt).await;
        }
        SetupCommand::ImageLink(Some(link)) => (
            ConfigUpdate::ImageLink(link.clone()),
            format!("Image link updated to {}", link),
        ),
    };

    let description = format!("{:?}", update);
    match store.apply(update).await {
        Ok(()) => {
            info!("{} changed config: {}", msg.author.name, description);
            platform.say(msg.channel_id, &confirmation).await
        }
        Err(e) => {
            error!("Failed to persist config ({}): {:?}", description, e);
            platform.reply(msg, SAVE_FAILED).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::platform::recording::{Call, RecordingPlatform};
    use crate::models::config::BotConfig;
    use crate::models::message::fixtures::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, config: BotConfig) -> ConfigStore {
        ConfigStore::with_config(dir.path().join("config.json"), config)
    }

    fn with_emoji() -> BotConfig {
        BotConfig {
            upvote_emoji: Some("👍".into()),
            downvote_emoji: Some("👎".into()),
            max_suggestion_length: Some(100),
            ..Default::default()
        }
    }

    async fn run(store: &ConfigStore, msg: &InboundMessage) -> RecordingPlatform {
        let platform = RecordingPlatform::new();
        let tokens = msg.tokens();
        let command = SetupCommand::parse(&tokens, &msg.mentioned_channels);
        run_setup(&platform, store, msg, command).await.unwrap();
        platform
    }

    #[test]
    fn test_parse_sub_commands() {
        let channel = serenity::ChannelId::new(SUGGESTION_CHANNEL);
        assert_eq!(SetupCommand::parse(&["!setup"], &[]), SetupCommand::Options);
        assert_eq!(
            SetupCommand::parse(&["!setup", "react", "✅"], &[]),
            SetupCommand::React {
                upvote: Some("✅".into()),
                downvote: None
            }
        );
        assert_eq!(
            SetupCommand::parse(&["!setup", "LINE", "20"], &[]),
            SetupCommand::Line(Some("20".into()))
        );
        assert_eq!(
            SetupCommand::parse(&["!setup", "imagelink"], &[]),
            SetupCommand::ImageLink(None)
        );
        assert_eq!(
            SetupCommand::parse(&["!setup", "<#900000000000000001>"], &[channel]),
            SetupCommand::Channel(Some(channel))
        );
        assert_eq!(
            SetupCommand::parse(&["!setup", "somewhere"], &[]),
            SetupCommand::Channel(None)
        );
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("25"), Some(25));
        assert_eq!(parse_length("0"), None);
        assert_eq!(parse_length("-5"), None);
        assert_eq!(parse_length("abc"), None);
    }

    #[tokio::test]
    async fn test_permission_denied_blocks_every_sub_command() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, with_emoji());

        for content in [
            "!setup",
            "!setup <#900000000000000002>",
            "!setup react ✅ ❌",
            "!setup line 5",
            "!setup imageLink https://example.com/x.png",
        ] {
            let mut msg = message(OTHER_CHANNEL, content);
            msg.mentioned_channels = vec![serenity::ChannelId::new(OTHER_CHANNEL)];
            let platform = run(&store, &msg).await;
            assert_eq!(platform.replies(), vec![PERMISSION_DENIED.to_string()]);
        }

        assert_eq!(store.get().await, with_emoji());
        assert!(!dir.path().join("config.json").exists());
    }

    #[tokio::test]
    async fn test_options_listing_without_sub_command() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, BotConfig::default());
        let platform = run(&store, &admin_message(OTHER_CHANNEL, "!setup")).await;
        assert_eq!(platform.replies(), vec![OPTIONS_PROMPT.to_string()]);
        assert_eq!(store.get().await, BotConfig::default());
    }

    #[tokio::test]
    async fn test_set_channel_from_mention() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, BotConfig::default());
        let mut msg = admin_message(OTHER_CHANNEL, "!setup <#900000000000000001>");
        msg.mentioned_channels = vec![serenity::ChannelId::new(SUGGESTION_CHANNEL)];

        let platform = run(&store, &msg).await;

        assert_eq!(
            store.get().await.suggestion_channel(),
            Some(serenity::ChannelId::new(SUGGESTION_CHANNEL))
        );
        assert_eq!(
            platform.calls(),
            vec![Call::Say(
                msg.channel_id,
                format!("Suggestion channel set to <#{}>.", SUGGESTION_CHANNEL)
            )]
        );
        let on_disk = ConfigStore::load(store.path()).await.get().await;
        assert_eq!(on_disk.suggestion_channel_id.as_deref(), Some("900000000000000001"));
    }

    #[tokio::test]
    async fn test_set_channel_without_mention() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, BotConfig::default());
        let platform = run(&store, &admin_message(OTHER_CHANNEL, "!setup general")).await;
        assert_eq!(platform.replies(), vec![CHANNEL_PROMPT.to_string()]);
        assert_eq!(store.get().await.suggestion_channel(), None);
    }

    #[tokio::test]
    async fn test_react_with_one_emoji_keeps_the_other() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, with_emoji());
        run(&store, &admin_message(OTHER_CHANNEL, "!setup react ✅")).await;

        let config = store.get().await;
        assert_eq!(config.upvote_emoji(), Some("✅"));
        assert_eq!(config.downvote_emoji(), Some("👎"));
    }

    #[tokio::test]
    async fn test_react_without_any_emoji_configured() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, BotConfig::default());
        let platform = run(&store, &admin_message(OTHER_CHANNEL, "!setup react ✅")).await;

        assert_eq!(platform.replies().len(), 1);
        assert!(platform.replies()[0].contains("!setup react 👍 👎"));
        assert_eq!(store.get().await, BotConfig::default());
    }

    #[tokio::test]
    async fn test_line_rejects_invalid_lengths() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, with_emoji());

        for content in ["!setup line abc", "!setup line -5", "!setup line 0", "!setup line"] {
            let platform = run(&store, &admin_message(OTHER_CHANNEL, content)).await;
            assert_eq!(platform.replies(), vec![LINE_PROMPT.to_string()]);
        }
        assert_eq!(store.get().await.max_suggestion_length(), Some(100));
    }

    #[tokio::test]
    async fn test_line_sets_length() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, with_emoji());
        let platform = run(&store, &admin_message(OTHER_CHANNEL, "!setup line 280")).await;

        assert_eq!(store.get().await.max_suggestion_length(), Some(280));
        assert_eq!(
            platform.calls(),
            vec![Call::Say(
                serenity::ChannelId::new(OTHER_CHANNEL),
                "Maximum suggestion length set to 280 characters.".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_image_link() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, BotConfig::default());

        let platform = run(&store, &admin_message(OTHER_CHANNEL, "!setup imageLink")).await;
        assert!(platform.replies()[0].contains("setup imageLink http://example.com/image.png"));
        assert_eq!(store.get().await.image_link(), None);

        run(
            &store,
            &admin_message(OTHER_CHANNEL, "!setup imageLink https://example.com/line.png"),
        )
        .await;
        assert_eq!(
            store.get().await.image_link(),
            Some("https://example.com/line.png")
        );
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::with_config(
            dir.path().join("missing").join("config.json"),
            BotConfig::default(),
        );
        let platform = run(&store, &admin_message(OTHER_CHANNEL, "!setup line 50")).await;

        assert_eq!(platform.replies(), vec![SAVE_FAILED.to_string()]);
        assert_eq!(store.get().await.max_suggestion_length(), Some(50));
    }
}
