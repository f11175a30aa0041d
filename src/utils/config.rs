// Centralized configuration for the suggestion bot

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Prefix used when the config document does not set one
pub const DEFAULT_PREFIX: &str = "!";

/// Where the config document lives unless CONFIG_PATH says otherwise
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// How often the presence updater rotates the activity
pub const DEFAULT_PRESENCE_INTERVAL: Duration = Duration::from_secs(7);

pub const DEFAULT_PRESENCE_STATUS: &str = "suggestions";

/// Discord embed colors
pub mod colors {
    pub const HELP: u32 = 0x0099ff;
    pub const SUGGESTION: u32 = 0x000000;
}

/// What the suggestion poster does when a step fails after the original
/// message was deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionFailurePolicy {
    /// Log the failure and run the remaining steps
    #[default]
    LogAndContinue,
    /// Stop, log, and post a notice asking the author to resubmit
    AbortAndNotify,
}

impl std::str::FromStr for SuggestionFailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "log" => Ok(Self::LogAndContinue),
            "notify" | "abort" => Ok(Self::AbortAndNotify),
            _ => Err(()),
        }
    }
}

/// Process settings read from the environment at startup
#[derive(Clone)]
pub struct Settings {
    pub token: String,
    pub config_path: PathBuf,
    pub presence_statuses: Vec<String>,
    pub presence_interval: Duration,
    pub failure_policy: SuggestionFailurePolicy,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("config_path", &self.config_path)
            .field("presence_statuses", &self.presence_statuses)
            .field("presence_interval", &self.presence_interval)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_TOKEN")
            .or_else(|| get("token"))
            .ok_or(ConfigError::MissingToken)?;

        let config_path = get("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut presence_statuses: Vec<String> = get("PRESENCE_STATUSES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if presence_statuses.is_empty() {
            presence_statuses.push(DEFAULT_PRESENCE_STATUS.to_string());
        }

        let presence_interval = match get("PRESENCE_INTERVAL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidSetting {
                        key: "PRESENCE_INTERVAL_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_PRESENCE_INTERVAL,
        };

        let failure_policy = match get("SUGGESTION_FAILURE_POLICY") {
            Some(raw) => raw.parse::<SuggestionFailurePolicy>().map_err(|_| ConfigError::InvalidSetting {
                key: "SUGGESTION_FAILURE_POLICY",
                value: raw.clone(),
            })?,
            None => SuggestionFailurePolicy::default(),
        };

        Ok(Self {
            token,
            config_path,
            presence_statuses,
            presence_interval,
            failure_policy,
        })
    }
}
