// Config Store
// Holds the bot configuration document in memory and writes it back to disk

use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::error::ConfigError;
use crate::models::config::{BotConfig, ConfigUpdate};

/// File-backed configuration document
///
/// Mutations only touch memory until `persist` overwrites the whole file.
/// Persists run one at a time and each writes the latest snapshot, so the
/// last persist wins and the file is always a complete document.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<BotConfig>,
    /// Held across serialize, write and rename
    persist_guard: Mutex<()>,
}

impl ConfigStore {
    /// Load the document from `path`
    ///
    /// Never fails: a missing or malformed file yields an empty document and
    /// an error line in the log.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<BotConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse config {}: {:?}", path.display(), e);
                    BotConfig::default()
                }
            },
            Err(e) => {
                error!("Failed to read config {}: {:?}", path.display(), e);
                BotConfig::default()
            }
        };

        Self::with_config(path, config)
    }

    pub fn with_config(path: impl Into<PathBuf>, config: BotConfig) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(config),
            persist_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current in-memory document
    pub async fn get(&self) -> BotConfig {
        self.config.read().await.clone()
    }

    /// Mutate the in-memory document without touching disk
    pub async fn set(&self, update: ConfigUpdate) {
        debug!("Config update: {:?}", update);
        self.config.write().await.apply(update);
    }

    /// Overwrite the file with the full in-memory document
    pub async fn persist(&self) -> Result<(), ConfigError> {
        let _guard = self.persist_guard.lock().await;

        let json = {
            let config = self.config.read().await;
            serde_json::to_string_pretty(&*config)?
        };

        // Write next to the target and rename so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|source| ConfigError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;

        debug!("Persisted config to {}", self.path.display());
        Ok(())
    }

    /// `set` followed by `persist`
    ///
    /// When the write fails the in-memory value stays changed and the file is
    /// stale until the next successful persist.
    pub async fn apply(&self, update: ConfigUpdate) -> Result<(), ConfigError> {
        self.set(update).await;
        self.persist().await
    }
}
