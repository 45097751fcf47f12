//! Configuration file handling for the budget tracker.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and holds the key under which the
//! transaction list is persisted and the settings of the simulated remote sync. The persisted data
//! itself lives in `$BUDGET_HOME/data`.

use crate::blob::FileBlobStore;
use crate::store::{TransactionStore, DEFAULT_STORAGE_KEY};
use crate::sync::{SimulatedRemote, Syncer};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA: &str = "data";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`. It is also the
/// place where the transaction store is constructed, once per process.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its data subdirectory and an initial `config.json` with
    /// default settings.
    ///
    /// # Errors
    /// - Returns an error if a `config.json` already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let data = root.join(DATA);
        utils::make_dir(&data).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            data,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `budget_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the data directory exists
    /// - return the loaded configuration object
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The budget home directory is missing, run 'budget init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let data = root.join(DATA);
        if !data.is_dir() {
            bail!("The data directory is missing '{}'", data.display())
        }

        Ok(Self {
            root,
            data,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> &Path {
        &self.data
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn storage_key(&self) -> &str {
        &self.config_file.storage_key
    }

    pub fn sync(&self) -> &SyncSettings {
        &self.config_file.sync
    }

    /// The blob store backed by the data directory.
    pub fn blob_store(&self) -> FileBlobStore {
        FileBlobStore::new(&self.data)
    }

    /// The remote syncer described by the sync settings, or `None` if sync is disabled.
    pub fn syncer(&self) -> Option<Syncer> {
        let sync = self.sync();
        sync.enabled.then(|| {
            Syncer::new(SimulatedRemote::new(
                sync.delay(),
                sync.simulate_failure,
            ))
        })
    }

    /// Opens the transaction store, loading the persisted list.
    pub fn open_store(&self) -> TransactionStore<FileBlobStore> {
        let store = TransactionStore::open(self.blob_store(), self.storage_key());
        match self.syncer() {
            Some(syncer) => store.with_syncer(syncer),
            None => {
                debug!("Remote sync is disabled");
                store
            }
        }
    }
}

/// Settings for the simulated remote sync that follows every mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct SyncSettings {
    /// Whether to push a snapshot after each mutation.
    pub enabled: bool,
    /// How long the simulated remote takes to answer, in milliseconds.
    pub delay_ms: u64,
    /// Makes the simulated remote reject every push.
    pub simulate_failure: bool,
    /// How long the CLI waits for in-flight pushes before exiting, in milliseconds.
    pub drain_timeout_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 50,
            simulate_failure: false,
            drain_timeout_ms: 1000,
        }
    }
}

impl SyncSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "storage_key": "budgettracker.v1",
///   "sync": {
///     "enabled": true,
///     "delay_ms": 50,
///     "simulate_failure": false,
///     "drain_timeout_ms": 1000
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The key under which the transaction list is persisted
    #[serde(default = "default_storage_key")]
    storage_key: String,

    /// Remote sync settings, all optional
    #[serde(default)]
    sync: SyncSettings,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            storage_key: default_storage_key(),
            sync: SyncSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version in config file: expected {}, got {}",
            CONFIG_VERSION,
            config.config_version
        );
        anyhow::ensure!(
            !config.storage_key.trim().is_empty(),
            "Invalid storage_key in config file: it must not be empty"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("budget_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.data_dir().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
        assert_eq!(config.sync(), &SyncSettings::default());
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        let err = Config::create(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_config_load_after_create() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        tokio::fs::remove_dir(config.data_dir()).await.unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("data directory is missing"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "budget", "config_version": 1 }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.sync, SyncSettings::default());
    }

    #[tokio::test]
    async fn test_config_file_partial_sync_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "budget",
            "config_version": 1,
            "storage_key": "custom.v2",
            "sync": { "enabled": false }
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(config.storage_key, "custom.v2");
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.delay_ms, 50);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "wrong_app", "config_version": 1 }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_unsupported_version() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "budget", "config_version": 2 }"#;
        utils::write(&config_path, json).await.unwrap();

        let err = ConfigFile::load(&config_path).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported config_version"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let t = TempDir::new().unwrap();
        let path = t.path().join("file.json");
        let original = ConfigFile {
            storage_key: "other.v1".to_string(),
            sync: SyncSettings {
                enabled: false,
                delay_ms: 5,
                simulate_failure: true,
                drain_timeout_ms: 10,
            },
            ..Default::default()
        };
        original.save(&path).await.unwrap();

        let read = ConfigFile::load(&path).await.unwrap();

        assert_eq!(original, read);
    }

    #[tokio::test]
    async fn test_syncer_follows_settings() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::create(dir.path()).await.unwrap();
        assert!(config.syncer().is_some());
        config.config_file.sync.enabled = false;
        assert!(config.syncer().is_none());
        assert!(config.open_store().syncer().is_none());
    }

    #[tokio::test]
    async fn test_open_store_uses_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        let store = config.open_store();
        assert!(store.is_empty());
        assert_eq!(store.blob().dir(), config.data_dir());
        assert_eq!(store.key(), DEFAULT_STORAGE_KEY);
    }
}
