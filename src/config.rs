//! Configuration file handling for the budget client.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and holds the address of the
//! budget server, the page size of transaction lists and the location of the session file.

use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const PAGE_SIZE: u32 = 20;
const SECRETS: &str = ".secrets";
const SESSION_JSON: &str = "session.json";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the budget home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the data directory, its `.secrets` subdirectory and an initial `config.json` that
    /// points at `api_url`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/budget`
    /// - `api_url` - The base URL of the budget server, e.g. `http://localhost:3000/api`
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not an absolute http(s) URL or if any file operation
    ///   fails.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::new(api_url.to_string());
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            api_url,
        })
    }

    /// This will
    /// - validate that `budget_home` and its config file exist
    /// - load and validate the config file
    /// - validate that the secrets directory exists
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
        let api_url = parse_api_url(&config_file.api_url)
            .with_context(|| format!("Bad api_url in {}", config_path.display()))?;

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            api_url,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// How many transactions a list page holds.
    pub fn page_size(&self) -> u32 {
        self.config_file.page_size
    }

    /// Returns the stored `session_path` if it is absolute, otherwise resolves it against the
    /// budget home directory.
    pub fn session_path(&self) -> PathBuf {
        let p = self.config_file.session_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Accepts absolute `http` and `https` URLs only.
fn parse_api_url(s: &str) -> Result<Url> {
    let url = Url::parse(s).with_context(|| format!("'{s}' is not a valid URL"))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "The API URL must use http or https, got '{}'",
        url.scheme()
    );
    Ok(url)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "api_url": "http://localhost:3000/api",
///   "page_size": 20,
///   "session_path": ".secrets/session.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the budget server
    api_url: String,

    /// Number of transactions per list page
    #[serde(default = "default_page_size")]
    page_size: u32,

    /// Path to the session file (optional, relative to the budget home or absolute)
    /// Defaults to $BUDGET_HOME/.secrets/session.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_path: Option<PathBuf>,
}

fn default_page_size() -> u32 {
    PAGE_SIZE
}

impl ConfigFile {
    fn new(api_url: String) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url,
            page_size: PAGE_SIZE,
            session_path: None,
        }
    }

    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.page_size > 0,
            "Invalid page_size in config file: must be greater than zero"
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

    /// Gets the session path, which may be relative to the budget home.
    fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(SESSION_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget_home");

        let created = Config::create(&home, "http://localhost:3000/api")
            .await
            .unwrap();
        assert!(created.secrets().is_dir());
        assert!(created.config_path().is_file());
        assert_eq!(created.page_size(), PAGE_SIZE);

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.api_url().as_str(), "http://localhost:3000/api");
        assert_eq!(
            loaded.session_path(),
            loaded.root().join(".secrets").join("session.json")
        );
    }

    #[tokio::test]
    async fn test_create_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path(), "not a url").await.is_err());
        assert!(Config::create(dir.path(), "ftp://example.com").await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().contains("budget init"));
    }

    #[tokio::test]
    async fn test_config_file_minimal_and_absolute_session() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SECRETS)).unwrap();
        let json = r#"{
            "app_name": "budget",
            "config_version": 1,
            "api_url": "https://budget.example.com",
            "session_path": "/tmp/elsewhere/session.json"
        }"#;
        utils::write(dir.path().join(CONFIG_JSON), json)
            .await
            .unwrap();

        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.page_size(), PAGE_SIZE);
        assert_eq!(
            config.session_path(),
            PathBuf::from("/tmp/elsewhere/session.json")
        );
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "wallet",
            "config_version": 1,
            "api_url": "https://budget.example.com"
        }"#;
        utils::write(&path, json).await.unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::new("http://localhost".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("session_path"));
        assert!(json.contains("\"page_size\":20"));
    }
}
