//! Configuration management for devshell

pub mod schema;

pub use schema::{Config, DependenciesConfig};

use crate::error::{DevshellError, DevshellResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File name of the project descriptor
pub const LOCAL_CONFIG_FILE: &str = "devshell.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("devshell")
            .join("config.toml")
    }

    /// Find the nearest `devshell.toml`, walking up from `start`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> DevshellResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> DevshellResult<Config> {
        let value = read_table(path).await?;
        into_config(value, path)
    }

    /// Load the global config with a project descriptor layered on top.
    ///
    /// Tables merge key by key; any other value in the descriptor replaces
    /// the global one outright.
    pub async fn load_merged(&self, local: Option<&Path>) -> DevshellResult<Config> {
        let Some(local) = local else {
            return self.load().await;
        };

        let mut merged = if self.config_path.exists() {
            read_table(&self.config_path).await?
        } else {
            toml::Table::new()
        };
        merge_tables(&mut merged, read_table(local).await?);

        let mut config = into_config(merged, local)?;
        config.project_dir = local.parent().map(Path::to_path_buf);
        debug!("Merged project descriptor {}", local.display());
        Ok(config)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_table(path: &Path) -> DevshellResult<toml::Table> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| DevshellError::io(format!("reading config from {}", path.display()), e))?;

    content
        .parse::<toml::Table>()
        .map_err(|e| DevshellError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn into_config(table: toml::Table, path: &Path) -> DevshellResult<Config> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| DevshellError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.channel.name, "stable");
        assert!(config.project_dir.is_none());
    }

    #[tokio::test]
    async fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[channel]\nname = \"pinned\"\n").unwrap();

        let config = ConfigManager::with_path(path).load().await.unwrap();
        assert_eq!(config.channel.name, "pinned");
        assert!(config.project_dir.is_none());
    }

    #[tokio::test]
    async fn invalid_config_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[channel]\nname = 3\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, DevshellError::ConfigInvalid { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[tokio::test]
    async fn local_descriptor_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        std::fs::write(
            &global,
            "[general]\nlog_format = \"json\"\n\n[env]\nEDITOR = \"vi\"\nPAGER = \"less\"\n",
        )
        .unwrap();

        let project = temp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        let local = project.join(LOCAL_CONFIG_FILE);
        std::fs::write(
            &local,
            "[env]\nEDITOR = \"nvim\"\n\n[dependencies]\nruntime = [\"alsa-lib\"]\n",
        )
        .unwrap();

        let config = ConfigManager::with_path(global)
            .load_merged(Some(&local))
            .await
            .unwrap();

        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.env.get("EDITOR").unwrap(), "nvim");
        assert_eq!(config.env.get("PAGER").unwrap(), "less");
        assert_eq!(config.dependencies.runtime, vec!["alsa-lib"]);
        assert_eq!(config.project_dir.as_deref(), Some(project.as_path()));
    }

    #[test]
    fn find_local_config_walks_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_FILE), "").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = ConfigManager::find_local_config(&nested).unwrap();
        assert_eq!(found, temp.path().join(LOCAL_CONFIG_FILE));
    }

    #[test]
    fn merge_replaces_arrays() {
        let mut base: toml::Table = "a = [1, 2]\n[t]\nx = 1\ny = 2\n".parse().unwrap();
        let overlay: toml::Table = "a = [3]\n[t]\ny = 5\n".parse().unwrap();
        merge_tables(&mut base, overlay);

        assert_eq!(base["a"].as_array().unwrap().len(), 1);
        assert_eq!(base["t"]["x"].as_integer(), Some(1));
        assert_eq!(base["t"]["y"].as_integer(), Some(5));
    }
}
