//! Configuration schema for devshell
//!
//! Global settings live at `~/.config/devshell/config.toml`; a project
//! descriptor (`devshell.toml`) uses the same schema and overrides them.

use crate::deps::DependencyList;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Base package channel
    pub channel: ChannelConfig,

    /// Target platform
    pub platform: PlatformConfig,

    /// Overlays and shell defaults
    pub shell: ShellConfig,

    /// Build and runtime inputs
    pub dependencies: DependenciesConfig,

    /// Extra variables exported into the shell
    pub env: BTreeMap<String, String>,

    /// Directory of the project descriptor this config was loaded from
    #[serde(skip)]
    pub project_dir: Option<PathBuf>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Base channel selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Built-in channel name
    pub name: String,

    /// Channel manifest on disk; takes precedence over `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: "stable".to_string(),
            path: None,
        }
    }
}

/// Platform settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Platform identifier; detected from the host when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// Shell settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Overlays applied on top of the channel, in order
    pub overlays: Vec<String>,

    /// Shell dialect for `devshell env`; detected from `$SHELL` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            overlays: vec!["rust-toolchain".to_string()],
            dialect: None,
        }
    }
}

/// Build inputs of the default graphics development shell
pub const DEFAULT_BUILD_INPUTS: &[&str] = &["pkg-config"];

/// Runtime inputs of the default graphics development shell
pub const DEFAULT_RUNTIME_INPUTS: &[&str] = &[
    // windowing and input
    "libX11",
    "libXcursor",
    "libXrandr",
    "libXi",
    "libxkbcommon",
    "wayland",
    // audio
    "alsa-lib",
    // GPU
    "vulkan-loader",
    "vulkan-validation-layers",
    "vulkan-tools",
    "libGL",
    // devices
    "udev",
    // toolchains
    "rust-toolchain",
    "rust-analyzer",
    "clang",
    "bintools",
];

/// Declared dependencies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependenciesConfig {
    /// Tools needed while building (not on the library path)
    pub build: Vec<String>,

    /// Libraries and toolchains needed at link and run time
    pub runtime: Vec<String>,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            build: DEFAULT_BUILD_INPUTS.iter().map(|s| s.to_string()).collect(),
            runtime: DEFAULT_RUNTIME_INPUTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DependenciesConfig {
    pub fn to_list(&self) -> DependencyList {
        DependencyList::new(self.build.iter().cloned(), self.runtime.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[channel]"));
        assert!(toml.contains("[dependencies]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.channel.name, "stable");
        assert_eq!(config.shell.overlays, vec!["rust-toolchain"]);
        assert_eq!(config.dependencies.build, vec!["pkg-config"]);
        assert!(config.dependencies.runtime.contains(&"alsa-lib".to_string()));
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [platform]
            system = "aarch64-darwin"

            [dependencies]
            runtime = ["vulkan-loader"]

            [env]
            RUST_LOG = "debug"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.platform.system.as_deref(), Some("aarch64-darwin"));
        assert_eq!(config.dependencies.runtime, vec!["vulkan-loader"]);
        // Unset side keeps its default
        assert_eq!(config.dependencies.build, vec!["pkg-config"]);
        assert_eq!(config.env.get("RUST_LOG").unwrap(), "debug");
        assert_eq!(config.channel.name, "stable");
    }
}
