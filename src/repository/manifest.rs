//! Channel and package manifest parsing
//!
//! A channel manifest pins a base repository:
//!
//! ```toml
//! [channel]
//! name = "stable"
//!
//! [packages.alsa-lib]
//! version = "1.2.11"
//! out = "/store/alsa-lib-1.2.11"
//! platforms = ["x86_64-linux", "aarch64-linux"]
//!
//! [packages.vulkan-loader.variants.aarch64-darwin]
//! out = "/store/moltenvk-1.2.9"
//! ```

use super::{OutputPaths, PackageDefinition, Repository};
use crate::error::{DevshellError, DevshellResult};
use crate::platform::Platform;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parsed channel manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelManifest {
    pub channel: ChannelMeta,

    #[serde(default)]
    pub packages: BTreeMap<String, PackageSpec>,
}

/// Channel metadata section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelMeta {
    /// Pinned channel name (e.g. "stable-24.05")
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// One `[packages.<name>]` table
///
/// Every field is optional so overlays can patch only what they change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    /// Start from this package's definition in the input repository
    pub inherit: Option<String>,

    pub version: Option<String>,
    pub description: Option<String>,

    /// Store prefix of the default outputs
    pub out: Option<PathBuf>,
    pub lib: Option<PathBuf>,
    pub bin: Option<PathBuf>,

    /// Platforms the default outputs apply to
    pub platforms: Option<Vec<Platform>>,

    #[serde(default)]
    pub variants: BTreeMap<Platform, OutputPaths>,
}

impl PackageSpec {
    /// Build a definition, patching `base` when one is given
    pub fn to_definition(&self, base: Option<&PackageDefinition>) -> Result<PackageDefinition, String> {
        let mut def = base.cloned().unwrap_or_default();

        if let Some(ref version) = self.version {
            def.version = Some(version.clone());
        }
        if let Some(ref description) = self.description {
            def.description = Some(description.clone());
        }

        match (&self.out, def.outputs.as_mut()) {
            (Some(out), _) => {
                def.outputs = Some(OutputPaths {
                    out: out.clone(),
                    lib: self.lib.clone(),
                    bin: self.bin.clone(),
                });
            }
            (None, Some(outputs)) => {
                if self.lib.is_some() {
                    outputs.lib = self.lib.clone();
                }
                if self.bin.is_some() {
                    outputs.bin = self.bin.clone();
                }
            }
            (None, None) if self.lib.is_some() || self.bin.is_some() => {
                return Err("'lib' and 'bin' require 'out'".to_string());
            }
            (None, None) => {}
        }

        if let Some(ref platforms) = self.platforms {
            def.platforms = Some(platforms.iter().cloned().collect());
        }
        def.variants
            .extend(self.variants.iter().map(|(p, o)| (p.clone(), o.clone())));

        if def.outputs.is_none() && def.variants.is_empty() {
            return Err("package defines neither 'out' nor any variant".to_string());
        }

        Ok(def)
    }
}

impl ChannelManifest {
    /// Parse a channel manifest from a TOML file on disk
    pub async fn from_file(path: &Path) -> DevshellResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DevshellError::io(format!("reading channel {}", path.display()), e))?;
        Self::parse_at(&content, path)
    }

    /// Parse a manifest from a TOML string (for embedded built-in channels)
    pub fn parse(content: &str) -> DevshellResult<Self> {
        Self::parse_at(content, Path::new("channel.toml"))
    }

    fn parse_at(content: &str, path: &Path) -> DevshellResult<Self> {
        toml::from_str(content).map_err(|e| DevshellError::ManifestInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build the base repository this channel pins
    pub fn into_repository(self) -> DevshellResult<Repository> {
        let mut repo = Repository::new(self.channel.name.clone());

        for (name, spec) in &self.packages {
            if spec.inherit.is_some() {
                return Err(DevshellError::ManifestInvalid {
                    path: format!("channel {}", self.channel.name).into(),
                    reason: format!("package '{}': 'inherit' is only valid in overlays", name),
                });
            }
            let def = spec
                .to_definition(None)
                .map_err(|reason| DevshellError::ManifestInvalid {
                    path: format!("channel {}", self.channel.name).into(),
                    reason: format!("package '{}': {}", name, reason),
                })?;
            repo = repo.with_package(name.clone(), def);
        }

        Ok(repo)
    }
}
