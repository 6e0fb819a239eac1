//! Package repositories
//!
//! A repository is an immutable catalogue of package definitions keyed by
//! name. It is never mutated in place: adding or replacing a definition
//! produces a new repository layered on the previous value, which is how
//! overlays stack on top of a pinned channel.

pub mod channel;
pub mod manifest;

pub use channel::{load_channel, BUILTIN_CHANNELS};
pub use manifest::{ChannelManifest, PackageSpec};

use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Installed output locations of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    /// Store prefix the package is installed under
    pub out: PathBuf,

    /// Library directory (defaults to `<out>/lib`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<PathBuf>,

    /// Executable directory (defaults to `<out>/bin`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<PathBuf>,
}

impl OutputPaths {
    /// Outputs rooted at `out` with the conventional `lib`/`bin` layout
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self {
            out: out.into(),
            lib: None,
            bin: None,
        }
    }

    pub fn with_lib(mut self, lib: impl Into<PathBuf>) -> Self {
        self.lib = Some(lib.into());
        self
    }

    pub fn with_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.bin = Some(bin.into());
        self
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.lib.clone().unwrap_or_else(|| self.out.join("lib"))
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.bin.clone().unwrap_or_else(|| self.out.join("bin"))
    }
}

/// Build recipe metadata for one package
///
/// A definition either applies to every platform (default `outputs` and no
/// `platforms` restriction), to an allow-list of platforms, or only to the
/// platforms listed in `variants`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDefinition {
    pub version: Option<String>,
    pub description: Option<String>,

    /// Outputs used when no platform variant matches
    pub outputs: Option<OutputPaths>,

    /// Platforms the default outputs are valid for (`None` = all)
    pub platforms: Option<BTreeSet<Platform>>,

    /// Platform-specific outputs, preferred over the default
    pub variants: BTreeMap<Platform, OutputPaths>,
}

impl PackageDefinition {
    /// A definition valid on every platform
    pub fn new(outputs: OutputPaths) -> Self {
        Self {
            outputs: Some(outputs),
            ..Self::default()
        }
    }

    /// A definition that only exists for the given variants
    pub fn variants_only() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict the default outputs to the given platforms
    pub fn for_platforms<I, P>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Platform>,
    {
        self.platforms = Some(platforms.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_variant(mut self, platform: impl Into<Platform>, outputs: OutputPaths) -> Self {
        self.variants.insert(platform.into(), outputs);
        self
    }

    /// Pick the outputs that apply to `platform`, if any
    pub fn select(&self, platform: &Platform) -> Option<&OutputPaths> {
        if let Some(variant) = self.variants.get(platform) {
            return Some(variant);
        }

        let outputs = self.outputs.as_ref()?;
        match &self.platforms {
            Some(allowed) if !allowed.contains(platform) => None,
            _ => Some(outputs),
        }
    }
}

/// Where the current definition of a package came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum Origin {
    /// The pinned channel
    Base,

    /// A named overlay
    Overlay(String),
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => f.write_str("base channel"),
            Self::Overlay(name) => write!(f, "overlay '{}'", name),
        }
    }
}

/// A repository slot: the definition plus its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub definition: Arc<PackageDefinition>,
    pub origin: Origin,
}

/// Immutable mapping from package name to definition
#[derive(Debug, Clone, Default)]
pub struct Repository {
    channel: String,
    packages: Arc<BTreeMap<String, Entry>>,
}

impl Repository {
    /// An empty repository for the named channel
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            packages: Arc::new(BTreeMap::new()),
        }
    }

    /// Name of the channel this repository was pinned from
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Return a new repository with `name` added or replaced
    ///
    /// The receiver is left untouched. The new entry keeps the origin of
    /// the entry it replaces; overlay provenance is stamped by the overlay
    /// registry after each overlay runs.
    pub fn with_package(&self, name: impl Into<String>, definition: PackageDefinition) -> Self {
        let name = name.into();
        let origin = self
            .packages
            .get(&name)
            .map(|e| e.origin.clone())
            .unwrap_or(Origin::Base);

        self.with_entry(
            name,
            Entry {
                definition: Arc::new(definition),
                origin,
            },
        )
    }

    pub(crate) fn with_entry(&self, name: String, entry: Entry) -> Self {
        self.with_entries(std::iter::once((name, entry)))
    }

    /// Insert several entries, copying the backing map at most once
    pub(crate) fn with_entries(&self, entries: impl IntoIterator<Item = (String, Entry)>) -> Self {
        let mut packages = Arc::clone(&self.packages);
        let map = Arc::make_mut(&mut packages);
        for (name, entry) in entries {
            map.insert(name, entry);
        }
        Self {
            channel: self.channel.clone(),
            packages,
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageDefinition> {
        self.packages.get(name).map(|e| e.definition.as_ref())
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.packages.get(name)
    }

    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.packages.get(name).map(|e| &e.origin)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Whether two repositories share the same backing map
    pub(crate) fn shares_storage(&self, other: &Repository) -> bool {
        Arc::ptr_eq(&self.packages, &other.packages)
    }
}

/// Join a relative manifest path onto the directory holding the manifest
pub(crate) fn relative_to(base_dir: Option<&Path>, path: PathBuf) -> PathBuf {
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dirs_default_to_conventional_layout() {
        let out = OutputPaths::new("/out/libX");
        assert_eq!(out.lib_dir(), PathBuf::from("/out/libX/lib"));
        assert_eq!(out.bin_dir(), PathBuf::from("/out/libX/bin"));

        let out = OutputPaths::new("/out/vk").with_lib("/out/vk/lib64");
        assert_eq!(out.lib_dir(), PathBuf::from("/out/vk/lib64"));
    }

    #[test]
    fn with_package_leaves_original_untouched() {
        let base = Repository::new("test");
        let next = base.with_package("libX", PackageDefinition::new(OutputPaths::new("/out/libX")));

        assert!(base.is_empty());
        assert_eq!(next.len(), 1);
        assert!(next.contains("libX"));
        assert_eq!(next.channel(), "test");
    }

    #[test]
    fn select_prefers_variant() {
        let def = PackageDefinition::new(OutputPaths::new("/out/generic"))
            .with_variant("aarch64-darwin", OutputPaths::new("/out/darwin"));

        let darwin = Platform::new("aarch64-darwin");
        let linux = Platform::new("x86_64-linux");
        assert_eq!(def.select(&darwin).unwrap().out, PathBuf::from("/out/darwin"));
        assert_eq!(def.select(&linux).unwrap().out, PathBuf::from("/out/generic"));
    }

    #[test]
    fn select_respects_platform_allow_list() {
        let def = PackageDefinition::new(OutputPaths::new("/out/alsa"))
            .for_platforms(["x86_64-linux", "aarch64-linux"]);

        assert!(def.select(&Platform::new("x86_64-linux")).is_some());
        assert!(def.select(&Platform::new("aarch64-darwin")).is_none());
    }

    #[test]
    fn variants_only_definition_is_absent_elsewhere() {
        let def = PackageDefinition::variants_only()
            .with_variant("p1", OutputPaths::new("/out/libX"));

        assert!(def.select(&Platform::new("p1")).is_some());
        assert!(def.select(&Platform::new("p2")).is_none());
    }

    #[test]
    fn replacing_keeps_origin() {
        let repo = Repository::new("test").with_entry(
            "libX".to_string(),
            Entry {
                definition: Arc::new(PackageDefinition::default()),
                origin: Origin::Overlay("first".into()),
            },
        );
        let next = repo.with_package("libX", PackageDefinition::default().with_version("2"));
        assert_eq!(next.origin("libX"), Some(&Origin::Overlay("first".into())));
    }
}
