//! Declarative overlays
//!
//! An overlay file names itself and lists the packages it adds or replaces:
//!
//! ```toml
//! [overlay]
//! name = "rust-toolchain"
//! description = "Stable Rust toolchain"
//!
//! [packages.rust-toolchain]
//! version = "1.81.0"
//! out = "/store/rust-default-1.81.0"
//!
//! [packages.rust-analyzer]
//! inherit = "rust-analyzer"   # start from the previous definition
//! version = "2024-09-02"
//! ```

use super::Overlay;
use crate::error::{DevshellError, DevshellResult};
use crate::repository::{PackageSpec, Repository};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed overlay manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayManifest {
    pub overlay: OverlayMeta,

    #[serde(default)]
    pub packages: BTreeMap<String, PackageSpec>,
}

/// Overlay metadata section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayMeta {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl OverlayManifest {
    /// Parse an overlay manifest from a TOML file on disk
    pub async fn from_file(path: &Path) -> DevshellResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DevshellError::io(format!("reading overlay {}", path.display()), e))?;
        toml::from_str(&content).map_err(|e| DevshellError::ManifestInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse a manifest from a TOML string (for embedded built-in overlays)
    pub fn parse(content: &str) -> DevshellResult<Self> {
        toml::from_str(content).map_err(|e| DevshellError::ManifestInvalid {
            path: "overlay.toml".into(),
            reason: e.to_string(),
        })
    }
}

/// Overlay that applies a parsed manifest
#[derive(Debug, Clone)]
pub struct ManifestOverlay {
    manifest: OverlayManifest,
}

impl ManifestOverlay {
    pub fn new(manifest: OverlayManifest) -> Self {
        Self { manifest }
    }

    pub fn manifest(&self) -> &OverlayManifest {
        &self.manifest
    }
}

impl Overlay for ManifestOverlay {
    fn name(&self) -> &str {
        &self.manifest.overlay.name
    }

    /// Every `inherit` reads from `prev`, never from entries this same
    /// overlay defines.
    fn apply(&self, prev: &Repository) -> DevshellResult<Repository> {
        let mut next = prev.clone();

        for (name, spec) in &self.manifest.packages {
            let base = match spec.inherit.as_deref() {
                Some(from) => Some(prev.get(from).ok_or_else(|| {
                    DevshellError::overlay(
                        self.name(),
                        format!("package '{}' inherits unknown package '{}'", name, from),
                    )
                })?),
                None => None,
            };

            let def = spec.to_definition(base).map_err(|reason| {
                DevshellError::overlay(self.name(), format!("package '{}': {}", name, reason))
            })?;
            next = next.with_package(name.clone(), def);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayRegistry;
    use crate::repository::{Origin, OutputPaths, PackageDefinition};
    use std::path::PathBuf;

    const TOOLCHAIN: &str = r#"
[overlay]
name = "toolchain"
description = "Test toolchain"

[packages.rust-toolchain]
version = "1.81.0"
out = "/out/rust"

[packages.clang]
inherit = "clang"
version = "18"
"#;

    fn base() -> Repository {
        Repository::new("base").with_package(
            "clang",
            PackageDefinition::new(OutputPaths::new("/out/clang-17"))
                .with_version("17")
                .with_description("C compiler"),
        )
    }

    #[test]
    fn parse_overlay() {
        let manifest = OverlayManifest::parse(TOOLCHAIN).unwrap();
        assert_eq!(manifest.overlay.name, "toolchain");
        assert_eq!(manifest.packages.len(), 2);
        assert_eq!(
            manifest.packages["clang"].inherit.as_deref(),
            Some("clang")
        );
    }

    #[test]
    fn apply_adds_and_patches() {
        let overlay = ManifestOverlay::new(OverlayManifest::parse(TOOLCHAIN).unwrap());
        let repo = overlay.apply(&base()).unwrap();

        let rust = repo.get("rust-toolchain").unwrap();
        assert_eq!(rust.version.as_deref(), Some("1.81.0"));

        let clang = repo.get("clang").unwrap();
        assert_eq!(clang.version.as_deref(), Some("18"));
        assert_eq!(clang.description.as_deref(), Some("C compiler"));
        assert_eq!(
            clang.outputs.as_ref().unwrap().out,
            PathBuf::from("/out/clang-17")
        );
    }

    #[test]
    fn inherit_of_unknown_package_fails_overlay() {
        let manifest = OverlayManifest::parse(
            r#"
[overlay]
name = "needs-later"

[packages.wrapped]
inherit = "defined-by-a-later-overlay"
"#,
        )
        .unwrap();

        let err = ManifestOverlay::new(manifest).apply(&base()).unwrap_err();
        match err {
            DevshellError::UnresolvedOverlay { overlay, reason } => {
                assert_eq!(overlay, "needs-later");
                assert!(reason.contains("defined-by-a-later-overlay"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn registry_stamps_manifest_origin() {
        let mut registry = OverlayRegistry::new();
        registry.push(ManifestOverlay::new(OverlayManifest::parse(TOOLCHAIN).unwrap()));

        let repo = registry.apply(base()).unwrap().repository;
        assert_eq!(
            repo.origin("clang"),
            Some(&Origin::Overlay("toolchain".into()))
        );
    }

    #[test]
    fn missing_overlay_section_errors() {
        assert!(OverlayManifest::parse("[packages.x]\nout = \"/x\"\n").is_err());
    }
}
