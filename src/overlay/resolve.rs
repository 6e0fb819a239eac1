//! Overlay resolution
//!
//! Resolves overlay names to manifests by searching:
//! 1. Project-local: `{project_dir}/.devshell/overlays/{name}.toml`
//! 2. User-global: `~/.config/devshell/overlays/{name}.toml`
//! 3. Built-in: compiled into the binary via `include_str!`

use super::manifest::{ManifestOverlay, OverlayManifest};
use crate::error::{DevshellError, DevshellResult};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

const BUILTIN_RUST_TOOLCHAIN: &str = include_str!("../../builtin/overlays/rust-toolchain.toml");

/// Where an overlay was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlaySource {
    /// `.devshell/overlays/{name}.toml` in the project directory
    ProjectLocal,

    /// `~/.config/devshell/overlays/{name}.toml`
    UserGlobal,

    /// Compiled into the binary
    BuiltIn,
}

impl OverlaySource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProjectLocal => "project",
            Self::UserGlobal => "user",
            Self::BuiltIn => "built-in",
        }
    }
}

/// A discoverable overlay with metadata
#[derive(Debug, Clone)]
pub struct AvailableOverlay {
    pub name: String,
    pub description: String,
    pub source: OverlaySource,
}

/// Resolve overlay names, preserving their order.
///
/// Resolution chain (first match wins per overlay):
/// 1. `{project_dir}/.devshell/overlays/{name}.toml`
/// 2. `~/.config/devshell/overlays/{name}.toml`
/// 3. Built-in overlays
pub async fn resolve_overlays(
    names: &[String],
    project_dir: &Path,
) -> DevshellResult<Vec<(ManifestOverlay, OverlaySource)>> {
    let mut resolved = Vec::with_capacity(names.len());
    let mut declared: HashMap<String, &str> = HashMap::new();

    for name in names {
        let (manifest, source) = resolve_single(name, project_dir).await?;
        debug!("Resolved overlay {} ({})", name, source.label());

        // Provenance is keyed on the declared name, so it must be unique
        if let Some(first) = declared.insert(manifest.overlay.name.clone(), name) {
            return Err(DevshellError::overlay(
                &manifest.overlay.name,
                format!(
                    "name is declared by both '{}' and '{}' in [shell].overlays",
                    first, name
                ),
            ));
        }
        resolved.push((ManifestOverlay::new(manifest), source));
    }

    Ok(resolved)
}

/// Validate that an overlay name is safe (no path traversal, no special characters).
fn validate_overlay_name(name: &str) -> DevshellResult<()> {
    if name.is_empty() {
        return Err(DevshellError::User("Overlay name cannot be empty".to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DevshellError::User(format!(
            "Invalid overlay name '{}': must contain only alphanumeric characters, hyphens, or underscores",
            name
        )));
    }
    Ok(())
}

fn project_overlays_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".devshell").join("overlays")
}

fn global_overlays_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("devshell").join("overlays"))
}

async fn resolve_single(
    name: &str,
    project_dir: &Path,
) -> DevshellResult<(OverlayManifest, OverlaySource)> {
    validate_overlay_name(name)?;

    let file = format!("{}.toml", name);
    let project_path = project_overlays_dir(project_dir).join(&file);
    let global_path = global_overlays_dir().map(|d| d.join(&file));

    if project_path.exists() {
        let manifest = OverlayManifest::from_file(&project_path).await?;
        return Ok((manifest, OverlaySource::ProjectLocal));
    }

    if let Some(ref path) = global_path {
        if path.exists() {
            let manifest = OverlayManifest::from_file(path).await?;
            return Ok((manifest, OverlaySource::UserGlobal));
        }
    }

    if let Some(manifest) = resolve_builtin(name)? {
        return Ok((manifest, OverlaySource::BuiltIn));
    }

    let mut searched = vec![project_path.display().to_string()];
    if let Some(ref path) = global_path {
        searched.push(path.display().to_string());
    }
    searched.push("built-in overlays".to_string());

    Err(DevshellError::OverlayNotFound {
        name: name.to_string(),
        searched: searched.join(", "),
    })
}

/// Canonical name of the built-in overlay `name` refers to, aliases included
pub fn builtin_overlay_name(name: &str) -> Option<&'static str> {
    match name {
        "rust-toolchain" | "rust" | "rust-overlay" => Some("rust-toolchain"),
        _ => None,
    }
}

/// Resolve a built-in overlay by name
fn resolve_builtin(name: &str) -> DevshellResult<Option<OverlayManifest>> {
    let content = match builtin_overlay_name(name) {
        Some("rust-toolchain") => BUILTIN_RUST_TOOLCHAIN,
        _ => return Ok(None),
    };
    OverlayManifest::parse(content).map(Some)
}

/// List all available overlays from all sources.
///
/// Deduplicates by name (first source wins, matching resolution precedence).
pub async fn list_available_overlays(project_dir: &Path) -> DevshellResult<Vec<AvailableOverlay>> {
    let mut seen = HashSet::new();
    let mut overlays = Vec::new();

    scan_overlay_dir(
        &project_overlays_dir(project_dir),
        OverlaySource::ProjectLocal,
        &mut seen,
        &mut overlays,
    )
    .await;

    if let Some(global_dir) = global_overlays_dir() {
        scan_overlay_dir(&global_dir, OverlaySource::UserGlobal, &mut seen, &mut overlays).await;
    }

    if !seen.contains("rust-toolchain") {
        let manifest = OverlayManifest::parse(BUILTIN_RUST_TOOLCHAIN)?;
        seen.insert(manifest.overlay.name.clone());
        overlays.push(AvailableOverlay {
            name: manifest.overlay.name,
            description: manifest.overlay.description,
            source: OverlaySource::BuiltIn,
        });
    }

    Ok(overlays)
}

/// Scan a directory for `*.toml` overlay manifests
async fn scan_overlay_dir(
    dir: &Path,
    source: OverlaySource,
    seen: &mut HashSet<String>,
    overlays: &mut Vec<AvailableOverlay>,
) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(e) => e,
        Err(_) => return,
    };

    let mut found = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            found.push(path);
        }
    }
    // read_dir order is filesystem dependent
    found.sort();

    for path in found {
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) => s.to_string(),
            None => continue,
        };
        if seen.contains(&stem) {
            continue;
        }
        match OverlayManifest::from_file(&path).await {
            Ok(manifest) => {
                seen.insert(stem.clone());
                overlays.push(AvailableOverlay {
                    name: stem,
                    description: manifest.overlay.description,
                    source: source.clone(),
                });
            }
            Err(e) => debug!("Skipping invalid overlay {}: {}", path.display(), e),
        }
    }
}
