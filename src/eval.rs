//! Descriptor evaluation
//!
//! Runs the whole pipeline for one configuration:
//! 1. Load the pinned channel as the base repository
//! 2. Resolve the named overlays and fold them over the base
//! 3. Materialize the package set for the target platform
//! 4. Compose the environment from the declared dependencies
//!
//! Steps 2 to 4 are pure; only loading manifests touches the filesystem.

use crate::compose::{compose_with, Environment};
use crate::config::Config;
use crate::deps::DependencyList;
use crate::error::{DevshellError, DevshellResult};
use crate::overlay::{resolve_overlays, OverlayRegistry, OverrideWarning};
use crate::package_set::{materialize, PackageSet};
use crate::platform::Platform;
use crate::repository::{load_channel, Repository};
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything evaluated for a descriptor, short of the environment itself
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub repository: Repository,
    pub package_set: PackageSet,
    pub dependencies: DependencyList,
    pub warnings: Vec<OverrideWarning>,
    pub overlays: Vec<String>,
}

impl Evaluation {
    pub fn platform(&self) -> &Platform {
        self.package_set.platform()
    }

    /// Compose the environment; fails if any dependency is missing
    pub fn environment(&self, config: &Config) -> DevshellResult<Environment> {
        compose_with(&self.package_set, &self.dependencies, &config.env)
    }
}

/// Pick the platform: explicit override, then config, then the host
pub fn target_platform(config: &Config, system: Option<&str>) -> DevshellResult<Platform> {
    match system.or(config.platform.system.as_deref()) {
        Some(id) => Ok(Platform::new(id)),
        None => Platform::host(),
    }
}

/// Evaluate `config` for `platform`
pub async fn evaluate(config: &Config, platform: &Platform) -> DevshellResult<Evaluation> {
    let project_dir = project_dir(config)?;

    let base = load_channel(
        &config.channel.name,
        config.channel.path.as_deref(),
        config.project_dir.as_deref(),
    )
    .await?;

    let mut registry = OverlayRegistry::new();
    for (overlay, source) in resolve_overlays(&config.shell.overlays, &project_dir).await? {
        debug!("Using overlay from {}", source.label());
        registry.push(overlay);
    }
    let overlays: Vec<String> = registry.names().iter().map(|s| s.to_string()).collect();

    let applied = registry.apply(base)?;
    let package_set = materialize(&applied.repository, platform);

    info!(
        "Evaluated channel {} for {}: {} packages available",
        applied.repository.channel(),
        platform,
        package_set.len()
    );

    Ok(Evaluation {
        repository: applied.repository,
        package_set,
        dependencies: config.dependencies.to_list(),
        warnings: applied.warnings,
        overlays,
    })
}

fn project_dir(config: &Config) -> DevshellResult<PathBuf> {
    match config.project_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| DevshellError::io("getting current directory", e)),
    }
}
