//! Package set materialization
//!
//! Turns a repository into the concrete set of packages available on one
//! platform. Packages with no applicable variant are left out here; asking
//! for one of them later is what fails.

use crate::error::{DevshellError, DevshellResult};
use crate::platform::Platform;
use crate::repository::{Origin, Repository};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// A package resolved for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutput {
    pub name: String,
    pub version: Option<String>,
    pub out: PathBuf,
    pub lib_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub origin: Origin,
}

/// Platform-resolved mapping from package name to outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSet {
    platform: Platform,
    channel: String,
    packages: BTreeMap<String, PackageOutput>,
}

impl PackageSet {
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn get(&self, name: &str) -> Option<&PackageOutput> {
        self.packages.get(name)
    }

    /// Look up a package, failing if it has no definition on this platform
    pub fn lookup(&self, name: &str) -> DevshellResult<&PackageOutput> {
        self.packages
            .get(name)
            .ok_or_else(|| DevshellError::missing_package(name, &self.platform))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate packages in name order
    pub fn iter(&self) -> impl Iterator<Item = &PackageOutput> {
        self.packages.values()
    }
}

/// Materialize `repo` for `platform`.
///
/// Same repository and platform always give the same set.
pub fn materialize(repo: &Repository, platform: &Platform) -> PackageSet {
    let packages: BTreeMap<String, PackageOutput> = repo
        .iter()
        .filter_map(|(name, entry)| {
            let outputs = entry.definition.select(platform)?;
            Some((
                name.to_string(),
                PackageOutput {
                    name: name.to_string(),
                    version: entry.definition.version.clone(),
                    out: outputs.out.clone(),
                    lib_dir: outputs.lib_dir(),
                    bin_dir: outputs.bin_dir(),
                    origin: entry.origin.clone(),
                },
            ))
        })
        .collect();

    debug!(
        "Materialized {} of {} packages for {}",
        packages.len(),
        repo.len(),
        platform
    );

    PackageSet {
        platform: platform.clone(),
        channel: repo.channel().to_string(),
        packages,
    }
}
