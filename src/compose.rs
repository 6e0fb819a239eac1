//! Environment composition
//!
//! Resolves the declared dependencies against a package set and builds the
//! shell environment: the dynamic-library search path from runtime inputs,
//! and the executable search path from build inputs followed by runtime
//! inputs.

use crate::deps::{dedup_first_occurrence, DependencyList};
use crate::error::DevshellResult;
use crate::package_set::{PackageOutput, PackageSet};
use crate::platform::Platform;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The composed shell environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub platform: Platform,

    /// Variables to export, including the library search path
    pub vars: BTreeMap<String, String>,

    /// Directories to prepend to `PATH`, highest precedence first
    pub path: Vec<PathBuf>,

    /// Library directories, in search order
    pub library_path: Vec<PathBuf>,

    /// Resolved build inputs, duplicates removed
    pub build_inputs: Vec<String>,

    /// Resolved runtime inputs, duplicates removed
    pub runtime_inputs: Vec<String>,
}

impl Environment {
    /// Name of the library search path variable for this platform
    pub fn library_path_var(&self) -> &'static str {
        self.platform.library_path_var()
    }

    /// Value of the library search path variable, if any runtime inputs exist
    pub fn library_path_value(&self) -> Option<&str> {
        self.vars.get(self.library_path_var()).map(String::as_str)
    }

    /// The executable directories joined with the platform separator
    pub fn path_prepend_str(&self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(join_paths(&self.path, self.platform.path_separator()))
        }
    }

    /// Deterministic identifier of this environment.
    ///
    /// Hash inputs are visited in a fixed order (sorted variables, ordered
    /// paths), so equal environments always share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        hasher.update(self.platform.as_str().as_bytes());
        for (key, value) in &self.vars {
            hasher.update(key.as_bytes());
            hasher.update([0u8]);
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        }
        for dir in &self.path {
            hasher.update(dir.to_string_lossy().as_bytes());
            hasher.update([0u8]);
        }

        let hash = hex::encode(hasher.finalize());
        format!("devshell-env-{}", &hash[..12])
    }
}

/// Compose an environment with no extra variables
pub fn compose(set: &PackageSet, deps: &DependencyList) -> DevshellResult<Environment> {
    compose_with(set, deps, &BTreeMap::new())
}

/// Compose an environment, merging in user-declared variables.
///
/// Fails on the first name missing from `set`; no partial environment is
/// returned.
pub fn compose_with(
    set: &PackageSet,
    deps: &DependencyList,
    extra_vars: &BTreeMap<String, String>,
) -> DevshellResult<Environment> {
    let platform = set.platform().clone();

    let runtime_names = dedup_first_occurrence(deps.runtime_inputs.iter().cloned());
    let build_names = dedup_first_occurrence(deps.build_inputs.iter().cloned());

    let runtime = resolve_all(set, &runtime_names)?;
    let build = resolve_all(set, &build_names)?;

    let library_path =
        dedup_first_occurrence(runtime.iter().map(|p| p.lib_dir.clone()));

    // Build inputs first so toolchain binaries shadow runtime artifacts
    let path = dedup_first_occurrence(
        build
            .iter()
            .chain(runtime.iter())
            .map(|p| p.bin_dir.clone()),
    );

    let library_var = platform.library_path_var();
    let mut vars = BTreeMap::new();
    for (key, value) in extra_vars {
        if key == library_var || key == "PATH" {
            warn!("Ignoring variable {} from descriptor: it is computed", key);
            continue;
        }
        if !is_valid_var_name(key) {
            warn!("Ignoring variable {:?} from descriptor: not a valid name", key);
            continue;
        }
        vars.insert(key.clone(), value.clone());
    }
    if !library_path.is_empty() {
        vars.insert(
            library_var.to_string(),
            join_paths(&library_path, platform.path_separator()),
        );
    }

    debug!(
        "Composed environment: {} build inputs, {} runtime inputs, {} path entries",
        build_names.len(),
        runtime_names.len(),
        path.len()
    );

    Ok(Environment {
        platform,
        vars,
        path,
        library_path,
        build_inputs: build_names,
        runtime_inputs: runtime_names,
    })
}

/// `[A-Za-z_][A-Za-z0-9_]*`; names are written into scripts unquoted
fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn resolve_all<'a>(set: &'a PackageSet, names: &[String]) -> DevshellResult<Vec<&'a PackageOutput>> {
    names.iter().map(|name| set.lookup(name)).collect()
}

fn join_paths(paths: &[PathBuf], separator: char) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}
