//! Platform identifiers
//!
//! A platform is an opaque `<arch>-<os>` string such as `x86_64-linux` or
//! `aarch64-darwin`. It selects which package variants apply and fixes the
//! path-list conventions of the composed environment.

use crate::error::{DevshellError, DevshellResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform identifier for one evaluation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Platform(String);

impl Platform {
    /// Create a platform from any identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Detect the host platform
    ///
    /// `macos` is reported as `darwin` to match platform triples.
    pub fn host() -> DevshellResult<Self> {
        let arch = match std::env::consts::ARCH {
            "x86_64" | "aarch64" | "riscv64" | "i686" => std::env::consts::ARCH,
            other => return Err(DevshellError::UnsupportedPlatform(other.to_string())),
        };
        let os = match std::env::consts::OS {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "windows",
            "freebsd" => "freebsd",
            other => return Err(DevshellError::UnsupportedPlatform(other.to_string())),
        };
        Ok(Self(format!("{}-{}", arch, os)))
    }

    /// The identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// OS component (everything after the first `-`), if any
    pub fn os(&self) -> Option<&str> {
        self.0.split_once('-').map(|(_, os)| os)
    }

    /// Separator used when joining search-path lists
    pub fn path_separator(&self) -> char {
        match self.os() {
            Some("windows") => ';',
            _ => ':',
        }
    }

    /// Name of the dynamic-library search path variable
    pub fn library_path_var(&self) -> &'static str {
        match self.os() {
            Some("darwin") => "DYLD_LIBRARY_PATH",
            _ => "LD_LIBRARY_PATH",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Platform {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
