//! Error types for devshell
//!
//! All modules use `DevshellResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for devshell operations
pub type DevshellResult<T> = Result<T, DevshellError>;

/// All errors that can occur while evaluating a development shell
#[derive(Error, Debug)]
pub enum DevshellError {
    // Evaluation errors
    #[error("Overlay '{overlay}' failed: {reason}")]
    UnresolvedOverlay { overlay: String, reason: String },

    #[error("Package '{name}' is not available for platform {platform}")]
    MissingPackage { name: String, platform: String },

    #[error("Overlay not found: {name} (searched: {searched})")]
    OverlayNotFound { name: String, searched: String },

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl DevshellError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a missing package error for a platform
    pub fn missing_package(name: impl Into<String>, platform: impl ToString) -> Self {
        Self::MissingPackage {
            name: name.into(),
            platform: platform.to_string(),
        }
    }

    /// Wrap a failure raised while applying an overlay
    pub fn overlay(overlay: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnresolvedOverlay {
            overlay: overlay.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingPackage { .. } => Some(
                "Add a platform variant for the package to the channel, or provide it from an overlay",
            ),
            Self::OverlayNotFound { .. } => {
                Some("Place the overlay at .devshell/overlays/<name>.toml or check its name")
            }
            Self::UnsupportedPlatform(_) => Some("Pass an explicit platform with --system"),
            Self::ConfigInvalid { .. } => Some("Run: devshell config show"),
            _ => None,
        }
    }
}
