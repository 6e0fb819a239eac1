//! Base channel loading
//!
//! The base repository comes either from a channel manifest on disk or from
//! a channel compiled into the binary via `include_str!`.

use super::manifest::ChannelManifest;
use super::{relative_to, Repository};
use crate::error::{DevshellError, DevshellResult};
use std::path::Path;
use tracing::debug;

const BUILTIN_STABLE: &str = include_str!("../../builtin/channels/stable.toml");

/// Names of the channels embedded in the binary
pub const BUILTIN_CHANNELS: &[&str] = &["stable"];

/// Load the base repository for a channel.
///
/// An explicit `path` wins over `name`; relative paths are taken from
/// `base_dir` (the directory of the descriptor that referenced them).
pub async fn load_channel(
    name: &str,
    path: Option<&Path>,
    base_dir: Option<&Path>,
) -> DevshellResult<Repository> {
    let manifest = match path {
        Some(path) => {
            let path = relative_to(base_dir, path.to_path_buf());
            if !path.exists() {
                return Err(DevshellError::ChannelNotFound(path.display().to_string()));
            }
            debug!("Loading channel from {}", path.display());
            ChannelManifest::from_file(&path).await?
        }
        None => builtin_channel(name)?.ok_or_else(|| {
            DevshellError::ChannelNotFound(format!(
                "{} (built-in: {})",
                name,
                BUILTIN_CHANNELS.join(", ")
            ))
        })?,
    };

    let repo = manifest.into_repository()?;
    debug!("Channel {} provides {} packages", repo.channel(), repo.len());
    Ok(repo)
}

fn builtin_channel(name: &str) -> DevshellResult<Option<ChannelManifest>> {
    let content = match name {
        "stable" | "default" => BUILTIN_STABLE,
        _ => return Ok(None),
    };
    ChannelManifest::parse(content).map(Some)
}
