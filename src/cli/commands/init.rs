//! Init command - create a project devshell.toml

use crate::cli::args::InitArgs;
use crate::config::LOCAL_CONFIG_FILE;
use crate::error::{DevshellError, DevshellResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

/// Template for the project descriptor
const INIT_TEMPLATE: &str = r#"# devshell project descriptor
# Settings here override your global config (~/.config/devshell/config.toml)
# Activate with: eval "$(devshell env)"

[channel]
name = "stable"
# path = "channel.toml"            # a channel manifest next to this file

[shell]
overlays = ["rust-toolchain"]
# dialect = "bash"                 # bash, zsh, fish, powershell, sh

# [platform]
# system = "x86_64-linux"

[dependencies]
build = ["pkg-config"]
runtime = [
    "libX11",
    "libXcursor",
    "libXrandr",
    "libXi",
    "libxkbcommon",
    "wayland",
    "alsa-lib",
    "vulkan-loader",
    "vulkan-validation-layers",
    "vulkan-tools",
    "libGL",
    "udev",
    "rust-toolchain",
    "rust-analyzer",
    "clang",
    "bintools",
]

[env]
# RUST_BACKTRACE = "1"
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> DevshellResult<()> {
    let ctx = UiContext::detect();

    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => std::env::current_dir()
            .map_err(|e| DevshellError::io("getting current directory", e))?,
    };

    let config_path = target_dir.join(LOCAL_CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(DevshellError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    ensure_dir(&target_dir).await?;

    fs::write(&config_path, INIT_TEMPLATE)
        .await
        .map_err(|e| DevshellError::io(format!("writing {}", config_path.display()), e))?;

    ui::step_ok_detail(
        &ctx,
        "Created project descriptor",
        &config_path.display().to_string(),
    );

    Ok(())
}

async fn ensure_dir(dir: &Path) -> DevshellResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| DevshellError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}
