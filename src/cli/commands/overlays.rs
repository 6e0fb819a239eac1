//! Overlays command - list overlays that can be named in the config

use crate::config::Config;
use crate::error::{DevshellError, DevshellResult};
use crate::overlay::{builtin_overlay_name, list_available_overlays, AvailableOverlay};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the overlays command
pub async fn execute(config: &Config) -> DevshellResult<()> {
    let ctx = UiContext::detect();
    let project_dir = match config.project_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| DevshellError::io("getting current directory", e))?,
    };

    let available = list_available_overlays(&project_dir).await?;
    let enabled = enabled_names(&config.shell.overlays, &available);

    ui::section(&ctx, "Available overlays");
    for overlay in &available {
        println!(
            "  {:<20} {:<10} {}{}",
            overlay.name,
            style(overlay.source.label()).dim(),
            overlay.description,
            if enabled.iter().any(|n| n.as_deref() == Some(overlay.name.as_str())) {
                style(" (enabled)").green().to_string()
            } else {
                String::new()
            }
        );
    }

    for (name, found) in config.shell.overlays.iter().zip(&enabled) {
        if found.is_none() {
            ui::step_warn_hint(
                &ctx,
                &format!("Configured overlay '{}' was not found", name),
                "check [shell].overlays",
            );
        }
    }

    Ok(())
}

/// Listed name each configured overlay resolves to, matching resolution
/// order: an overlay file of that name first, then a built-in alias
fn enabled_names(configured: &[String], available: &[AvailableOverlay]) -> Vec<Option<String>> {
    configured
        .iter()
        .map(|name| {
            if available.iter().any(|o| &o.name == name) {
                return Some(name.clone());
            }
            builtin_overlay_name(name)
                .filter(|canonical| available.iter().any(|o| o.name == *canonical))
                .map(str::to_string)
        })
        .collect()
}
