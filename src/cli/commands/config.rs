//! Config command - show configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::DevshellResult;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> DevshellResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager, config),
    }

    Ok(())
}

fn show_config(config: &Config) -> DevshellResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager, config: &Config) {
    println!("{}", manager.path().display());
    if let Some(ref dir) = config.project_dir {
        println!("{}", dir.join(crate::config::LOCAL_CONFIG_FILE).display());
    }
}
