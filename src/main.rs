//! devshell - reproducible native development shells
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use devshell::cli::{Cli, Commands};
use devshell::config::{Config, ConfigManager};
use devshell::error::{DevshellError, DevshellResult};
use devshell::eval::target_platform;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DevshellResult<()> {
    let cli = Cli::parse();

    // Init command doesn't need config loading
    if let Commands::Init(args) = cli.command {
        init_logging(cli.verbose, None);
        return devshell::cli::commands::init(args).await;
    }

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| DevshellError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    // Logging waits for the config so general.log_format can pick the formatter
    init_logging(cli.verbose, Some(&config));
    match local_config_path {
        Some(ref path) => debug!("Found project descriptor: {}", path.display()),
        None if cli.no_local => debug!("Local descriptor discovery disabled (--no-local)"),
        None => debug!("No project descriptor found"),
    }

    match cli.command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::Env(args) => {
            let platform = target_platform(&config, cli.system.as_deref())?;
            devshell::cli::commands::env(args, &config, &platform).await
        }
        Commands::Show(args) => {
            let platform = target_platform(&config, cli.system.as_deref())?;
            devshell::cli::commands::show(args, &config, &platform).await
        }
        Commands::Check => {
            let platform = target_platform(&config, cli.system.as_deref())?;
            devshell::cli::commands::check(&config, &platform).await
        }
        Commands::Overlays => devshell::cli::commands::overlays(&config).await,
        Commands::Config(args) => {
            devshell::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; always on stderr so `env` output stays clean
fn init_logging(verbose: u8, config: Option<&Config>) {
    let filter = match verbose {
        0 => EnvFilter::new("devshell=warn"),
        1 => EnvFilter::new("devshell=info"),
        _ => EnvFilter::new("devshell=debug"),
    };

    let json = config.is_some_and(|c| c.general.log_format == "json");
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
