//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// devshell - reproducible native development shells
///
/// Layers overlays on a pinned package channel, resolves the declared
/// build and runtime inputs for the target platform, and prints the
/// resulting environment for your shell to evaluate.
#[derive(Parser, Debug)]
#[command(name = "devshell")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DEVSHELL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target platform (e.g. x86_64-linux); defaults to the host
    #[arg(long, global = true, env = "DEVSHELL_SYSTEM")]
    pub system: Option<String>,

    /// Skip local devshell.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the shell environment (eval "$(devshell env)")
    Env(EnvArgs),

    /// Show the materialized package set
    Show(ShowArgs),

    /// Check that every declared dependency resolves
    Check,

    /// List available overlays
    Overlays,

    /// Create a devshell.toml in the current directory
    Init(InitArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the env command
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Shell dialect (defaults to the config, then $SHELL)
    #[arg(short, long)]
    pub shell: Option<ShellKind>,

    /// Print the environment as JSON instead of a script
    #[arg(long, conflicts_with = "shell")]
    pub json: bool,
}

/// Shell dialects accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
    #[value(alias = "pwsh")]
    Powershell,
    Sh,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Show every package available on the platform, not just declared ones
    #[arg(short, long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing devshell.toml
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Output format for show command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_env() {
        let cli = Cli::parse_from(["devshell", "env", "--shell", "fish"]);
        match cli.command {
            Commands::Env(args) => {
                assert_eq!(args.shell, Some(ShellKind::Fish));
                assert!(!args.json);
            }
            _ => panic!("expected Env command"),
        }
    }

    #[test]
    fn cli_env_json_conflicts_with_shell() {
        let result = Cli::try_parse_from(["devshell", "env", "--json", "--shell", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_pwsh_alias() {
        let cli = Cli::parse_from(["devshell", "env", "-s", "pwsh"]);
        match cli.command {
            Commands::Env(args) => assert_eq!(args.shell, Some(ShellKind::Powershell)),
            _ => panic!("expected Env command"),
        }
    }

    #[test]
    fn cli_parses_show_all_json() {
        let cli = Cli::parse_from(["devshell", "show", "--all", "-f", "json"]);
        match cli.command {
            Commands::Show(args) => {
                assert!(args.all);
                assert!(matches!(args.format, OutputFormat::Json));
            }
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn cli_global_system_flag() {
        let cli = Cli::parse_from(["devshell", "check", "--system", "aarch64-darwin"]);
        assert_eq!(cli.system.as_deref(), Some("aarch64-darwin"));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn cli_parses_init_force() {
        let cli = Cli::parse_from(["devshell", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn cli_no_local_flag() {
        let cli = Cli::parse_from(["devshell", "--no-local", "check"]);
        assert!(cli.no_local);
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["devshell", "check"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["devshell", "-v", "check"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["devshell", "-vv", "check"]);
        assert_eq!(cli.verbose, 2);
    }
}
