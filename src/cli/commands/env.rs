//! Env command - print the activation script for the development shell

use crate::cli::args::{EnvArgs, ShellKind};
use crate::config::Config;
use crate::error::DevshellResult;
use crate::eval::{evaluate, Evaluation};
use crate::platform::Platform;
use crate::shell::{render_json, Shell};
use tracing::{debug, warn};

impl From<ShellKind> for Shell {
    fn from(kind: ShellKind) -> Self {
        match kind {
            ShellKind::Bash => Shell::Bash,
            ShellKind::Zsh => Shell::Zsh,
            ShellKind::Fish => Shell::Fish,
            ShellKind::Powershell => Shell::PowerShell,
            ShellKind::Sh => Shell::Sh,
        }
    }
}

/// Execute the env command
pub async fn execute(args: EnvArgs, config: &Config, platform: &Platform) -> DevshellResult<()> {
    let evaluation = evaluate(config, platform).await?;
    let output = render(&args, config, &evaluation)?;
    print!("{}", output);
    Ok(())
}

fn render(args: &EnvArgs, config: &Config, evaluation: &Evaluation) -> DevshellResult<String> {
    for warning in &evaluation.warnings {
        warn!("{}", warning);
    }

    let env = evaluation.environment(config)?;

    if args.json {
        return Ok(format!("{}\n", render_json(&env)?));
    }

    let shell = select_shell(args.shell, config.shell.dialect.as_deref())?;
    debug!("Rendering {} environment for {}", env.fingerprint(), shell);
    Ok(shell.render(&env))
}

/// Flag first, then the configured dialect, then `$SHELL`
fn select_shell(flag: Option<ShellKind>, configured: Option<&str>) -> DevshellResult<Shell> {
    match (flag, configured) {
        (Some(kind), _) => Ok(kind.into()),
        (None, Some(name)) => name.parse(),
        (None, None) => Ok(Shell::detect()),
    }
}
