//! Activation script rendering
//!
//! Turns a composed [`Environment`] into text a shell can evaluate, e.g.
//! `eval "$(devshell env)"` or `devshell env --shell fish | source`.

use crate::compose::Environment;
use crate::error::{DevshellError, DevshellResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Supported shell dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Sh,
}

impl Shell {
    /// Detect the user's shell from `$SHELL`, falling back to POSIX sh
    pub fn detect() -> Self {
        let name = std::env::var("SHELL")
            .ok()
            .and_then(|s| {
                PathBuf::from(s)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_lowercase)
            })
            .unwrap_or_default();

        name.parse().unwrap_or(if cfg!(windows) {
            Shell::PowerShell
        } else {
            Shell::Sh
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
            Shell::Sh => "sh",
        }
    }

    /// Statement setting `name` to a literal value
    pub fn export_var(&self, name: &str, value: &str) -> String {
        match self {
            Shell::Fish => format!("set -gx {} {}", name, single_quote(value)),
            Shell::PowerShell => format!("$env:{} = {}", name, powershell_quote(value)),
            Shell::Bash | Shell::Zsh | Shell::Sh => {
                format!("export {}={}", name, single_quote(value))
            }
        }
    }

    /// Statement prepending a literal value to a PATH-like variable
    pub fn prepend_path(&self, name: &str, value: &str, separator: char) -> String {
        match self {
            Shell::Fish => format!("set -gx {} {} ${}", name, single_quote(value), name),
            Shell::PowerShell => format!(
                "$env:{} = {} + '{}' + $env:{}",
                name,
                powershell_quote(value),
                separator,
                name
            ),
            Shell::Bash | Shell::Zsh | Shell::Sh => format!(
                "export {}={}\"${{{}:+{}${}}}\"",
                name,
                single_quote(value),
                name,
                separator,
                name
            ),
        }
    }

    pub fn comment(&self, text: &str) -> String {
        format!("# {}", text)
    }

    /// Render the full activation script
    pub fn render(&self, env: &Environment) -> String {
        let mut lines = vec![self.comment(&format!(
            "devshell environment {} ({})",
            env.fingerprint(),
            env.platform
        ))];

        for (key, value) in &env.vars {
            lines.push(self.export_var(key, value));
        }

        if let Some(path) = env.path_prepend_str() {
            // fish splits PATH into a list itself
            let path = match self {
                Shell::Fish => env
                    .path
                    .iter()
                    .map(|p| single_quote(&p.to_string_lossy()))
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => path,
            };
            lines.push(match self {
                Shell::Fish => format!("set -gx PATH {} $PATH", path),
                _ => self.prepend_path("PATH", &path, env.platform.path_separator()),
            });
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

impl FromStr for Shell {
    type Err = DevshellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            "pwsh" | "powershell" => Ok(Shell::PowerShell),
            "sh" | "dash" | "ash" => Ok(Shell::Sh),
            other => Err(DevshellError::User(format!("Unsupported shell: {}", other))),
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the environment as pretty JSON
pub fn render_json(env: &Environment) -> DevshellResult<String> {
    Ok(serde_json::to_string_pretty(env)?)
}

/// POSIX/fish single quoting; embedded quotes are closed, escaped, reopened
fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
