//! Check command - verify every declared dependency resolves

use crate::config::Config;
use crate::deps::DependencyKind;
use crate::error::{DevshellError, DevshellResult};
use crate::eval::{evaluate, Evaluation};
use crate::platform::Platform;
use crate::ui::{self, UiContext};

/// Execute the check command
pub async fn execute(config: &Config, platform: &Platform) -> DevshellResult<()> {
    let ctx = UiContext::detect();
    let evaluation = evaluate(config, platform).await?;

    ui::section(
        &ctx,
        &format!(
            "Checking {} on {}",
            evaluation.package_set.channel(),
            evaluation.platform()
        ),
    );

    for warning in &evaluation.warnings {
        ui::step_warn(&ctx, &warning.to_string());
    }

    let missing = report(&ctx, &evaluation);

    if missing.is_empty() {
        let env = evaluation.environment(config)?;
        let message = format!("All dependencies resolve ({})", env.fingerprint());
        if evaluation.warnings.is_empty() {
            ui::outro_success(&ctx, &message);
        } else {
            ui::outro_warn(&ctx, &format!("{}, with overlay conflicts", message));
        }
        Ok(())
    } else {
        ui::outro_error(
            &ctx,
            &format!("{} dependencies are missing", missing.len()),
        );
        Err(DevshellError::User(format!(
            "missing on {}: {}",
            evaluation.platform(),
            missing.join(", ")
        )))
    }
}

/// Print one line per dependency; returns the names that failed
fn report(ctx: &UiContext, evaluation: &Evaluation) -> Vec<String> {
    let mut missing = Vec::new();

    for kind in [DependencyKind::Build, DependencyKind::Runtime] {
        let label = match kind {
            DependencyKind::Build => "build",
            DependencyKind::Runtime => "runtime",
        };

        for name in evaluation.dependencies.inputs(kind) {
            match evaluation.package_set.lookup(name) {
                Ok(package) => ui::step_ok_detail(
                    ctx,
                    &format!("{} {}", label, name),
                    &package.out.display().to_string(),
                ),
                Err(e) => {
                    ui::step_error_detail(ctx, &format!("{} {}", label, name), &e.to_string());
                    if !missing.contains(name) {
                        missing.push(name.clone());
                    }
                }
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(dir: &std::path::Path) -> Config {
        Config {
            project_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn linux_has_everything() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        execute(&config, &Platform::new("x86_64-linux")).await.unwrap();
    }

    #[tokio::test]
    async fn darwin_reports_linux_only_libraries() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        let evaluation = evaluate(&config, &Platform::new("aarch64-darwin"))
            .await
            .unwrap();

        let missing = report(&UiContext::non_interactive(), &evaluation);
        assert!(missing.contains(&"libX11".to_string()));
        assert!(missing.contains(&"udev".to_string()));
        assert!(!missing.contains(&"vulkan-loader".to_string()));
        assert!(!missing.contains(&"pkg-config".to_string()));
    }

    #[tokio::test]
    async fn missing_dependencies_fail_the_check() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        let err = execute(&config, &Platform::new("aarch64-darwin"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("libX11"));
    }
}
