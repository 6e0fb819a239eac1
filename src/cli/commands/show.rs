//! Show command - display the materialized package set

use crate::cli::args::{OutputFormat, ShowArgs};
use crate::config::Config;
use crate::error::DevshellResult;
use crate::eval::{evaluate, Evaluation};
use crate::package_set::PackageOutput;
use crate::platform::Platform;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct ShowReport<'a> {
    channel: &'a str,
    platform: &'a Platform,
    overlays: &'a [String],
    fingerprint: Option<String>,
    packages: Vec<&'a PackageOutput>,
    missing: Vec<String>,
}

/// Execute the show command
pub async fn execute(args: ShowArgs, config: &Config, platform: &Platform) -> DevshellResult<()> {
    let evaluation = evaluate(config, platform).await?;
    let report = build_report(&evaluation, config, args.all);

    match args.format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            for package in &report.packages {
                println!("{}", package.name);
            }
        }
    }

    Ok(())
}

fn build_report<'a>(evaluation: &'a Evaluation, config: &Config, all: bool) -> ShowReport<'a> {
    let set = &evaluation.package_set;
    let declared = evaluation.dependencies.declared();

    let packages = if all {
        set.iter().collect()
    } else {
        declared.iter().filter_map(|name| set.get(name)).collect()
    };
    let missing = declared
        .into_iter()
        .filter(|name| set.get(name).is_none())
        .collect();

    ShowReport {
        channel: set.channel(),
        platform: set.platform(),
        overlays: &evaluation.overlays,
        fingerprint: evaluation.environment(config).ok().map(|env| env.fingerprint()),
        packages,
        missing,
    }
}

fn print_table(report: &ShowReport<'_>) {
    let ctx = UiContext::detect();

    ui::section(&ctx, "Development shell");
    ui::key_value(&ctx, "Channel", report.channel);
    ui::key_value(&ctx, "Platform", report.platform.as_str());
    ui::key_value(
        &ctx,
        "Overlays",
        &if report.overlays.is_empty() {
            "none".to_string()
        } else {
            report.overlays.join(", ")
        },
    );
    if let Some(ref fingerprint) = report.fingerprint {
        ui::key_value(&ctx, "Fingerprint", fingerprint);
    }
    println!();

    println!(
        "{:<26} {:<14} {:<16} {}",
        style("NAME").bold(),
        style("VERSION").bold(),
        style("ORIGIN").bold(),
        style("OUT").bold()
    );
    println!("{}", "-".repeat(90));

    for package in &report.packages {
        let origin = package.origin.to_string();
        println!(
            "{:<26} {:<14} {:<16} {}",
            package.name,
            package.version.as_deref().unwrap_or("-"),
            style(origin).dim(),
            package.out.display()
        );
    }

    println!();
    println!("{} package(s)", report.packages.len());

    for name in &report.missing {
        ui::step_warn_hint(
            &ctx,
            &format!("{} is not available on {}", name, report.platform),
            "run devshell check for details",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn evaluation(platform: &str) -> (Config, Evaluation) {
        let temp = TempDir::new().unwrap();
        let config = Config {
            project_dir: Some(temp.path().to_path_buf()),
            ..Config::default()
        };
        let evaluation = evaluate(&config, &Platform::new(platform)).await.unwrap();
        (config, evaluation)
    }

    #[tokio::test]
    async fn report_lists_declared_packages() {
        let (config, evaluation) = evaluation("x86_64-linux").await;
        let report = build_report(&evaluation, &config, false);

        assert_eq!(report.channel, "stable-24.05");
        assert!(report.missing.is_empty());
        assert!(report.fingerprint.is_some());
        assert_eq!(
            report.packages.len(),
            evaluation.dependencies.declared().len()
        );
    }

    #[tokio::test]
    async fn report_flags_missing_on_darwin() {
        let (config, evaluation) = evaluation("aarch64-darwin").await;
        let report = build_report(&evaluation, &config, false);

        assert!(report.missing.iter().any(|name| name == "libX11"));
        assert!(report.fingerprint.is_none());
        // vulkan-loader has a darwin variant
        assert!(report.packages.iter().any(|p| p.name == "vulkan-loader"));
    }

    #[tokio::test]
    async fn all_includes_undeclared_packages() {
        let (mut config, _) = evaluation("x86_64-linux").await;
        config.dependencies.build = vec![];
        config.dependencies.runtime = vec!["clang".into()];
        let evaluation = evaluate(&config, &Platform::new("x86_64-linux"))
            .await
            .unwrap();

        let declared = build_report(&evaluation, &config, false);
        let all = build_report(&evaluation, &config, true);
        assert_eq!(declared.packages.len(), 1);
        assert_eq!(all.packages.len(), evaluation.package_set.len());
    }
}
