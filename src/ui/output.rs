//! Output functions for consistent CLI formatting

use super::context::UiContext;
use console::style;

fn marker(ctx: &UiContext, fancy: &'static str, plain: &'static str) -> &'static str {
    if ctx.use_fancy_output() {
        fancy
    } else {
        plain
    }
}

/// Display a section header
pub fn section(_ctx: &UiContext, title: &str) {
    println!();
    println!("{}", style(title).bold());
}

/// Display a success step with detail
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    println!(
        "  {} {} ({})",
        style(marker(ctx, "✓", "[OK]")).green(),
        message,
        style(detail).dim()
    );
}

/// Display a warning step
pub fn step_warn(ctx: &UiContext, message: &str) {
    println!("  {} {}", style(marker(ctx, "⚠", "[WARN]")).yellow(), message);
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    println!(
        "  {} {} - {}",
        style(marker(ctx, "⚠", "[WARN]")).yellow(),
        message,
        style(hint).dim()
    );
}

/// Display an error step with detail
pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    println!(
        "  {} {}: {}",
        style(marker(ctx, "✗", "[FAIL]")).red(),
        message,
        style(detail).red()
    );
}

/// Print styled key-value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Display success outro
pub fn outro_success(_ctx: &UiContext, message: &str) {
    println!();
    println!("{}", style(message).green().bold());
}

/// Display warning outro
pub fn outro_warn(_ctx: &UiContext, message: &str) {
    println!();
    println!("{}", style(message).yellow().bold());
}

/// Display error outro
pub fn outro_error(_ctx: &UiContext, message: &str) {
    println!();
    println!("{}", style(message).red().bold());
}
