use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::context::{Verbosity, verbosity};
use crate::core::traits::command_runner::CommandOutput;

fn visible() -> bool {
    verbosity() > Verbosity::Quiet
}

/// Print a success message.
pub fn success(msg: &str) {
    if visible() {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if visible() {
        println!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message. Shown even in quiet mode.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if visible() {
        println!("\n{}", msg.bold());
    }
}

/// Print an indented line of plain output.
pub fn line(msg: &str) {
    if visible() {
        println!("    {msg}");
    }
}

/// Relay what an external command printed. Stderr lines are yellow.
pub fn command_output(out: &CommandOutput) {
    for l in out.stdout.lines().filter(|l| !l.trim().is_empty()) {
        line(l);
    }
    for l in out.stderr.lines().filter(|l| !l.trim().is_empty()) {
        line(&l.yellow().to_string());
    }
}

/// Print a detail line, only with `--verbose`.
pub fn detail(msg: &str) {
    if verbosity() == Verbosity::Verbose {
        println!("    {}", msg.dimmed());
    }
}

/// Mask a secret value for display.
pub fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        "••••••".to_string()
    }
}

/// Start a spinner with the given message. Hidden in quiet mode.
pub fn spinner(msg: &str) -> ProgressBar {
    if !visible() {
        return ProgressBar::hidden();
    }
    let sp = ProgressBar::new_spinner();
    sp.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    sp.set_message(msg.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    sp
}

/// Run `f` behind a spinner, clearing it whatever the outcome.
pub fn with_spinner<T, E>(msg: &str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let sp = spinner(msg);
    let result = f();
    sp.finish_and_clear();
    result
}
