//! Terminal output helpers.
//!
//! Colors follow TTY detection and the `NO_COLOR` environment variable.
//! Results go to stdout; diagnostics go to stderr.

pub mod json;
pub mod table;

use owo_colors::OwoColorize;
use std::io::{IsTerminal, stderr, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Detect if we're running in a terminal
static IS_TTY: std::sync::LazyLock<bool> =
    std::sync::LazyLock::new(|| stdout().is_terminal() && stderr().is_terminal());

/// Check if `NO_COLOR` environment variable is set
static NO_COLOR: std::sync::LazyLock<bool> =
    std::sync::LazyLock::new(|| std::env::var_os("NO_COLOR").is_some());

/// Initialize output settings from the environment and flags.
pub fn init(quiet: bool) {
    COLOR_ENABLED.store(*IS_TTY && !*NO_COLOR, Ordering::Relaxed);
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Check if colors are enabled
pub fn colors_enabled() -> bool {
    COLOR_ENABLED.load(Ordering::Relaxed)
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a success message
pub fn success(text: &str) {
    if quiet() {
        return;
    }
    if colors_enabled() {
        println!("{} {}", "✓".green(), text);
    } else {
        println!("OK {text}");
    }
}

/// Print a warning message
pub fn warning(text: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "!".yellow(), text.yellow());
    } else {
        eprintln!("warning: {text}");
    }
}

/// Print an error message
pub fn error(text: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red(), text.red());
    } else {
        eprintln!("error: {text}");
    }
}

/// Print an info message
pub fn info(text: &str) {
    if quiet() {
        return;
    }
    if colors_enabled() {
        println!("{} {}", "•".blue(), text);
    } else {
        println!("{text}");
    }
}

/// Print one result line without decoration.
pub fn line(text: &str) {
    println!("{text}");
}

/// Print a dimmed secondary line to stderr.
pub fn dim(text: &str) {
    if quiet() {
        return;
    }
    if colors_enabled() {
        eprintln!("{}", text.dimmed());
    } else {
        eprintln!("{text}");
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
