//! Console status output with colored prefixes.

use colored::Colorize;

/// Prints a green check-marked status line for a completed step.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Prints a plain informational line.
pub fn info(msg: &str) {
    println!("{}", msg);
}

/// Prints a yellow warning line to stderr.
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}
