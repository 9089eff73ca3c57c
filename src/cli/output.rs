//! CLI output formatting.
//!
//! Human mode prints colored status lines and `tabled` tables. JSON mode
//! prints exactly one JSON document per command on stdout, so output can be
//! piped straight into other tools. Errors always go to stderr.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::error::Result;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }
}

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// Apply output settings from global CLI flags. Only the first call counts.
pub fn configure(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

fn read_config() -> OutputConfig {
    OUTPUT_CONFIG.get().copied().unwrap_or_default()
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Print `value` as the command's JSON document.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success line.
pub fn success(message: &str) {
    println!(
        "  {} {}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green()),
        message
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!(
        "  {:<14} {}",
        label.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        value
    );
}

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
}

/// Print a note line, such as an empty-result hint.
pub fn note(message: &str) {
    println!("  {}", message.if_supports_color(Stream::Stdout, |t| t.dimmed()));
}

/// Print rows as an indented table, or a note when there are none.
pub fn table<T: Tabled>(rows: Vec<T>, empty: &str) {
    if rows.is_empty() {
        note(empty);
        return;
    }
    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "error": message }));
        return;
    }
    eprintln!(
        "  {} {}",
        "×".if_supports_color(Stream::Stderr, |t| t.red()),
        message
    );
}

/// Format a signed amount green when positive and red when negative.
#[must_use]
pub fn signed(value: rust_decimal::Decimal) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        format!("{}", value.if_supports_color(Stream::Stdout, |t| t.red()))
    } else if value.is_zero() {
        value.to_string()
    } else {
        format!("{}", value.if_supports_color(Stream::Stdout, |t| t.green()))
    }
}
