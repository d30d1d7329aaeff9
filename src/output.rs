use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::{FetchError, Result};

static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_format(format: OutputFormat) {
    OUTPUT_JSON.store(matches!(format, OutputFormat::Json), Ordering::Relaxed);
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    println!("{}", render_table(items, to_row, is_json_output()));
}

/// Render `items` as pretty JSON or as a rounded table
pub fn render_table<T, R, F>(items: &[T], to_row: F, json: bool) -> String
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        serde_json::to_string_pretty(items).unwrap_or_default()
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Print a success message, or a JSON summary in JSON mode
pub fn print_success<T: Serialize>(message: &str, summary: &T) {
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(summary).unwrap_or_default());
    } else if !is_quiet() {
        println!("{} {message}", "✓".green().bold());
    }
}

/// Progress notes go to stderr so stdout stays clean for JSON
pub fn print_progress(message: &str) {
    if !is_quiet() {
        eprintln!("{}", message.bright_black());
    }
}

pub fn print_warning(message: &str) {
    eprintln!("{} {message}", "✗".red().bold());
}

/// Pretty JSON with two-space indentation; non-ASCII stays unescaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(FetchError::Serialize)
}

/// Serialize `items` and overwrite `path` with the result.
pub fn write_json_file<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let contents = to_pretty_json(items)?;

    std::fs::write(path, contents).map_err(|e| FetchError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
