//! Output formatting infrastructure for CLI commands.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::models::emotion::EmotionLabel;

/// Output mode for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

/// Print a single item as pretty-printed JSON.
pub fn output_json<T: Serialize>(item: &T) {
    match serde_json::to_string_pretty(item) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize to JSON: {}", e)),
    }
}

/// Print a formatted table with headers and rows.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("{}", "No results found.".dimmed());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    println!("{table}");
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), msg);
}

/// Print a bold section header.
pub fn print_header(title: &str) {
    println!("\n{}\n", title.bold());
}

/// Print a key-value pair line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a titled section with content.
pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.bold().underline());
    println!("{}", content);
}

/// Print a dimmed hint/suggestion message.
pub fn print_hint(msg: &str) {
    println!("{}", msg.dimmed());
}

/// Probability as a percentage with two decimals.
pub fn format_probability(p: f32) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Emotion label colored by emotion.
pub fn colored_label(label: EmotionLabel) -> String {
    let text = label.as_str();
    match label {
        EmotionLabel::Anger => text.red().bold().to_string(),
        EmotionLabel::Fear => text.magenta().bold().to_string(),
        EmotionLabel::Joy => text.green().bold().to_string(),
        EmotionLabel::Sadness => text.blue().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_from_flag() {
        assert_eq!(OutputMode::from_json_flag(true), OutputMode::Json);
        assert_eq!(OutputMode::from_json_flag(false), OutputMode::Human);
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.5), "50.00%");
        assert_eq!(format_probability(0.12345), "12.35%");
        assert_eq!(format_probability(0.0), "0.00%");
    }

    #[test]
    fn test_colored_label_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(colored_label(EmotionLabel::Joy), "joy");
    }
}
