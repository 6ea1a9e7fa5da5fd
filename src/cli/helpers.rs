//! Shared helper functions for CLI commands.

use std::io::{self, Write};

use console::style;

use crate::models::{DocumentStats, DocumentType};
use crate::view::{Notification, ViewController};

/// Truncate a string to `max` characters with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();
    let chunks: Vec<_> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();
    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Label for a `documents_by_type` key, falling back to the raw key.
pub fn type_label(key: &str) -> String {
    DocumentType::from_str(key)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| key.to_string())
}

/// One-line summary of document stats.
pub fn stats_line(stats: &DocumentStats) -> String {
    let by_type: Vec<String> = stats
        .documents_by_type
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(key, count)| format!("{}: {}", type_label(key), format_number(*count)))
        .collect();

    if by_type.is_empty() {
        format!("{} documents", format_number(stats.total_documents))
    } else {
        format!(
            "{} documents ({})",
            format_number(stats.total_documents),
            by_type.join(", ")
        )
    }
}

/// Print the refreshed stats after a mutation, if they loaded.
pub fn print_stats_line(view: &ViewController) {
    if let Some(stats) = view.stats() {
        println!("  {} {}", style("→").dim(), stats_line(stats));
    }
}

fn print_notification(notification: &Notification) {
    if notification.is_error() {
        eprintln!("{} {}", style("✗").red(), notification);
    } else {
        println!("{} {}", style("✓").green(), notification);
    }
}

/// Drain and print the view's notifications.
pub fn print_notifications(view: &mut ViewController) {
    for notification in view.take_notifications() {
        print_notification(&notification);
    }
}

/// Ask a yes/no question on stdin. Anything but `y` means no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
