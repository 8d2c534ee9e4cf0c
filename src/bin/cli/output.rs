//! Output formatting for CLI operations.

use serde_json::json;
use std::path::Path;

use csvsplice::TableShape;

use crate::commands::{EditReport, ReadTarget};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the table summary
    fn format_info(&self, path: &Path, shape: TableShape, size: u32) -> String;

    /// Formats text read from the table
    fn format_read(&self, target: ReadTarget, text: &str) -> String;

    /// Formats the outcome of an edit
    fn format_edit(&self, report: &EditReport) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_info(&self, path: &Path, shape: TableShape, size: u32) -> String {
        let mut output = String::new();

        output.push_str("Table Information:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!("  File:           {}\n", path.display()));
        output.push_str(&format!("  Rows:           {}\n", shape.rows));
        output.push_str(&format!(
            "  Columns:        {} ({})\n",
            shape.columns,
            column_letters(shape.columns)
        ));
        output.push_str(&format!(
            "  Size:           {}\n",
            humanize_bytes(size as u64)
        ));

        output
    }

    fn format_read(&self, target: ReadTarget, text: &str) -> String {
        match target {
            // Rows and columns already end with CRLF.
            ReadTarget::Row(_) | ReadTarget::Column(_) => text.replace("\r\n", "\n"),
            ReadTarget::Item { .. } => format!("{}\n", text),
        }
    }

    fn format_edit(&self, report: &EditReport) -> String {
        let mut output = format!(
            "{}: {} rows x {} columns",
            report.operation, report.after.rows, report.after.columns
        );
        if report.before != report.after {
            output.push_str(&format!(
                " (was {} x {})",
                report.before.rows, report.before.columns
            ));
        }
        output.push_str(&format!(", {}\n", humanize_bytes(report.size as u64)));
        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_info(&self, path: &Path, shape: TableShape, size: u32) -> String {
        let obj = json!({
            "file": path.display().to_string(),
            "rows": shape.rows,
            "columns": shape.columns,
            "size": size,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_read(&self, target: ReadTarget, text: &str) -> String {
        let obj = match target {
            ReadTarget::Row(row) => json!({
                "row": row,
                "cells": text.trim_end_matches("\r\n").split(',').collect::<Vec<_>>(),
            }),
            ReadTarget::Column(column) => json!({
                "column": column,
                "cells": text.split_terminator("\r\n").collect::<Vec<_>>(),
            }),
            ReadTarget::Item { row, column } => json!({
                "row": row,
                "column": column,
                "text": text,
            }),
        };

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_edit(&self, report: &EditReport) -> String {
        let obj = json!({
            "operation": report.operation,
            "rows": report.after.rows,
            "columns": report.after.columns,
            "previous_rows": report.before.rows,
            "previous_columns": report.before.columns,
            "size": report.size,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Spreadsheet-style letter range for a column count, e.g. `A-C`.
fn column_letters(columns: u32) -> String {
    let letter = |n: u32| {
        u8::try_from(n - 1)
            .ok()
            .filter(|&i| i < 26)
            .map_or('?', |i| (b'A' + i) as char)
    };
    match columns {
        0 => "-".to_string(),
        1 => "A".to_string(),
        n => format!("A-{}", letter(n)),
    }
}
