use std::fs;
use std::path::Path;

const PLAIN_NOTATION_MAX: f64 = 1.0e15;
const PLAIN_NOTATION_MIN: f64 = 1.0e-4;

/// Renders a number as a single whitespace-free token the engine's
/// list-directed reader accepts. Uses the shortest exact form and switches to
/// exponent notation outside `[1e-4, 1e15)`.
pub fn format_numeric_token(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && (magnitude >= PLAIN_NOTATION_MAX || magnitude < PLAIN_NOTATION_MIN) {
        return format!("{value:e}");
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Reads a numeric token, accepting Fortran `D` exponents alongside `E`.
pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let normalized = token.replace(['D', 'd'], "E");
    normalized.parse::<f64>().ok()
}

/// Right-justifies every column to its widest cell and joins cells with one
/// space. No header row, no index column.
pub fn align_rows(rows: &[Vec<String>]) -> String {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths = (0..column_count)
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(String::len)
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let mut rendered = String::new();
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:>width$}", width = width))
            .collect::<Vec<_>>()
            .join(" ");
        rendered.push_str(&line);
        rendered.push('\n');
    }
    rendered
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}
