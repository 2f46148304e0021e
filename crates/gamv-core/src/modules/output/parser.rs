use super::layout::OutputLayout;
use crate::domain::{GamvError, ParseResult};
use crate::modules::serialization::parse_numeric_token;
use tracing::warn;

/// Splits engine output into numeric data lines, skipping the header line
/// at the head of every block. Each returned row has exactly `column_count`
/// values in file order.
pub(super) fn parse_data_lines(
    source: &str,
    layout: OutputLayout,
    column_count: usize,
) -> ParseResult<Vec<Vec<f64>>> {
    let mut lines = source.lines().collect::<Vec<_>>();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let expected = layout.total_line_count();
    if lines.len() != expected {
        return Err(GamvError::parse_failure(
            "PARSE.OUTPUT_LINE_COUNT",
            format!(
                "expected {expected} output lines ({} variograms x {} directions x {} lines), found {}",
                layout.variogram_count(),
                layout.direction_count(),
                layout.block_len(),
                lines.len()
            ),
        ));
    }

    let mut rows = Vec::with_capacity(layout.data_row_count());
    for (index, line) in lines.iter().enumerate() {
        if layout.is_header_line(index) {
            continue;
        }
        rows.push(parse_data_line(line, index + 1, column_count)?);
    }
    Ok(rows)
}

fn parse_data_line(line: &str, line_number: usize, column_count: usize) -> ParseResult<Vec<f64>> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    if tokens.len() < column_count {
        return Err(GamvError::parse_failure(
            "PARSE.OUTPUT_COLUMNS",
            format!(
                "output line {line_number}: expected {column_count} columns, found {}",
                tokens.len()
            ),
        ));
    }
    if tokens.len() > column_count {
        warn!(
            line = line_number,
            expected = column_count,
            found = tokens.len(),
            "ignoring extra columns in engine output"
        );
    }

    tokens[..column_count]
        .iter()
        .enumerate()
        .map(|(column, token)| {
            parse_numeric_token(token).ok_or_else(|| {
                GamvError::parse_failure(
                    "PARSE.OUTPUT_VALUE",
                    format!(
                        "output line {line_number}: invalid numeric token '{token}' in column {}",
                        column + 1
                    ),
                )
            })
        })
        .collect()
}
