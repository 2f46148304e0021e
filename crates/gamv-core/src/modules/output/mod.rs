mod cleanup;
mod layout;
mod model;
mod parser;

pub use cleanup::{CleanupSummary, clean_table};
pub use layout::{OutputLayout, RowKey};
pub use model::{BASE_COLUMNS, VARIANCE_COLUMNS, VariogramRow, VariogramTable};

use crate::config::GamvConfig;
use crate::domain::{GamvError, GamvResult, ParseResult};
use std::fs;
use std::path::Path;

/// Name the engine writes when no output path is configured.
pub const OUTPUT_FILE_NAME: &str = "gamv.out";

pub fn output_layout(config: &GamvConfig) -> OutputLayout {
    OutputLayout::new(
        config.variograms().len(),
        config.directions().len(),
        config.lag_count(),
    )
}

/// Reshapes raw engine output into a keyed table without cleaning it.
pub fn reshape_output(source: &str, config: &GamvConfig) -> ParseResult<VariogramTable> {
    let layout = output_layout(config);
    let reports_variances = config.reports_variances();
    let column_count = if reports_variances {
        BASE_COLUMNS.len() + VARIANCE_COLUMNS.len()
    } else {
        BASE_COLUMNS.len()
    };

    let values = parser::parse_data_lines(source, layout, column_count)?;
    let rows = values
        .into_iter()
        .enumerate()
        .map(|(ordinal, columns)| {
            let key = layout.row_key(ordinal).ok_or_else(|| {
                GamvError::parse_failure(
                    "PARSE.OUTPUT_LINE_COUNT",
                    format!("data row {ordinal} lies outside the expected output layout"),
                )
            })?;
            let spec = &config.variograms()[key.variogram];
            Ok(VariogramRow {
                variogram: key.variogram,
                direction: key.direction,
                lag: key.lag,
                lag_ordinal: columns[0],
                average_separation: columns[1],
                value: Some(columns[2]),
                pair_count: columns[3],
                tail_mean: Some(columns[4]),
                head_mean: Some(columns[5]),
                tail_variance: columns.get(6).copied(),
                head_variance: columns.get(7).copied(),
                tail: spec.tail(),
                head: spec.head(),
                variogram_type: spec.variogram_type(),
                cutoff: spec.cutoff(),
            })
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(VariogramTable::new(layout, reports_variances, rows))
}

/// Reads an engine output file, reshapes it and applies the cleanup pass.
#[tracing::instrument(level = "debug", skip(config), fields(path = %path.display()))]
pub fn read_output_table(path: &Path, config: &GamvConfig) -> GamvResult<VariogramTable> {
    let source = fs::read_to_string(path).map_err(|source| {
        GamvError::io_system(
            "IO.OUTPUT_READ",
            format!(
                "failed to read engine output '{}': {}",
                path.display(),
                source
            ),
        )
    })?;
    let mut table = reshape_output(&source, config)?;
    clean_table(&mut table);
    Ok(table)
}
