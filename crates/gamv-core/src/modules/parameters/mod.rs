mod parser;

pub use parser::{ParameterFile, parse_parameter_file};

use super::serialization::{align_rows, format_numeric_token, write_text_artifact};
use crate::config::GamvConfig;
use crate::domain::{GamvError, GamvResult, VariogramSpec};
use std::path::{Path, PathBuf};

pub const PARAMETER_FILE_NAME: &str = "gamv.par";

pub(crate) const PARAMETER_BANNER: [&str; 3] = [
    "                  Parameters for GAMV",
    "                  *******************",
    "",
];
pub(crate) const START_MARKER: &str = "START OF PARAMETERS:";

/// Continuous variograms never read a cutoff; the slot still needs a numeric token.
pub const ABSENT_CUTOFF_TOKEN: &str = "0";

const COMMENT_COLUMN: usize = 34;

/// File names written into the parameter file, as the engine will resolve
/// them from its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPaths {
    pub data_file: PathBuf,
    pub output_file: PathBuf,
}

pub fn render_parameter_file(config: &GamvConfig, paths: &ParameterPaths) -> String {
    let mut lines = PARAMETER_BANNER
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>();
    lines.push(START_MARKER.to_string());

    let [icolx, icoly, icolz] = config.coordinate_columns();
    let variables = config.variable_columns();
    let (tmin, tmax) = config.trim_range();

    lines.push(annotate(
        paths.data_file.display().to_string(),
        "-file with data",
    ));
    lines.push(annotate(
        format!("{icolx} {icoly} {icolz}"),
        "-   columns for X, Y, Z coordinates",
    ));
    lines.push(annotate(
        std::iter::once(variables.len())
            .chain(variables.iter().copied())
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        "-   number of variables, column numbers",
    ));
    lines.push(annotate(
        format!(
            "{} {}",
            format_numeric_token(tmin),
            format_numeric_token(tmax)
        ),
        "-   trimming limits",
    ));
    lines.push(annotate(
        paths.output_file.display().to_string(),
        "-file for variogram output",
    ));
    lines.push(annotate(config.lag_count().to_string(), "-number of lags"));
    lines.push(annotate(
        format_numeric_token(config.lag_separation()),
        "-lag separation distance",
    ));
    lines.push(annotate(
        format_numeric_token(config.lag_tolerance()),
        "-lag tolerance",
    ));
    lines.push(annotate(
        config.directions().len().to_string(),
        "-number of directions",
    ));
    lines.push(render_direction_block(config));
    lines.push(annotate(
        u8::from(config.standardize_sill()).to_string(),
        "-standardize sill? (0=no, 1=yes)",
    ));
    lines.push(annotate(
        config.variograms().len().to_string(),
        "-number of variograms",
    ));
    lines.push(render_variogram_block(config.variograms()));

    let mut rendered = lines.join("\n");
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

pub fn write_parameter_file(path: &Path, rendered: &str) -> GamvResult<()> {
    write_text_artifact(path, rendered).map_err(|source| {
        GamvError::io_system(
            "IO.PARAMETER_FILE_WRITE",
            format!(
                "failed to write parameter file '{}': {}",
                path.display(),
                source
            ),
        )
    })
}

fn annotate(value: String, comment: &str) -> String {
    if value.len() < COMMENT_COLUMN {
        format!("{value:<width$}{comment}", width = COMMENT_COLUMN)
    } else {
        format!("{value}   {comment}")
    }
}

fn render_direction_block(config: &GamvConfig) -> String {
    let rows = config
        .directions()
        .iter()
        .map(|direction| {
            direction
                .to_array()
                .iter()
                .map(|value| format_numeric_token(*value))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    align_rows(&rows).trim_end_matches('\n').to_string()
}

fn render_variogram_block(variograms: &[VariogramSpec]) -> String {
    let rows = variograms
        .iter()
        .map(|spec| {
            vec![
                spec.tail().to_string(),
                spec.head().to_string(),
                spec.variogram_type().code().to_string(),
                spec.cutoff().map_or_else(
                    || ABSENT_CUTOFF_TOKEN.to_string(),
                    format_numeric_token,
                ),
            ]
        })
        .collect::<Vec<_>>();
    align_rows(&rows).trim_end_matches('\n').to_string()
}
