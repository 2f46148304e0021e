use super::{DEFAULT_TRIM_RANGE, GamvConfig};
use crate::domain::{
    DataSource, DataTable, Direction, GamvError, OutputTarget, VariogramDefinition,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON form of a run configuration, keyed the way GSLIB names the `gamv`
/// parameters.
///
/// ```json
/// {
///   "datafl": "cluster.dat",
///   "icolx": 1, "icoly": 2, "icolz": 0,
///   "ivar": [3, 4],
///   "nlag": 10, "xlag": 5.0, "xltol": 3.0,
///   "ivdir": [[0.0, 90.0, 50.0, 0.0, 90.0, 50.0]],
///   "standardize": 1,
///   "ivpar": [[1, 1, 1, null], [2, 2, 9, 2.5]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub datafl: Option<DocumentDataSource>,
    #[serde(default = "default_column_x")]
    pub icolx: usize,
    #[serde(default = "default_column_y")]
    pub icoly: usize,
    #[serde(default = "default_column_z")]
    pub icolz: usize,
    #[serde(default)]
    pub ivar: Vec<usize>,
    #[serde(default = "default_tmin")]
    pub tmin: f64,
    #[serde(default = "default_tmax")]
    pub tmax: f64,
    #[serde(default)]
    pub outfl: Option<PathBuf>,
    pub nlag: usize,
    pub xlag: f64,
    pub xltol: f64,
    pub ivdir: Vec<[f64; 6]>,
    #[serde(default)]
    pub standardize: Option<StandardizeFlag>,
    pub ivpar: Vec<(usize, usize, u8, Option<f64>)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DocumentDataSource {
    Path(PathBuf),
    Table(Vec<Vec<f64>>),
}

/// Accepts the engine's `0`/`1` as well as JSON booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StandardizeFlag {
    Bool(bool),
    Code(u8),
}

impl StandardizeFlag {
    pub fn enabled(self) -> bool {
        match self {
            Self::Bool(enabled) => enabled,
            Self::Code(code) => code != 0,
        }
    }
}

fn default_column_x() -> usize {
    1
}

fn default_column_y() -> usize {
    2
}

fn default_column_z() -> usize {
    3
}

fn default_tmin() -> f64 {
    DEFAULT_TRIM_RANGE.0
}

fn default_tmax() -> f64 {
    DEFAULT_TRIM_RANGE.1
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigDocumentError {
    #[error("failed to read gamv configuration '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse gamv configuration '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] GamvError),
}

impl ConfigDocument {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Runs the same validation as the builder.
    pub fn into_config(self) -> Result<GamvConfig, GamvError> {
        let data_source = match self.datafl {
            None => DataSource::EngineDefault,
            Some(DocumentDataSource::Path(path)) => DataSource::File(path),
            Some(DocumentDataSource::Table(rows)) => DataSource::Table(DataTable::from_rows(rows)?),
        };
        let output_target = self
            .outfl
            .map_or(OutputTarget::EngineDefault, OutputTarget::File);

        GamvConfig::builder()
            .with_data_source(data_source)
            .with_coordinate_columns(self.icolx, self.icoly, self.icolz)
            .with_variable_columns(self.ivar)
            .with_trim_range(self.tmin, self.tmax)
            .with_output_target(output_target)
            .with_lags(self.nlag, self.xlag, self.xltol)
            .with_standardize_sill(self.standardize.is_some_and(StandardizeFlag::enabled))
            .with_directions(self.ivdir.into_iter().map(Direction::from_array))
            .with_variograms(self.ivpar.into_iter().map(|(tail, head, type_code, cutoff)| {
                VariogramDefinition::new(tail, head, type_code, cutoff)
            }))
            .build()
    }
}

pub fn load_config_document(path: impl AsRef<Path>) -> Result<GamvConfig, ConfigDocumentError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigDocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document =
        ConfigDocument::from_json_str(&source).map_err(|source| ConfigDocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(document.into_config()?)
}
