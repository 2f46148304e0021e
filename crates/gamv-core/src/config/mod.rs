//! Validated run configuration for the `gamv` engine.
//!
//! Everything the parameter file needs is checked once in
//! [`GamvConfigBuilder::build`]; the resulting [`GamvConfig`] is immutable and
//! the later stages (rendering, reshaping) assume its invariants hold.

mod document;
mod materialize;

pub use document::{
    ConfigDocument, ConfigDocumentError, DocumentDataSource, StandardizeFlag, load_config_document,
};
pub(crate) use materialize::render_data_table;

use crate::domain::{
    ConfigResult, DataSource, Direction, GamvError, OutputTarget, VariogramDefinition,
    VariogramKind, VariogramSpec, VariogramType,
};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_TRIM_RANGE: (f64, f64) = (-1.0e21, 1.0e21);

/// Table columns holding X, Y and Z when the data source is in memory.
const TABLE_COORDINATE_COLUMNS: [usize; 3] = [1, 2, 3];

#[derive(Debug, Clone, PartialEq)]
pub struct GamvConfig {
    data_source: DataSource,
    coordinate_columns: [usize; 3],
    variable_columns: Vec<usize>,
    trim_range: (f64, f64),
    output_target: OutputTarget,
    lag_count: usize,
    lag_separation: f64,
    lag_tolerance: f64,
    standardize_sill: bool,
    directions: Vec<Direction>,
    variograms: Vec<VariogramSpec>,
}

impl GamvConfig {
    pub fn builder() -> GamvConfigBuilder {
        GamvConfigBuilder::new()
    }

    pub fn data_source(&self) -> &DataSource {
        &self.data_source
    }

    /// 1-based X, Y, Z columns; 0 marks an unused coordinate.
    pub fn coordinate_columns(&self) -> [usize; 3] {
        self.coordinate_columns
    }

    pub fn variable_columns(&self) -> &[usize] {
        &self.variable_columns
    }

    pub fn trim_range(&self) -> (f64, f64) {
        self.trim_range
    }

    pub fn output_target(&self) -> &OutputTarget {
        &self.output_target
    }

    pub fn lag_count(&self) -> usize {
        self.lag_count
    }

    pub fn lag_separation(&self) -> f64 {
        self.lag_separation
    }

    pub fn lag_tolerance(&self) -> f64 {
        self.lag_tolerance
    }

    pub fn standardize_sill(&self) -> bool {
        self.standardize_sill
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn variograms(&self) -> &[VariogramSpec] {
        &self.variograms
    }

    /// Tail and head variance columns appear in the output for every row as
    /// soon as one requested variogram is a covariance.
    pub fn reports_variances(&self) -> bool {
        self.variograms
            .iter()
            .any(|spec| spec.variogram_type().reports_variances())
    }
}

/// Accumulates raw caller input; nothing is checked until [`Self::build`].
#[derive(Debug, Clone)]
pub struct GamvConfigBuilder {
    data_source: DataSource,
    coordinate_columns: [usize; 3],
    variable_columns: Vec<usize>,
    trim_range: (f64, f64),
    output_target: OutputTarget,
    lag_count: usize,
    lag_separation: f64,
    lag_tolerance: f64,
    standardize_sill: bool,
    directions: Vec<Direction>,
    variograms: Vec<VariogramDefinition>,
}

impl Default for GamvConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GamvConfigBuilder {
    /// Defaults: engine-default input and output names, columns X=1, Y=2,
    /// Z=3, trimming limits of +/-1e21, unstandardized sill. Lags, directions
    /// and variograms have no usable default and must be set.
    pub fn new() -> Self {
        Self {
            data_source: DataSource::EngineDefault,
            coordinate_columns: TABLE_COORDINATE_COLUMNS,
            variable_columns: Vec::new(),
            trim_range: DEFAULT_TRIM_RANGE,
            output_target: OutputTarget::EngineDefault,
            lag_count: 0,
            lag_separation: 0.0,
            lag_tolerance: 0.0,
            standardize_sill: false,
            directions: Vec::new(),
            variograms: Vec::new(),
        }
    }

    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_source = source;
        self
    }

    pub fn with_coordinate_columns(mut self, x: usize, y: usize, z: usize) -> Self {
        self.coordinate_columns = [x, y, z];
        self
    }

    pub fn with_variable_columns(mut self, columns: impl Into<Vec<usize>>) -> Self {
        self.variable_columns = columns.into();
        self
    }

    pub fn with_trim_range(mut self, min: f64, max: f64) -> Self {
        self.trim_range = (min, max);
        self
    }

    pub fn with_output_target(mut self, target: OutputTarget) -> Self {
        self.output_target = target;
        self
    }

    pub fn with_lags(mut self, count: usize, separation: f64, tolerance: f64) -> Self {
        self.lag_count = count;
        self.lag_separation = separation;
        self.lag_tolerance = tolerance;
        self
    }

    pub fn with_standardize_sill(mut self, standardize: bool) -> Self {
        self.standardize_sill = standardize;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.directions.push(direction);
        self
    }

    pub fn with_directions(mut self, directions: impl IntoIterator<Item = Direction>) -> Self {
        self.directions.extend(directions);
        self
    }

    pub fn with_variogram(mut self, definition: VariogramDefinition) -> Self {
        self.variograms.push(definition);
        self
    }

    pub fn with_variograms(
        mut self,
        definitions: impl IntoIterator<Item = VariogramDefinition>,
    ) -> Self {
        self.variograms.extend(definitions);
        self
    }

    pub fn build(self) -> ConfigResult<GamvConfig> {
        let (coordinate_columns, variable_columns) = match &self.data_source {
            DataSource::Table(table) => {
                let variables: Vec<usize> =
                    (TABLE_COORDINATE_COLUMNS[2] + 1..=table.column_count()).collect();
                debug!(
                    columns = table.column_count(),
                    rows = table.row_count(),
                    "in-memory table overrides caller column roles"
                );
                (TABLE_COORDINATE_COLUMNS, variables)
            }
            DataSource::File(path) => {
                validate_engine_path(path, "data file")?;
                (self.coordinate_columns, self.variable_columns)
            }
            DataSource::EngineDefault => (self.coordinate_columns, self.variable_columns),
        };
        if let OutputTarget::File(path) = &self.output_target {
            validate_engine_path(path, "output file")?;
        }

        validate_variable_columns(&variable_columns)?;
        validate_lags(self.lag_count, self.lag_separation, self.lag_tolerance)?;
        validate_trim_range(self.trim_range)?;
        validate_directions(&self.directions)?;
        let variograms = validate_variograms(&self.variograms, variable_columns.len())?;

        Ok(GamvConfig {
            data_source: self.data_source,
            coordinate_columns,
            variable_columns,
            trim_range: self.trim_range,
            output_target: self.output_target,
            lag_count: self.lag_count,
            lag_separation: self.lag_separation,
            lag_tolerance: self.lag_tolerance,
            standardize_sill: self.standardize_sill,
            directions: self.directions,
            variograms,
        })
    }
}

/// The engine reads file names up to the first blank.
pub(crate) fn validate_engine_path(path: &Path, role: &str) -> ConfigResult<()> {
    let text = path.to_str().ok_or_else(|| {
        GamvError::configuration(
            "CONFIG.PATH",
            format!("{} path '{}' is not valid UTF-8", role, path.display()),
        )
    })?;
    if text.is_empty() {
        return Err(GamvError::configuration(
            "CONFIG.PATH",
            format!("{role} path is empty"),
        ));
    }
    if text.chars().any(char::is_whitespace) {
        return Err(GamvError::configuration(
            "CONFIG.PATH",
            format!("{role} path '{text}' contains whitespace, which the engine cannot read"),
        ));
    }
    Ok(())
}

fn validate_variable_columns(columns: &[usize]) -> ConfigResult<()> {
    if columns.is_empty() {
        return Err(GamvError::configuration(
            "CONFIG.VARIABLE_COLUMNS",
            "at least one variable column is required",
        ));
    }
    if let Some(position) = columns.iter().position(|column| *column == 0) {
        return Err(GamvError::configuration(
            "CONFIG.VARIABLE_COLUMNS",
            format!("variable column entry {position} is 0; columns are 1-based"),
        ));
    }
    Ok(())
}

fn validate_lags(count: usize, separation: f64, tolerance: f64) -> ConfigResult<()> {
    if count == 0 {
        return Err(GamvError::configuration(
            "CONFIG.LAGS",
            "lag count must be at least 1",
        ));
    }
    if !separation.is_finite() || separation <= 0.0 {
        return Err(GamvError::configuration(
            "CONFIG.LAGS",
            format!("lag separation must be positive and finite, got {separation}"),
        ));
    }
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(GamvError::configuration(
            "CONFIG.LAGS",
            format!("lag tolerance must be non-negative and finite, got {tolerance}"),
        ));
    }
    Ok(())
}

fn validate_trim_range((min, max): (f64, f64)) -> ConfigResult<()> {
    if min.is_nan() || max.is_nan() || min > max {
        return Err(GamvError::configuration(
            "CONFIG.TRIM_RANGE",
            format!("trimming limits must satisfy min <= max, got ({min}, {max})"),
        ));
    }
    Ok(())
}

fn validate_directions(directions: &[Direction]) -> ConfigResult<()> {
    if directions.is_empty() {
        return Err(GamvError::configuration(
            "CONFIG.DIRECTIONS",
            "at least one direction is required",
        ));
    }
    for (index, direction) in directions.iter().enumerate() {
        if direction.to_array().iter().any(|value| !value.is_finite()) {
            return Err(GamvError::configuration(
                "CONFIG.DIRECTIONS",
                format!("direction {index} has a non-finite parameter: {direction:?}"),
            ));
        }
    }
    Ok(())
}

fn validate_variograms(
    definitions: &[VariogramDefinition],
    variable_count: usize,
) -> ConfigResult<Vec<VariogramSpec>> {
    if definitions.is_empty() {
        return Err(GamvError::configuration(
            "CONFIG.VARIOGRAMS",
            "at least one variogram definition is required",
        ));
    }

    definitions
        .iter()
        .enumerate()
        .map(|(index, definition)| validate_variogram(index, definition, variable_count))
        .collect()
}

fn validate_variogram(
    index: usize,
    definition: &VariogramDefinition,
    variable_count: usize,
) -> ConfigResult<VariogramSpec> {
    for (role, position) in [("tail", definition.tail), ("head", definition.head)] {
        if position == 0 || position > variable_count {
            return Err(GamvError::configuration(
                "CONFIG.VARIABLE_INDEX",
                format!(
                    "variogram {} {} variable {} is outside 1..={} of the variable list",
                    index, role, position, variable_count
                ),
            ));
        }
    }

    let variogram_type = VariogramType::from_code(definition.type_code).ok_or_else(|| {
        GamvError::configuration(
            "CONFIG.VARIOGRAM_TYPE",
            format!(
                "variogram {} has type code {}, expected 1..=10",
                index, definition.type_code
            ),
        )
    })?;

    let kind = if variogram_type.is_indicator() {
        match definition.cutoff {
            Some(cutoff) if cutoff.is_finite() => VariogramKind::Indicator {
                kind: variogram_type,
                cutoff,
            },
            Some(cutoff) => {
                return Err(GamvError::configuration(
                    "CONFIG.CUTOFF",
                    format!("variogram {index} has non-finite cutoff {cutoff}"),
                ));
            }
            None => {
                return Err(GamvError::configuration(
                    "CONFIG.MISSING_CUTOFF",
                    format!(
                        "variogram {} has indicator type {} but no cutoff",
                        index, definition.type_code
                    ),
                ));
            }
        }
    } else {
        if definition.cutoff.is_some() {
            debug!(
                variogram = index,
                type_code = definition.type_code,
                "dropping cutoff on non-indicator variogram"
            );
        }
        VariogramKind::Continuous(variogram_type)
    };

    Ok(VariogramSpec::new(definition.tail, definition.head, kind))
}
