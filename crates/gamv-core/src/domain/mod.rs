pub mod errors;

pub use errors::{ConfigResult, GamvError, GamvErrorCategory, GamvResult, ParseResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Statistic computed by one variogram definition, keyed by the engine's type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VariogramType {
    Semivariogram,
    CrossSemivariogram,
    Covariance,
    Correlogram,
    GeneralRelative,
    PairwiseRelative,
    LogSemivariogram,
    Semimadogram,
    IndicatorContinuous,
    IndicatorCategorical,
}

impl VariogramType {
    pub const ALL: [Self; 10] = [
        Self::Semivariogram,
        Self::CrossSemivariogram,
        Self::Covariance,
        Self::Correlogram,
        Self::GeneralRelative,
        Self::PairwiseRelative,
        Self::LogSemivariogram,
        Self::Semimadogram,
        Self::IndicatorContinuous,
        Self::IndicatorCategorical,
    ];

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Semivariogram),
            2 => Some(Self::CrossSemivariogram),
            3 => Some(Self::Covariance),
            4 => Some(Self::Correlogram),
            5 => Some(Self::GeneralRelative),
            6 => Some(Self::PairwiseRelative),
            7 => Some(Self::LogSemivariogram),
            8 => Some(Self::Semimadogram),
            9 => Some(Self::IndicatorContinuous),
            10 => Some(Self::IndicatorCategorical),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Semivariogram => 1,
            Self::CrossSemivariogram => 2,
            Self::Covariance => 3,
            Self::Correlogram => 4,
            Self::GeneralRelative => 5,
            Self::PairwiseRelative => 6,
            Self::LogSemivariogram => 7,
            Self::Semimadogram => 8,
            Self::IndicatorContinuous => 9,
            Self::IndicatorCategorical => 10,
        }
    }

    pub const fn is_indicator(self) -> bool {
        matches!(self, Self::IndicatorContinuous | Self::IndicatorCategorical)
    }

    /// Covariance output carries tail and head variance columns.
    pub const fn reports_variances(self) -> bool {
        matches!(self, Self::Covariance)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Semivariogram => "semivariogram",
            Self::CrossSemivariogram => "cross semivariogram",
            Self::Covariance => "covariance",
            Self::Correlogram => "correlogram",
            Self::GeneralRelative => "general relative semivariogram",
            Self::PairwiseRelative => "pairwise relative semivariogram",
            Self::LogSemivariogram => "semivariogram of logarithms",
            Self::Semimadogram => "semimadogram",
            Self::IndicatorContinuous => "indicator semivariogram (continuous)",
            Self::IndicatorCategorical => "indicator semivariogram (categorical)",
        }
    }
}

impl Display for VariogramType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<VariogramType> for u8 {
    fn from(value: VariogramType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for VariogramType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown variogram type code {code}"))
    }
}

/// One directional search window: azimuth, azimuth tolerance, horizontal
/// bandwidth, dip, dip tolerance, vertical bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub azimuth: f64,
    pub azimuth_tolerance: f64,
    pub horizontal_bandwidth: f64,
    pub dip: f64,
    pub dip_tolerance: f64,
    pub vertical_bandwidth: f64,
}

impl Direction {
    pub const fn new(
        azimuth: f64,
        azimuth_tolerance: f64,
        horizontal_bandwidth: f64,
        dip: f64,
        dip_tolerance: f64,
        vertical_bandwidth: f64,
    ) -> Self {
        Self {
            azimuth,
            azimuth_tolerance,
            horizontal_bandwidth,
            dip,
            dip_tolerance,
            vertical_bandwidth,
        }
    }

    pub const fn from_array(values: [f64; 6]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4], values[5])
    }

    pub const fn to_array(self) -> [f64; 6] {
        [
            self.azimuth,
            self.azimuth_tolerance,
            self.horizontal_bandwidth,
            self.dip,
            self.dip_tolerance,
            self.vertical_bandwidth,
        ]
    }

    /// Omnidirectional window in the horizontal plane.
    pub const fn omnidirectional(bandwidth: f64) -> Self {
        Self::new(0.0, 90.0, bandwidth, 0.0, 90.0, bandwidth)
    }
}

/// Caller-facing variogram request, validated into a [`VariogramSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariogramDefinition {
    pub tail: usize,
    pub head: usize,
    pub type_code: u8,
    pub cutoff: Option<f64>,
}

impl VariogramDefinition {
    pub const fn new(tail: usize, head: usize, type_code: u8, cutoff: Option<f64>) -> Self {
        Self {
            tail,
            head,
            type_code,
            cutoff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariogramKind {
    Continuous(VariogramType),
    Indicator { kind: VariogramType, cutoff: f64 },
}

/// Validated variogram: tail and head are 1-based positions in the variable list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariogramSpec {
    tail: usize,
    head: usize,
    kind: VariogramKind,
}

impl VariogramSpec {
    pub(crate) const fn new(tail: usize, head: usize, kind: VariogramKind) -> Self {
        Self { tail, head, kind }
    }

    pub const fn tail(&self) -> usize {
        self.tail
    }

    pub const fn head(&self) -> usize {
        self.head
    }

    pub const fn kind(&self) -> VariogramKind {
        self.kind
    }

    pub const fn variogram_type(&self) -> VariogramType {
        match self.kind {
            VariogramKind::Continuous(kind) | VariogramKind::Indicator { kind, .. } => kind,
        }
    }

    pub const fn cutoff(&self) -> Option<f64> {
        match self.kind {
            VariogramKind::Continuous(_) => None,
            VariogramKind::Indicator { cutoff, .. } => Some(cutoff),
        }
    }
}

/// Rectangular sample table: coordinates in columns 1-3, variables after.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    column_count: usize,
    values: Vec<f64>,
}

impl DataTable {
    pub const MIN_COLUMNS: usize = 4;

    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> ConfigResult<Self>
    where
        R: AsRef<[f64]>,
    {
        let mut column_count = None;
        let mut values = Vec::new();

        for (row_index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *column_count.get_or_insert(row.len());
            if row.len() != expected {
                return Err(GamvError::configuration(
                    "CONFIG.TABLE_SHAPE",
                    format!(
                        "data table row {} has {} columns, expected {}",
                        row_index,
                        row.len(),
                        expected
                    ),
                ));
            }
            if let Some(column) = row.iter().position(|value| !value.is_finite()) {
                return Err(GamvError::configuration(
                    "CONFIG.TABLE_VALUE",
                    format!(
                        "data table row {} column {} holds non-finite value {}",
                        row_index,
                        column + 1,
                        row[column]
                    ),
                ));
            }
            values.extend_from_slice(row);
        }

        let Some(column_count) = column_count else {
            return Err(GamvError::configuration(
                "CONFIG.TABLE_SHAPE",
                "data table has no rows",
            ));
        };
        if column_count < Self::MIN_COLUMNS {
            return Err(GamvError::configuration(
                "CONFIG.TABLE_SHAPE",
                format!(
                    "data table needs x, y, z and at least one variable column, got {} columns",
                    column_count
                ),
            ));
        }

        Ok(Self {
            column_count,
            values,
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn row_count(&self) -> usize {
        self.values.len() / self.column_count
    }

    pub fn variable_count(&self) -> usize {
        self.column_count - 3
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.column_count)
    }

    /// Column names written into the materialized file header.
    pub fn column_names(&self) -> Vec<String> {
        ["x", "y", "z"]
            .into_iter()
            .map(str::to_string)
            .chain((1..=self.variable_count()).map(|index| format!("v{index}")))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Table(DataTable),
    EngineDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    EngineDefault,
}
