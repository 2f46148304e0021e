use super::layout::{OutputLayout, RowKey};
use crate::domain::VariogramType;
use serde::Serialize;

pub const BASE_COLUMNS: [&str; 6] = [
    "lag_ordinal",
    "average_separation",
    "value",
    "pair_count",
    "tail_mean",
    "head_mean",
];
pub const VARIANCE_COLUMNS: [&str; 2] = ["tail_variance", "head_variance"];

/// One lag class of one directional variogram. Missing statistics are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariogramRow {
    pub variogram: usize,
    pub direction: usize,
    pub lag: usize,
    pub lag_ordinal: f64,
    pub average_separation: f64,
    pub value: Option<f64>,
    pub pair_count: f64,
    pub tail_mean: Option<f64>,
    pub head_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_variance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_variance: Option<f64>,
    pub tail: usize,
    pub head: usize,
    pub variogram_type: VariogramType,
    pub cutoff: Option<f64>,
}

impl VariogramRow {
    pub fn key(&self) -> RowKey {
        RowKey::new(self.variogram, self.direction, self.lag)
    }

    pub fn has_pairs(&self) -> bool {
        self.pair_count != 0.0
    }
}

/// Engine output reshaped into rows keyed by (variogram, direction, lag).
/// Rows are stored in output order, so every (variogram, direction) series
/// and every variogram is a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct VariogramTable {
    layout: OutputLayout,
    reports_variances: bool,
    rows: Vec<VariogramRow>,
}

impl VariogramTable {
    pub(crate) fn new(
        layout: OutputLayout,
        reports_variances: bool,
        rows: Vec<VariogramRow>,
    ) -> Self {
        Self {
            layout,
            reports_variances,
            rows,
        }
    }

    pub fn layout(&self) -> OutputLayout {
        self.layout
    }

    pub fn reports_variances(&self) -> bool {
        self.reports_variances
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[VariogramRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [VariogramRow] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<VariogramRow> {
        self.rows
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        let mut columns = BASE_COLUMNS.to_vec();
        if self.reports_variances {
            columns.extend(VARIANCE_COLUMNS);
        }
        columns
    }

    pub fn get(&self, key: RowKey) -> Option<&VariogramRow> {
        self.layout
            .ordinal(key)
            .and_then(|ordinal| self.rows.get(ordinal))
    }

    /// Lag classes of one (variogram, direction) pair in lag order.
    pub fn series(&self, variogram: usize, direction: usize) -> Option<&[VariogramRow]> {
        let start = self.layout.ordinal(RowKey::new(variogram, direction, 0))?;
        self.rows.get(start..start + self.layout.lags_per_block())
    }

    /// All directions of one variogram, direction-major.
    pub fn variogram(&self, variogram: usize) -> Option<&[VariogramRow]> {
        let start = self.layout.ordinal(RowKey::new(variogram, 0, 0))?;
        let len = self.layout.direction_count() * self.layout.lags_per_block();
        self.rows.get(start..start + len)
    }

    pub fn directions_of(&self, variogram: usize) -> impl Iterator<Item = &[VariogramRow]> {
        (0..self.layout.direction_count())
            .filter_map(move |direction| self.series(variogram, direction))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}
