use super::model::VariogramTable;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub pairless_rows: usize,
    pub zero_separation_rows: usize,
}

/// Nulls statistics that carry no information: rows without pairs lose their
/// value and both means, rows at zero separation lose their value.
/// Running it twice changes nothing further.
pub fn clean_table(table: &mut VariogramTable) -> CleanupSummary {
    let mut summary = CleanupSummary::default();
    for row in table.rows_mut() {
        if !row.has_pairs() {
            row.value = None;
            row.tail_mean = None;
            row.head_mean = None;
            summary.pairless_rows += 1;
        }
        if row.average_separation == 0.0 {
            row.value = None;
            summary.zero_separation_rows += 1;
        }
    }
    debug!(
        pairless = summary.pairless_rows,
        zero_separation = summary.zero_separation_rows,
        "cleaned variogram table"
    );
    summary
}
