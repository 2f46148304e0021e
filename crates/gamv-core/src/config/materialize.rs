use crate::domain::DataTable;
use crate::modules::serialization::format_numeric_token;

const MATERIALIZED_TITLE: &str = "gamv in-memory sample table";

/// GeoEAS layout: title, column count, one name per column, then the rows.
pub(crate) fn render_data_table(table: &DataTable) -> String {
    let names = table.column_names();
    let mut rendered = String::with_capacity(64 + table.row_count() * table.column_count() * 12);

    rendered.push_str(MATERIALIZED_TITLE);
    rendered.push('\n');
    rendered.push_str(&table.column_count().to_string());
    rendered.push('\n');
    for name in &names {
        rendered.push_str(name);
        rendered.push('\n');
    }

    for row in table.rows() {
        let line = row
            .iter()
            .map(|value| format_numeric_token(*value))
            .collect::<Vec<_>>()
            .join(" ");
        rendered.push_str(&line);
        rendered.push('\n');
    }

    rendered
}
