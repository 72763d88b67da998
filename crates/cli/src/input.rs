use std::path::Path;

use model::table::{Cell, ColumnSpec, ColumnType, Row, Table, TableSchema};

use crate::error::CliError;

/// Reads a CSV file into an in-memory table. The header row names the
/// columns; every value is kept as text and empty fields become missing
/// cells, matching how optional values are written on the fetch side.
pub fn read_table(path: &Path) -> Result<Table, CliError> {
    let input_error = |source: csv::Error| CliError::InputRead {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(input_error)?;
    let headers = reader.headers().map_err(input_error)?.clone();
    let schema = TableSchema::new(
        headers
            .iter()
            .map(|name| ColumnSpec::new(name, ColumnType::String))
            .collect(),
    );

    let mut table = Table::new(schema);
    for record in reader.records() {
        let record = record.map_err(input_error)?;
        let cells: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Missing
                } else {
                    Cell::String(field.to_string())
                }
            })
            .collect();
        table.push(Row::new(cells))?;
    }
    Ok(table)
}
