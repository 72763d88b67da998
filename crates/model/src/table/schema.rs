use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::column::ColumnSpec;
use crate::table::row::Row;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Row width {actual} does not match schema width {expected}")]
    WidthMismatch { expected: usize, actual: usize },
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|col| col.name.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.column_index(name).map(|ix| &self.columns[ix])
    }
}

/// An in-memory table: a schema plus rows that all match its width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) -> Result<(), SchemaError> {
        if row.width() != self.schema.width() {
            return Err(SchemaError::WidthMismatch {
                expected: self.schema.width(),
                actual: row.width(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cell::Cell;
    use crate::table::column::ColumnType;

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnSpec::new("Device ID", ColumnType::String),
            ColumnSpec::new("Type", ColumnType::String),
        ])
    }

    #[test]
    fn column_lookup_ignores_case() {
        let schema = schema();
        assert_eq!(schema.column_index("device id"), Some(0));
        assert_eq!(schema.column_index("TYPE"), Some(1));
        assert_eq!(schema.column_index("Name"), None);
    }

    #[test]
    fn push_rejects_rows_of_wrong_width() {
        let mut table = Table::new(schema());
        let err = table
            .push(Row::new(vec![Cell::from("4711")]))
            .expect_err("narrow row must be rejected");
        assert_eq!(
            err,
            SchemaError::WidthMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert!(table.is_empty());

        table
            .push(Row::new(vec![Cell::from("4711"), Cell::Missing]))
            .expect("matching row");
        assert_eq!(table.len(), 1);
    }
}
