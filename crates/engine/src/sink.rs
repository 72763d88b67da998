use model::table::{Row, Table, TableSchema};

use crate::error::SinkError;

/// Receives the rows of one fetch run. `open` is called exactly once before
/// the first row, `close` exactly once at the end of the run, also when the
/// run fails or is cancelled.
pub trait RowSink {
    fn open(&mut self, schema: &TableSchema) -> Result<(), SinkError>;

    fn add_row(&mut self, row: Row) -> Result<(), SinkError>;

    fn close(&mut self) -> Result<(), SinkError>;
}

/// Sink that buffers all rows into an in-memory [`Table`].
#[derive(Debug, Default)]
pub struct TableSink {
    table: Option<Table>,
}

impl TableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_table(self) -> Option<Table> {
        self.table
    }
}

impl RowSink for TableSink {
    fn open(&mut self, schema: &TableSchema) -> Result<(), SinkError> {
        self.table = Some(Table::new(schema.clone()));
        Ok(())
    }

    fn add_row(&mut self, row: Row) -> Result<(), SinkError> {
        match self.table.as_mut() {
            Some(table) => {
                table.push(row)?;
                Ok(())
            }
            None => Err(SinkError::NotOpen),
        }
    }

    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
