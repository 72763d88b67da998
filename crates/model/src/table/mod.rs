pub mod cell;
pub mod column;
pub mod row;
pub mod schema;

pub use cell::Cell;
pub use column::{ColumnSpec, ColumnType};
pub use row::Row;
pub use schema::{SchemaError, Table, TableSchema};
