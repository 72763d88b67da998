//! One module per collection kind. Each exposes the [`ReaderProfile`] the
//! fetch engine runs with and an [`ItemPages`] adapter over the platform
//! client.
//!
//! [`ReaderProfile`]: crate::profile::ReaderProfile
//! [`ItemPages`]: crate::source::ItemPages

pub mod alarms;
pub mod devices;
pub mod events;
pub mod measurements;

use chrono::{DateTime, Utc};
use model::table::Cell;
use platform::dto::SourceRef;

fn text_cell(value: &Option<String>) -> Cell {
    match value {
        Some(text) => Cell::String(text.clone()),
        None => Cell::Missing,
    }
}

fn time_cell(value: &Option<DateTime<Utc>>) -> Cell {
    match value {
        Some(ts) => Cell::Timestamp(*ts),
        None => Cell::Missing,
    }
}

fn int_cell(value: &Option<i64>) -> Cell {
    match value {
        Some(n) => Cell::Int(*n),
        None => Cell::Missing,
    }
}

/// Name and id cells of an item's source reference. Absent pieces become
/// missing cells; values never leak over from a previous item.
fn source_cells(source: &Option<SourceRef>) -> (Cell, Cell) {
    match source {
        Some(source) => (text_cell(&source.name), text_cell(&source.id)),
        None => (Cell::Missing, Cell::Missing),
    }
}

fn item_label(id: &Option<String>) -> String {
    id.clone().unwrap_or_else(|| "?".to_string())
}
