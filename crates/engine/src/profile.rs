use model::table::{Row, TableSchema};

/// Everything the fetch engine needs to know about one collection kind.
/// The four reader modules each expose a profile; the engine itself never
/// special-cases a collection.
pub struct ReaderProfile<T> {
    /// Singular name used in logs, e.g. `"alarm"`.
    pub entity: &'static str,
    /// Plural name used in logs and errors, e.g. `"alarms"`.
    pub entity_plural: &'static str,
    pub page_size: u32,
    /// Collections that cannot be queried tenant-wide require at least one
    /// device in the selection.
    pub source_required: bool,
    pub schema: fn() -> TableSchema,
    /// Maps one item to its output rows. An empty result means the item
    /// carries no usable data and is counted as ignored.
    pub rows: fn(&T) -> Vec<Row>,
    /// Short identifier for log lines about a single item.
    pub label: fn(&T) -> String,
}
