use serde::{Deserialize, Serialize};

/// Outcome of one fetch run. A populated `failure` marks a partial result:
/// everything emitted before the failure is valid, later sources were not
/// attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub rows_emitted: u64,
    pub items_ignored: u64,
    pub sources_visited: u64,
    pub failure: Option<String>,
}

impl FetchReport {
    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }
}
