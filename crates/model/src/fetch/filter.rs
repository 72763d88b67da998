use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope of a collection query. `Device` restricts the query to items whose
/// source is the given managed object id, `Unfiltered` queries the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFilter {
    Device(String),
    Unfiltered,
}

impl SourceFilter {
    pub fn device_id(&self) -> Option<&str> {
        match self {
            SourceFilter::Device(id) => Some(id.as_str()),
            SourceFilter::Unfiltered => None,
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        matches!(self, SourceFilter::Unfiltered)
    }
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFilter::Device(id) => write!(f, "{id}"),
            SourceFilter::Unfiltered => write!(f, "unfiltered"),
        }
    }
}
