use chrono::{DateTime, SecondsFormat, Utc};
use model::fetch::SourceFilter;

/// Query scope for one collection request: an optional source restriction
/// plus an already resolved time window. Parameter order is fixed so request
/// urls are reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    source: SourceFilter,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl QueryFilter {
    pub fn new(source: SourceFilter, window: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Self {
        Self { source, window }
    }

    pub fn unfiltered() -> Self {
        Self::new(SourceFilter::Unfiltered, None)
    }

    pub fn source(&self) -> &SourceFilter {
        &self.source
    }

    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.window
    }

    pub fn params(&self, page_size: u32, current_page: u32) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(id) = self.source.device_id() {
            params.push(("source".to_string(), id.to_string()));
        }
        if let Some((from, to)) = self.window {
            params.push(("dateFrom".to_string(), format_timestamp(from)));
            params.push(("dateTo".to_string(), format_timestamp(to)));
        }
        params.push(("pageSize".to_string(), page_size.to_string()));
        params.push(("currentPage".to_string(), current_page.to_string()));
        params
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
