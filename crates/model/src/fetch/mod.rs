pub mod budget;
pub mod filter;
pub mod report;
pub mod time;

pub use budget::RowBudget;
pub use filter::SourceFilter;
pub use report::FetchReport;
pub use time::{TimeRange, TimeRangeError};
