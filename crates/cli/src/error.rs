use engine::error::{FetchError, WriteError};
use model::fetch::TimeRangeError;
use model::table::SchemaError;
use platform::error::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("No connection file given and no home directory to look in")]
    NoConfig,

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Time(#[from] TimeRangeError),

    #[error("Failed to read input file '{path}'")]
    InputRead {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed input row")]
    InputRow(#[from] SchemaError),

    #[error("Failed to create output file '{path}'")]
    OutputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// True when the run ended because the user asked it to stop.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            CliError::Fetch(FetchError::Cancelled) | CliError::Write(WriteError::Cancelled)
        )
    }
}
