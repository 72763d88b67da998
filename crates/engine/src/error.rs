use model::table::SchemaError;
use platform::error::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("A source filter is required to fetch {0}")]
    SourceRequired(&'static str),

    #[error("Fetch was cancelled")]
    Cancelled,

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink was not opened before use")]
    NotOpen,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to write row to sink")]
    Write(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Input is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Write was cancelled")]
    Cancelled,

    #[error("Failed to write any of {attempted} {entity}")]
    AllFailed {
        entity: &'static str,
        attempted: u64,
        #[source]
        source: Box<WriteRowError>,
    },
}

/// Failure of a single write row. Callers log these and continue with the
/// remaining rows.
#[derive(Debug, Error)]
pub enum WriteRowError {
    #[error("required value '{column}' is missing")]
    MissingValue { column: &'static str },

    #[error("value '{value}' in column '{column}' is not a number")]
    NotANumber { column: &'static str, value: String },

    #[error("value '{value}' in column '{column}' is not a timestamp")]
    NotATimestamp { column: &'static str, value: String },

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Innermost message of an error chain, the one worth showing to users.
pub fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
