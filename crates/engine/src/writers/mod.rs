//! Write-back paths: push rows of an input table to the platform as new
//! events, alarms or measurements. A failing row is logged and skipped so
//! one bad row cannot sink a whole batch; only a batch with zero successes
//! is an error.

pub mod alarms;
pub mod events;
pub mod measurements;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::table::{Cell, Row, TableSchema};
use platform::client::CotClient;
use platform::dto::{NewAlarmDto, NewEventDto, NewMeasurementDto};
use platform::error::PlatformError;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{WriteError, WriteRowError, root_cause};

pub use alarms::AlarmWriter;
pub use events::EventWriter;
pub use measurements::MeasurementWriter;

/// Progress is logged every this many created items.
pub const PROGRESS_INTERVAL: u64 = 100;

/// The create endpoints a writer needs. Split out from the concrete client
/// so writers can be driven against a scripted implementation.
#[async_trait]
pub trait CreateApi: Send + Sync {
    async fn create_event(&self, event: &NewEventDto) -> Result<(), PlatformError>;

    async fn create_alarm(&self, alarm: &NewAlarmDto) -> Result<(), PlatformError>;

    async fn create_measurement(
        &self,
        measurement: &NewMeasurementDto,
    ) -> Result<(), PlatformError>;
}

#[async_trait]
impl CreateApi for CotClient {
    async fn create_event(&self, event: &NewEventDto) -> Result<(), PlatformError> {
        CotClient::create_event(self, event).await
    }

    async fn create_alarm(&self, alarm: &NewAlarmDto) -> Result<(), PlatformError> {
        CotClient::create_alarm(self, alarm).await
    }

    async fn create_measurement(
        &self,
        measurement: &NewMeasurementDto,
    ) -> Result<(), PlatformError> {
        CotClient::create_measurement(self, measurement).await
    }
}

/// Outcome of one write batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub attempted: u64,
    pub created: u64,
    pub failure: Option<String>,
}

impl WriteReport {
    pub fn failed(&self) -> u64 {
        self.attempted - self.created
    }

    pub fn all_created(&self) -> bool {
        self.failure.is_none()
    }
}

/// Turns the loop counters into the final report. All rows failing is an
/// error, a mix is a partial report, everything else is a clean success.
pub(crate) fn finalize(
    mut report: WriteReport,
    last_failure: Option<WriteRowError>,
    entity_plural: &'static str,
) -> Result<WriteReport, WriteError> {
    match last_failure {
        None => {
            info!(
                "Wrote all {} {} to Cumulocity.",
                report.created, entity_plural
            );
            Ok(report)
        }
        Some(err) if report.created == 0 => {
            error!("Failed to write any {} to Cumulocity!", entity_plural);
            error!("Please ensure that you have write permissions for the tenant!");
            Err(WriteError::AllFailed {
                entity: entity_plural,
                attempted: report.attempted,
                source: Box::new(err),
            })
        }
        Some(err) => {
            warn!(
                "Wrote only {} of {} {} to Cumulocity.",
                report.created, report.attempted, entity_plural
            );
            warn!("Please ensure that the devices for the given source ids exist!");
            report.failure = Some(root_cause(&err));
            Ok(report)
        }
    }
}

static MISSING: Cell = Cell::Missing;

/// Resolves one logical column against the input schema once, then serves
/// typed values per row.
pub(crate) struct ColumnBinding {
    name: &'static str,
    index: Option<usize>,
}

impl ColumnBinding {
    pub fn required(schema: &TableSchema, name: &'static str) -> Result<Self, WriteError> {
        match schema.column_index(name) {
            Some(index) => Ok(Self {
                name,
                index: Some(index),
            }),
            None => Err(WriteError::MissingColumn(name)),
        }
    }

    pub fn optional(schema: &TableSchema, name: &'static str) -> Self {
        Self {
            name,
            index: schema.column_index(name),
        }
    }

    fn cell<'r>(&self, row: &'r Row) -> &'r Cell {
        self.index.and_then(|ix| row.cell(ix)).unwrap_or(&MISSING)
    }

    pub fn string(&self, row: &Row) -> Option<String> {
        match self.cell(row) {
            Cell::Missing => None,
            cell => Some(cell.to_string()),
        }
    }

    pub fn required_string(&self, row: &Row) -> Result<String, WriteRowError> {
        self.string(row)
            .ok_or(WriteRowError::MissingValue { column: self.name })
    }

    pub fn float(&self, row: &Row) -> Result<f64, WriteRowError> {
        let cell = self.cell(row);
        if cell.is_missing() {
            return Err(WriteRowError::MissingValue { column: self.name });
        }
        cell.as_f64().ok_or_else(|| WriteRowError::NotANumber {
            column: self.name,
            value: cell.to_string(),
        })
    }

    /// Timestamp value with a fallback for absent cells.
    pub fn timestamp_or(
        &self,
        row: &Row,
        fallback: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, WriteRowError> {
        let cell = self.cell(row);
        if cell.is_missing() {
            return Ok(fallback);
        }
        cell.as_timestamp()
            .ok_or_else(|| WriteRowError::NotATimestamp {
                column: self.name,
                value: cell.to_string(),
            })
    }
}
