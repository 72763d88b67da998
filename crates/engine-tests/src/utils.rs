#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use engine::context::FetchContext;
use engine::error::FetchError;
use engine::fetch::{BoundedFetcher, FetchRequest};
use engine::profile::ReaderProfile;
use engine::sink::TableSink;
use engine::source::ItemPages;
use engine::writers::CreateApi;
use model::fetch::FetchReport;
use model::table::{Cell, ColumnSpec, ColumnType, Row, Table, TableSchema};
use platform::dto::{
    AlarmDto, EventDto, ManagedObjectDto, MeasurementDto, NewAlarmDto, NewEventDto,
    NewMeasurementDto,
};
use platform::error::PlatformError;
use platform::filter::QueryFilter;
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Script key for pages served to the unfiltered pass.
pub const ANY_SOURCE: &str = "*";

/// One collection request as the scripted collection saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub source: Option<String>,
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub page_size: u32,
    pub current_page: u32,
}

/// Scripted stand-in for one platform collection: per-source queues of page
/// results plus a record of every request the engine made. Requests with no
/// scripted page left are answered with an empty page.
pub struct ScriptedCollection<T> {
    script: Mutex<HashMap<String, VecDeque<Result<Vec<T>, PlatformError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl<T> ScriptedCollection<T> {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    /// Appends one page result to the queue of `source` (use [`ANY_SOURCE`]
    /// for the unfiltered pass). Pages are served in scripted order.
    pub fn with_page(self, source: &str, result: Result<Vec<T>, PlatformError>) -> Self {
        self.script
            .lock()
            .unwrap()
            .entry(source.to_string())
            .or_default()
            .push_back(result);
        self
    }

    /// Cancels `token` once the given number of requests was served. The page
    /// of the triggering request is still returned, mimicking a shutdown that
    /// lands while a response is in flight.
    pub fn cancelling_after(mut self, requests: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((requests, token));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The requested sources in call order, `None` for the unfiltered pass.
    pub fn queried_sources(&self) -> Vec<Option<String>> {
        self.calls().into_iter().map(|call| call.source).collect()
    }

    fn key(filter: &QueryFilter) -> String {
        filter
            .source()
            .device_id()
            .unwrap_or(ANY_SOURCE)
            .to_string()
    }
}

impl<T> Default for ScriptedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + Sync> ItemPages for ScriptedCollection<T> {
    type Item = T;

    async fn fetch_page(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<T>, PlatformError> {
        let served = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                source: filter.source().device_id().map(str::to_string),
                window: filter.window(),
                page_size,
                current_page,
            });
            calls.len()
        };
        if let Some((threshold, token)) = &self.cancel_after {
            if served >= *threshold {
                token.cancel();
            }
        }

        let mut script = self.script.lock().unwrap();
        match script.get_mut(&Self::key(filter)).and_then(|queue| queue.pop_front()) {
            Some(result) => result,
            None => Ok(Vec::new()),
        }
    }
}

/// Scripted create endpoint: captures every accepted payload and fails the
/// attempts whose zero-based index was scripted to fail.
#[derive(Default)]
pub struct ScriptedCreateApi {
    fail_on: Vec<u64>,
    attempts: Mutex<u64>,
    events: Mutex<Vec<NewEventDto>>,
    alarms: Mutex<Vec<NewAlarmDto>>,
    measurements: Mutex<Vec<NewMeasurementDto>>,
}

impl ScriptedCreateApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(attempts: &[u64]) -> Self {
        Self {
            fail_on: attempts.to_vec(),
            ..Self::default()
        }
    }

    pub fn created_events(&self) -> Vec<NewEventDto> {
        self.events.lock().unwrap().clone()
    }

    pub fn created_alarms(&self) -> Vec<NewAlarmDto> {
        self.alarms.lock().unwrap().clone()
    }

    pub fn created_measurements(&self) -> Vec<NewMeasurementDto> {
        self.measurements.lock().unwrap().clone()
    }

    fn next_attempt(&self) -> Result<(), PlatformError> {
        let mut attempts = self.attempts.lock().unwrap();
        let current = *attempts;
        *attempts += 1;
        if self.fail_on.contains(&current) {
            Err(remote_failure(422, "scripted create failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CreateApi for ScriptedCreateApi {
    async fn create_event(&self, event: &NewEventDto) -> Result<(), PlatformError> {
        self.next_attempt()?;
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn create_alarm(&self, alarm: &NewAlarmDto) -> Result<(), PlatformError> {
        self.next_attempt()?;
        self.alarms.lock().unwrap().push(alarm.clone());
        Ok(())
    }

    async fn create_measurement(
        &self,
        measurement: &NewMeasurementDto,
    ) -> Result<(), PlatformError> {
        self.next_attempt()?;
        self.measurements.lock().unwrap().push(measurement.clone());
        Ok(())
    }
}

/// A scripted remote failure, shaped like a real platform error response.
pub fn remote_failure(status: u16, body: &str) -> PlatformError {
    PlatformError::Api {
        status,
        body: body.to_string(),
    }
}

/// Runs one bounded fetch into a [`TableSink`] and hands back the report
/// alongside the collected table.
pub async fn run_fetch<T, P>(
    profile: ReaderProfile<T>,
    pages: &P,
    request: FetchRequest,
    ctx: &FetchContext,
) -> (Result<FetchReport, FetchError>, Option<Table>)
where
    T: Send + Sync,
    P: ItemPages<Item = T>,
{
    let fetcher = BoundedFetcher::new(profile);
    let mut sink = TableSink::new();
    let result = fetcher.run(pages, request, &mut sink, ctx).await;
    (result, sink.into_table())
}

/// Cell of `row` in the named column.
pub fn cell<'t>(table: &'t Table, row: usize, column: &str) -> &'t Cell {
    let ix = table
        .schema()
        .column_index(column)
        .expect("column must exist in the schema");
    &table.rows()[row].cells()[ix]
}

/// Builds an all-string input table, the shape csv input arrives in. Empty
/// strings become missing cells.
pub fn input_table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let schema = TableSchema::new(
        columns
            .iter()
            .map(|name| ColumnSpec::new(*name, ColumnType::String))
            .collect(),
    );
    let mut table = Table::new(schema);
    for cells in rows {
        let row = Row::new(
            cells
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        Cell::Missing
                    } else {
                        Cell::String((*value).to_string())
                    }
                })
                .collect(),
        );
        table.push(row).expect("row width must match the schema");
    }
    table
}

/// Managed object payload as the inventory collection returns it.
pub fn device(id: &str, name: &str) -> ManagedObjectDto {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "type": "c8y_Linux",
    }))
    .expect("device fixture must deserialize")
}

/// Alarm payload as the alarm collection returns it; `source` is
/// `(device id, device name)`.
pub fn alarm(id: &str, source: Option<(&str, &str)>) -> AlarmDto {
    let mut body = json!({
        "id": id,
        "type": "c8y_UnavailabilityAlarm",
        "severity": "MAJOR",
        "status": "ACTIVE",
        "text": "No data received",
        "count": 1,
        "time": "2024-03-01T06:00:00.000Z",
        "creationTime": "2024-03-01T06:00:01.000Z",
        "firstOccurrenceTime": "2024-03-01T05:00:00.000Z",
    });
    if let Some((source_id, name)) = source {
        body["source"] = json!({ "id": source_id, "name": name });
    }
    serde_json::from_value(body).expect("alarm fixture must deserialize")
}

/// Alarm carrying nothing but an id, as barely populated items arrive.
pub fn sparse_alarm(id: &str) -> AlarmDto {
    serde_json::from_value(json!({ "id": id })).expect("alarm fixture must deserialize")
}

pub fn event(id: &str, source_id: &str) -> EventDto {
    serde_json::from_value(json!({
        "id": id,
        "type": "c8y_LocationUpdate",
        "text": "Location changed",
        "time": "2024-03-01T12:00:00.000Z",
        "creationTime": "2024-03-01T12:00:01.000Z",
        "source": { "id": source_id, "name": format!("Device {source_id}") },
    }))
    .expect("event fixture must deserialize")
}

/// Measurement with one `(fragment, series, value, unit)` entry per element.
pub fn measurement(
    id: &str,
    source_id: &str,
    series: &[(&str, &str, f64, &str)],
) -> MeasurementDto {
    let mut body = json!({
        "id": id,
        "type": "c8y_DemoMeasurement",
        "time": "2024-03-01T12:00:00.000Z",
        "source": { "id": source_id },
    });
    for &(fragment, series_name, value, unit) in series {
        body[fragment][series_name] = json!({ "value": value, "unit": unit });
    }
    serde_json::from_value(body).expect("measurement fixture must deserialize")
}

/// Measurement whose payload carries no series at all, only scalar noise.
pub fn empty_measurement(id: &str, source_id: &str) -> MeasurementDto {
    serde_json::from_value(json!({
        "id": id,
        "type": "c8y_DemoMeasurement",
        "time": "2024-03-01T12:00:00.000Z",
        "source": { "id": source_id },
        "self": format!("https://demo.cumulocity.com/measurement/measurements/{id}"),
    }))
    .expect("measurement fixture must deserialize")
}
