use async_trait::async_trait;
use model::table::{Cell, ColumnSpec, ColumnType, Row, TableSchema};
use platform::client::CotClient;
use platform::dto::MeasurementDto;
use platform::error::PlatformError;
use platform::filter::QueryFilter;
use serde_json::Value as JsonValue;

use crate::profile::ReaderProfile;
use crate::readers::{item_label, text_cell, time_cell};
use crate::source::ItemPages;

const PAGE_SIZE: u32 = 2000;

pub fn profile() -> ReaderProfile<MeasurementDto> {
    ReaderProfile {
        entity: "measurement",
        entity_plural: "measurements",
        page_size: PAGE_SIZE,
        // Tenant-wide measurement scans are far too large to be useful.
        source_required: true,
        schema,
        rows,
        label,
    }
}

fn schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnSpec::new("Measurement ID", ColumnType::String),
        ColumnSpec::new("Measurement Type", ColumnType::String),
        ColumnSpec::new("Device ID", ColumnType::String),
        ColumnSpec::new("Zoned Date Time", ColumnType::Timestamp),
        ColumnSpec::new("Measurement Subtype", ColumnType::String),
        ColumnSpec::new("Fragment Series", ColumnType::String),
        ColumnSpec::new("Value", ColumnType::Float),
        ColumnSpec::new("Unit", ColumnType::String),
    ])
}

/// One row per (fragment, series) pair. A measurement without any object
/// valued fragment produces no rows and is ignored by the engine.
fn rows(measurement: &MeasurementDto) -> Vec<Row> {
    let id = text_cell(&measurement.id);
    let kind = text_cell(&measurement.kind);
    let device = match measurement.source.as_ref().and_then(|s| s.id.clone()) {
        Some(device_id) => Cell::String(device_id),
        None => Cell::Missing,
    };
    let time = time_cell(&measurement.time);

    let mut out = Vec::new();
    for (fragment_name, fragment) in &measurement.fragments {
        let Some(series_map) = fragment.as_object() else {
            continue;
        };
        for (series_name, series) in series_map {
            let Some(series_obj) = series.as_object() else {
                continue;
            };
            let value = match series_obj.get("value").and_then(JsonValue::as_f64) {
                Some(number) => Cell::Float(number),
                None => Cell::Missing,
            };
            let unit = match series_obj.get("unit").and_then(JsonValue::as_str) {
                Some(unit) => Cell::from(unit),
                None => Cell::Missing,
            };
            out.push(Row::new(vec![
                id.clone(),
                kind.clone(),
                device.clone(),
                time.clone(),
                Cell::from(fragment_name.as_str()),
                Cell::from(series_name.as_str()),
                value,
                unit,
            ]));
        }
    }
    out
}

fn label(measurement: &MeasurementDto) -> String {
    item_label(&measurement.id)
}

pub struct MeasurementPages<'a> {
    client: &'a CotClient,
}

impl<'a> MeasurementPages<'a> {
    pub fn new(client: &'a CotClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemPages for MeasurementPages<'_> {
    type Item = MeasurementDto;

    async fn fetch_page(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<Self::Item>, PlatformError> {
        self.client
            .measurements(filter, page_size, current_page)
            .await
    }
}
