use async_trait::async_trait;
use model::table::{ColumnSpec, ColumnType, Row, TableSchema};
use platform::client::CotClient;
use platform::dto::AlarmDto;
use platform::error::PlatformError;
use platform::filter::QueryFilter;

use crate::profile::ReaderProfile;
use crate::readers::{int_cell, item_label, source_cells, text_cell, time_cell};
use crate::source::ItemPages;

const PAGE_SIZE: u32 = 100;

pub fn profile() -> ReaderProfile<AlarmDto> {
    ReaderProfile {
        entity: "alarm",
        entity_plural: "alarms",
        page_size: PAGE_SIZE,
        source_required: false,
        schema,
        rows,
        label,
    }
}

fn schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnSpec::new("Alarm ID", ColumnType::String),
        ColumnSpec::new("Alarm Type", ColumnType::String),
        ColumnSpec::new("Severity", ColumnType::String),
        ColumnSpec::new("Creation Time", ColumnType::Timestamp),
        ColumnSpec::new("Count", ColumnType::Int),
        ColumnSpec::new("Source Name", ColumnType::String),
        ColumnSpec::new("Source ID", ColumnType::String),
        ColumnSpec::new("Description", ColumnType::String),
        ColumnSpec::new("Status", ColumnType::String),
        ColumnSpec::new("Time", ColumnType::Timestamp),
        ColumnSpec::new("First Occurrence Time", ColumnType::Timestamp),
    ])
}

fn rows(alarm: &AlarmDto) -> Vec<Row> {
    let (source_name, source_id) = source_cells(&alarm.source);
    vec![Row::new(vec![
        text_cell(&alarm.id),
        text_cell(&alarm.kind),
        text_cell(&alarm.severity),
        time_cell(&alarm.creation_time),
        int_cell(&alarm.count),
        source_name,
        source_id,
        text_cell(&alarm.text),
        text_cell(&alarm.status),
        time_cell(&alarm.time),
        time_cell(&alarm.first_occurrence_time),
    ])]
}

fn label(alarm: &AlarmDto) -> String {
    item_label(&alarm.id)
}

pub struct AlarmPages<'a> {
    client: &'a CotClient,
}

impl<'a> AlarmPages<'a> {
    pub fn new(client: &'a CotClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemPages for AlarmPages<'_> {
    type Item = AlarmDto;

    async fn fetch_page(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<Self::Item>, PlatformError> {
        self.client.alarms(filter, page_size, current_page).await
    }
}
