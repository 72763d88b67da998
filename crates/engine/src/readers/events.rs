use async_trait::async_trait;
use model::table::{ColumnSpec, ColumnType, Row, TableSchema};
use platform::client::CotClient;
use platform::dto::EventDto;
use platform::error::PlatformError;
use platform::filter::QueryFilter;

use crate::profile::ReaderProfile;
use crate::readers::{item_label, source_cells, text_cell, time_cell};
use crate::source::ItemPages;

const PAGE_SIZE: u32 = 100;

pub fn profile() -> ReaderProfile<EventDto> {
    ReaderProfile {
        entity: "event",
        entity_plural: "events",
        page_size: PAGE_SIZE,
        source_required: false,
        schema,
        rows,
        label,
    }
}

fn schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnSpec::new("Event ID", ColumnType::String),
        ColumnSpec::new("Event Type", ColumnType::String),
        ColumnSpec::new("Creation Time", ColumnType::Timestamp),
        ColumnSpec::new("Source Name", ColumnType::String),
        ColumnSpec::new("Source ID", ColumnType::String),
        ColumnSpec::new("Time", ColumnType::Timestamp),
        ColumnSpec::new("Description", ColumnType::String),
    ])
}

fn rows(event: &EventDto) -> Vec<Row> {
    let (source_name, source_id) = source_cells(&event.source);
    vec![Row::new(vec![
        text_cell(&event.id),
        text_cell(&event.kind),
        time_cell(&event.creation_time),
        source_name,
        source_id,
        time_cell(&event.time),
        text_cell(&event.text),
    ])]
}

fn label(event: &EventDto) -> String {
    item_label(&event.id)
}

pub struct EventPages<'a> {
    client: &'a CotClient,
}

impl<'a> EventPages<'a> {
    pub fn new(client: &'a CotClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemPages for EventPages<'_> {
    type Item = EventDto;

    async fn fetch_page(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<Self::Item>, PlatformError> {
        self.client.events(filter, page_size, current_page).await
    }
}
