use async_trait::async_trait;
use model::table::{ColumnSpec, ColumnType, Row, TableSchema};
use platform::client::CotClient;
use platform::dto::ManagedObjectDto;
use platform::error::PlatformError;
use platform::filter::QueryFilter;

use crate::profile::ReaderProfile;
use crate::readers::{item_label, text_cell};
use crate::source::ItemPages;

const PAGE_SIZE: u32 = 1000;

pub fn profile() -> ReaderProfile<ManagedObjectDto> {
    ReaderProfile {
        entity: "device",
        entity_plural: "devices",
        page_size: PAGE_SIZE,
        source_required: false,
        schema,
        rows,
        label,
    }
}

fn schema() -> TableSchema {
    TableSchema::new(vec![
        ColumnSpec::new("Device ID", ColumnType::String),
        ColumnSpec::new("Type", ColumnType::String),
        ColumnSpec::new("Device Name", ColumnType::String),
    ])
}

fn rows(device: &ManagedObjectDto) -> Vec<Row> {
    vec![Row::new(vec![
        text_cell(&device.id),
        text_cell(&device.kind),
        text_cell(&device.name),
    ])]
}

fn label(device: &ManagedObjectDto) -> String {
    item_label(&device.id)
}

pub struct DevicePages<'a> {
    client: &'a CotClient,
}

impl<'a> DevicePages<'a> {
    pub fn new(client: &'a CotClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemPages for DevicePages<'_> {
    type Item = ManagedObjectDto;

    async fn fetch_page(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        current_page: u32,
    ) -> Result<Vec<Self::Item>, PlatformError> {
        self.client
            .managed_objects(filter, page_size, current_page)
            .await
    }
}
