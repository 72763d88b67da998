use chrono::Utc;
use model::table::{Row, Table, TableSchema};
use platform::dto::{NewEventDto, SourceRef};
use tracing::{info, warn};

use crate::context::FetchContext;
use crate::error::{WriteError, WriteRowError, root_cause};
use crate::writers::{ColumnBinding, CreateApi, PROGRESS_INTERVAL, WriteReport, finalize};

struct EventColumns {
    kind: ColumnBinding,
    source_name: ColumnBinding,
    source_id: ColumnBinding,
    text: ColumnBinding,
    time: ColumnBinding,
}

impl EventColumns {
    fn bind(schema: &TableSchema) -> Result<Self, WriteError> {
        Ok(Self {
            kind: ColumnBinding::required(schema, "Event Type")?,
            source_name: ColumnBinding::optional(schema, "Source Name"),
            source_id: ColumnBinding::required(schema, "Source ID")?,
            text: ColumnBinding::optional(schema, "Description"),
            time: ColumnBinding::optional(schema, "Time"),
        })
    }
}

pub struct EventWriter<'a, C: CreateApi> {
    api: &'a C,
}

impl<'a, C: CreateApi> EventWriter<'a, C> {
    pub fn new(api: &'a C) -> Self {
        Self { api }
    }

    pub async fn write(&self, table: &Table, ctx: &FetchContext) -> Result<WriteReport, WriteError> {
        let columns = EventColumns::bind(table.schema())?;
        let mut report = WriteReport::default();
        let mut last_failure: Option<WriteRowError> = None;

        for (row_ix, row) in table.rows().iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(WriteError::Cancelled);
            }
            report.attempted += 1;

            match self.write_row(&columns, row).await {
                Ok(()) => {
                    report.created += 1;
                    ctx.metrics().record_created();
                    if report.created % PROGRESS_INTERVAL == 0 {
                        info!("Wrote {} events to Cumulocity.", report.created);
                    }
                }
                Err(err) => {
                    warn!(row = row_ix, "Failed to write event to Cumulocity!");
                    warn!("Root cause: {}", root_cause(&err));
                    warn!("Will continue with other events...");
                    last_failure = Some(err);
                }
            }
        }

        finalize(report, last_failure, "events")
    }

    async fn write_row(&self, columns: &EventColumns, row: &Row) -> Result<(), WriteRowError> {
        let event = NewEventDto {
            kind: columns.kind.required_string(row)?,
            time: columns.time.timestamp_or(row, Utc::now())?,
            text: columns.text.string(row),
            source: SourceRef {
                id: Some(columns.source_id.required_string(row)?),
                name: columns.source_name.string(row),
            },
        };
        self.api.create_event(&event).await?;
        Ok(())
    }
}
