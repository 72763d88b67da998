use chrono::Utc;
use model::table::{Row, Table, TableSchema};
use platform::dto::{NewMeasurementDto, SourceRef};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::context::FetchContext;
use crate::error::{WriteError, WriteRowError, root_cause};
use crate::writers::{ColumnBinding, CreateApi, PROGRESS_INTERVAL, WriteReport, finalize};

const DEFAULT_SUBTYPE: &str = "unknown";
const DEFAULT_SERIES: &str = "unknown";

struct MeasurementColumns {
    kind: ColumnBinding,
    source_name: ColumnBinding,
    source_id: ColumnBinding,
    time: ColumnBinding,
    subtype: ColumnBinding,
    series: ColumnBinding,
    value: ColumnBinding,
    unit: ColumnBinding,
}

impl MeasurementColumns {
    fn bind(schema: &TableSchema) -> Result<Self, WriteError> {
        Ok(Self {
            kind: ColumnBinding::required(schema, "Measurement Type")?,
            source_name: ColumnBinding::optional(schema, "Source Name"),
            source_id: ColumnBinding::required(schema, "Source ID")?,
            time: ColumnBinding::optional(schema, "Time"),
            subtype: ColumnBinding::optional(schema, "Measurement Subtype"),
            series: ColumnBinding::optional(schema, "Fragment Series"),
            value: ColumnBinding::required(schema, "Value")?,
            unit: ColumnBinding::required(schema, "Unit")?,
        })
    }
}

pub struct MeasurementWriter<'a, C: CreateApi> {
    api: &'a C,
}

impl<'a, C: CreateApi> MeasurementWriter<'a, C> {
    pub fn new(api: &'a C) -> Self {
        Self { api }
    }

    pub async fn write(&self, table: &Table, ctx: &FetchContext) -> Result<WriteReport, WriteError> {
        let columns = MeasurementColumns::bind(table.schema())?;
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
                    debug!(row = row_ix, "Created measurement in Cumulocity.");
                    if report.created % PROGRESS_INTERVAL == 0 {
                        info!("Wrote {} measurements to Cumulocity.", report.created);
                    }
                }
                Err(err) => {
                    warn!(row = row_ix, "Failed to write measurement to Cumulocity!");
                    warn!("Root cause: {}", root_cause(&err));
                    warn!("Will continue with other measurements...");
                    last_failure = Some(err);
                }
            }
        }

        finalize(report, last_failure, "measurements")
    }

    async fn write_row(
        &self,
        columns: &MeasurementColumns,
        row: &Row,
    ) -> Result<(), WriteRowError> {
        let subtype = columns
            .subtype
            .string(row)
            .unwrap_or_else(|| DEFAULT_SUBTYPE.to_string());
        let series = columns
            .series
            .string(row)
            .unwrap_or_else(|| DEFAULT_SERIES.to_string());
        let value = columns.value.float(row)?;
        let unit = columns.unit.required_string(row)?;

        // Body shape: { "<subtype>": { "<series>": { "value": …, "unit": … } } }
        let series_body = serde_json::json!({ "value": value, "unit": unit });
        let mut fragment = Map::new();
        fragment.insert(series, series_body);
        let mut fragments = Map::new();
        fragments.insert(subtype, JsonValue::Object(fragment));

        let measurement = NewMeasurementDto {
            kind: columns.kind.required_string(row)?,
            time: columns.time.timestamp_or(row, Utc::now())?,
            source: SourceRef {
                id: Some(columns.source_id.required_string(row)?),
                name: columns.source_name.string(row),
            },
            fragments,
        };
        self.api.create_measurement(&measurement).await?;
        Ok(())
    }
}
