use chrono::Utc;
use model::table::{Row, Table, TableSchema};
use platform::dto::{NewAlarmDto, SourceRef};
use tracing::{info, warn};

use crate::context::FetchContext;
use crate::error::{WriteError, WriteRowError, root_cause};
use crate::writers::{ColumnBinding, CreateApi, PROGRESS_INTERVAL, WriteReport, finalize};

const SEVERITIES: [&str; 4] = ["CRITICAL", "MAJOR", "MINOR", "WARNING"];
const STATUSES: [&str; 3] = ["ACTIVE", "ACKNOWLEDGED", "CLEARED"];
const DEFAULT_SEVERITY: &str = "WARNING";
const DEFAULT_STATUS: &str = "ACTIVE";

struct AlarmColumns {
    kind: ColumnBinding,
    severity: ColumnBinding,
    status: ColumnBinding,
    source_name: ColumnBinding,
    source_id: ColumnBinding,
    text: ColumnBinding,
    time: ColumnBinding,
}

impl AlarmColumns {
    fn bind(schema: &TableSchema) -> Result<Self, WriteError> {
        Ok(Self {
            kind: ColumnBinding::required(schema, "Alarm Type")?,
            severity: ColumnBinding::optional(schema, "Severity"),
            status: ColumnBinding::optional(schema, "Status"),
            source_name: ColumnBinding::optional(schema, "Source Name"),
            source_id: ColumnBinding::required(schema, "Source ID")?,
            text: ColumnBinding::optional(schema, "Description"),
            time: ColumnBinding::optional(schema, "Time"),
        })
    }
}

pub struct AlarmWriter<'a, C: CreateApi> {
    api: &'a C,
}

impl<'a, C: CreateApi> AlarmWriter<'a, C> {
    pub fn new(api: &'a C) -> Self {
        Self { api }
    }

    pub async fn write(&self, table: &Table, ctx: &FetchContext) -> Result<WriteReport, WriteError> {
        let columns = AlarmColumns::bind(table.schema())?;
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
                        info!("Wrote {} alarms to Cumulocity.", report.created);
                    }
                }
                Err(err) => {
                    warn!(row = row_ix, "Failed to write alarm to Cumulocity!");
                    warn!("Root cause: {}", root_cause(&err));
                    warn!("Will continue with other alarms...");
                    last_failure = Some(err);
                }
            }
        }

        finalize(report, last_failure, "alarms")
    }

    async fn write_row(&self, columns: &AlarmColumns, row: &Row) -> Result<(), WriteRowError> {
        let severity = match columns.severity.string(row) {
            Some(raw) => best_matching(raw.trim(), &SEVERITIES),
            None => DEFAULT_SEVERITY.to_string(),
        };
        let status = match columns.status.string(row) {
            Some(raw) => best_matching(raw.trim(), &STATUSES),
            None => DEFAULT_STATUS.to_string(),
        };

        let alarm = NewAlarmDto {
            kind: columns.kind.required_string(row)?,
            severity,
            status,
            time: columns.time.timestamp_or(row, Utc::now())?,
            text: columns.text.string(row),
            source: SourceRef {
                id: Some(columns.source_id.required_string(row)?),
                name: columns.source_name.string(row),
            },
        };
        self.api.create_alarm(&alarm).await?;
        Ok(())
    }
}

/// Maps free-form input onto one of the platform's enum values: the first
/// option contained in the uppercased input wins. Unmatched input is passed
/// through untouched and left for the platform to reject.
fn best_matching(raw: &str, options: &[&str]) -> String {
    let upper = raw.to_uppercase();
    options
        .iter()
        .copied()
        .find(|option| upper.contains(option))
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}
