use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use engine::error::SinkError;
use engine::sink::RowSink;
use model::table::{Cell, Row, TableSchema};
use serde_json::{Map, Value as JsonValue};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma separated values with a header row; missing cells are empty.
    Csv,
    /// One JSON object per line, keyed by column name.
    Json,
}

pub fn open_sink(format: OutputFormat, output: Option<&Path>) -> Result<FormattedSink, CliError> {
    let writer: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(File::create(path).map_err(|source| CliError::OutputFile {
            path: path.display().to_string(),
            source,
        })?),
        None => Box::new(io::stdout()),
    };
    Ok(FormattedSink::new(format, writer))
}

/// Streams rows to a file or stdout in the selected format. Rows are written
/// as they arrive, so a partial run still leaves everything fetched so far
/// on disk.
pub struct FormattedSink {
    format: OutputFormat,
    state: SinkState,
}

enum SinkState {
    Pending(Option<Box<dyn Write + Send>>),
    Csv(csv::Writer<Box<dyn Write + Send>>),
    Json {
        out: Box<dyn Write + Send>,
        columns: Vec<String>,
    },
    Closed,
}

impl FormattedSink {
    fn new(format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            state: SinkState::Pending(Some(writer)),
        }
    }
}

impl RowSink for FormattedSink {
    fn open(&mut self, schema: &TableSchema) -> Result<(), SinkError> {
        let SinkState::Pending(writer) = &mut self.state else {
            return Err(SinkError::NotOpen);
        };
        let Some(writer) = writer.take() else {
            return Err(SinkError::NotOpen);
        };

        self.state = match self.format {
            OutputFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                let header: Vec<&str> = schema
                    .columns()
                    .iter()
                    .map(|col| col.name.as_str())
                    .collect();
                csv_writer.write_record(&header).map_err(boxed)?;
                SinkState::Csv(csv_writer)
            }
            OutputFormat::Json => SinkState::Json {
                out: writer,
                columns: schema.columns().iter().map(|col| col.name.clone()).collect(),
            },
        };
        Ok(())
    }

    fn add_row(&mut self, row: Row) -> Result<(), SinkError> {
        match &mut self.state {
            SinkState::Csv(writer) => {
                let record: Vec<String> = row
                    .cells()
                    .iter()
                    .map(|cell| match cell {
                        Cell::Missing => String::new(),
                        other => other.to_string(),
                    })
                    .collect();
                writer.write_record(&record).map_err(boxed)
            }
            SinkState::Json { out, columns } => {
                let mut object = Map::new();
                for (name, cell) in columns.iter().zip(row.cells()) {
                    object.insert(name.clone(), cell.to_json());
                }
                writeln!(out, "{}", JsonValue::Object(object)).map_err(boxed)
            }
            _ => Err(SinkError::NotOpen),
        }
    }

    fn close(&mut self) -> Result<(), SinkError> {
        match std::mem::replace(&mut self.state, SinkState::Closed) {
            SinkState::Csv(mut writer) => writer.flush().map_err(boxed),
            SinkState::Json { mut out, .. } => out.flush().map_err(boxed),
            _ => Ok(()),
        }
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(err: E) -> SinkError {
    SinkError::Write(Box::new(err))
}
