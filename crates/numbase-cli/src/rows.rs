//! Row files: CSV and newline-delimited JSON in, the same format out.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use rhi_numbase_core::{ExecuteError, Row, RowSink, Value};
use std::io::{BufRead, Read, Write};

/// On-disk row format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RowFormat {
    Csv,
    Ndjson,
}

impl RowFormat {
    /// Detect the format from a file extension.
    pub fn detect(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?;
        match ext.to_lowercase().as_str() {
            "csv" => Some(RowFormat::Csv),
            "ndjson" | "jsonl" => Some(RowFormat::Ndjson),
            _ => None,
        }
    }
}

/// Rows read from a file, with their columns in order of first appearance.
#[derive(Debug, Default)]
pub struct RowTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Read every row of `reader`.
pub fn read_rows(reader: impl Read, format: RowFormat) -> Result<RowTable> {
    match format {
        RowFormat::Csv => read_csv(reader),
        RowFormat::Ndjson => read_ndjson(reader),
    }
}

fn read_csv(reader: impl Read) -> Result<RowTable> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: Vec<String> = csv
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in csv.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        // Short records leave trailing columns absent; long ones have nowhere to go.
        if record.len() > columns.len() {
            bail!(
                "CSV record {} has {} fields but the header has {}",
                idx + 1,
                record.len(),
                columns.len()
            );
        }
        let row: Row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, field)| (column.clone(), Value::String(field.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(RowTable { columns, rows })
}

fn read_ndjson(reader: impl Read) -> Result<RowTable> {
    let mut table = RowTable::default();
    let reader = std::io::BufReader::new(reader);

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read NDJSON input")?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Row = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON object on line {}", idx + 1))?;
        for column in row.keys() {
            if !table.has_column(column) {
                table.columns.push(column.clone());
            }
        }
        table.rows.push(row);
    }

    Ok(table)
}

/// Writes processed rows in the input's format.
///
/// CSV output keeps the input columns and appends the output column when it
/// is new.
pub enum RowWriter<W: Write> {
    Csv {
        writer: csv::Writer<W>,
        columns: Vec<String>,
    },
    Ndjson(W),
}

impl<W: Write> RowWriter<W> {
    pub fn new(out: W, format: RowFormat, input_columns: &[String], output_column: &str) -> Result<Self> {
        match format {
            RowFormat::Csv => {
                let mut columns = input_columns.to_vec();
                if !columns.iter().any(|c| c == output_column) {
                    columns.push(output_column.to_string());
                }
                let mut writer = csv::Writer::from_writer(out);
                writer
                    .write_record(&columns)
                    .context("Failed to write CSV header")?;
                Ok(RowWriter::Csv { writer, columns })
            }
            RowFormat::Ndjson => Ok(RowWriter::Ndjson(out)),
        }
    }
}

fn field_text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_text)
        .map(|s| s.into_owned())
        .unwrap_or_default()
}

impl<W: Write> RowSink for RowWriter<W> {
    fn emit_row(&mut self, row: Row) -> Result<(), ExecuteError> {
        match self {
            RowWriter::Csv { writer, columns } => {
                let record: Vec<String> = columns.iter().map(|c| field_text(row.get(c))).collect();
                writer
                    .write_record(&record)
                    .map_err(|e| ExecuteError::Sink(e.to_string()))
            }
            RowWriter::Ndjson(out) => {
                serde_json::to_writer(&mut *out, &row)
                    .map_err(|e| ExecuteError::Sink(e.to_string()))?;
                out.write_all(b"\n")
                    .map_err(|e| ExecuteError::Sink(e.to_string()))
            }
        }
    }

    fn last_row_emitted(&mut self) -> Result<(), ExecuteError> {
        let flushed = match self {
            RowWriter::Csv { writer, .. } => writer.flush(),
            RowWriter::Ndjson(out) => out.flush(),
        };
        flushed.map_err(|e| ExecuteError::Sink(e.to_string()))
    }
}
