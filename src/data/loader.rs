use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use clap::ValueEnum;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    required_columns, CategoryColumn, NumericColumn, StudentDataset, StudentRecord,
};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Input file format. Detected from the extension unless given explicitly.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// JSON array of records
    Json,
    /// Parquet columnar format
    Parquet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Overrides extension-based detection.
    pub format: Option<FileFormat>,
    /// Field delimiter for delimited text; defaults to `,` (tab for TSV).
    pub delimiter: Option<u8>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a student dataset, dispatching on the file extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row naming every required column
/// * `.json`         – `[{ "Attendance": 84, "Gender": "Male", ... }, ...]`
/// * `.parquet`      – one column per field, numeric or string typed
pub fn load_file(path: &Path) -> Result<StudentDataset, DataLoadError> {
    load_file_with(path, &LoadOptions::default())
}

pub fn load_file_with(path: &Path, options: &LoadOptions) -> Result<StudentDataset, DataLoadError> {
    let format = match options.format.or_else(|| FileFormat::from_path(path)) {
        Some(f) => f,
        None => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            return Err(DataLoadError::UnsupportedFormat(ext));
        }
    };

    let records = match format {
        FileFormat::Csv => load_delimited(path, options.delimiter.unwrap_or(b',')),
        FileFormat::Tsv => load_delimited(path, options.delimiter.unwrap_or(b'\t')),
        FileFormat::Json => load_json(path),
        FileFormat::Parquet => load_parquet(path),
    }?;

    Ok(StudentDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Raw cell access for one row, keyed by column header.
trait RowSource {
    /// Numeric cell, or the offending text when it does not parse.
    fn numeric(&self, column: &str) -> Result<f64, String>;
    fn text(&self, column: &str) -> Result<String, String>;
}

fn build_record(path: &Path, row: usize, src: &impl RowSource) -> Result<StudentRecord, DataLoadError> {
    let num = |col: NumericColumn| {
        src.numeric(col.name())
            .map_err(|value| invalid(path, row, col.name(), value))
    };
    let text = |col: CategoryColumn| {
        src.text(col.name())
            .map_err(|value| invalid(path, row, col.name(), value))
    };

    Ok(StudentRecord {
        attendance: num(NumericColumn::Attendance)?,
        hours_studied: num(NumericColumn::HoursStudied)?,
        exam_score: num(NumericColumn::ExamScore)?,
        sleep_hours: num(NumericColumn::SleepHours)?,
        previous_scores: num(NumericColumn::PreviousScores)?,
        tutoring_sessions: num(NumericColumn::TutoringSessions)?,
        physical_activity: num(NumericColumn::PhysicalActivity)?,
        teacher_quality: text(CategoryColumn::TeacherQuality)?,
        parental_education_level: text(CategoryColumn::ParentalEducationLevel)?,
        school_type: text(CategoryColumn::SchoolType)?,
        gender: text(CategoryColumn::Gender)?,
        distance_from_home: text(CategoryColumn::DistanceFromHome)?,
    })
}

fn invalid(path: &Path, row: usize, column: &str, value: String) -> DataLoadError {
    DataLoadError::InvalidValue {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        value,
    }
}

/// Fail with the first required column absent from `present`.
fn check_columns(path: &Path, present: impl Fn(&str) -> bool) -> Result<(), DataLoadError> {
    match required_columns().find(|c| !present(*c)) {
        Some(column) => Err(DataLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn io_error(path: &Path, source: std::io::Error) -> DataLoadError {
    DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, err: anyhow::Error) -> DataLoadError {
    DataLoadError::Malformed {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

struct CsvRow<'a> {
    index: &'a BTreeMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl CsvRow<'_> {
    fn cell(&self, column: &str) -> &str {
        self.index
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }
}

impl RowSource for CsvRow<'_> {
    fn numeric(&self, column: &str) -> Result<f64, String> {
        let cell = self.cell(column);
        parse_finite(cell).ok_or_else(|| cell.to_string())
    }

    fn text(&self, column: &str) -> Result<String, String> {
        Ok(self.cell(column).trim().to_string())
    }
}

/// Header row required; extra columns are ignored, order is irrelevant.
/// Rows are numbered from 1 (the first line after the header).
fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<StudentRecord>, DataLoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let index: BTreeMap<String, usize> = reader
        .headers()
        .context("reading header row")
        .map_err(|e| malformed(path, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();

    check_columns(path, |c| index.contains_key(c))?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result
            .with_context(|| format!("row {row}"))
            .map_err(|e| malformed(path, e))?;
        let src = CsvRow {
            index: &index,
            record: &record,
        };
        records.push(build_record(path, row, &src)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

struct JsonRow<'a>(&'a serde_json::Map<String, JsonValue>);

impl RowSource for JsonRow<'_> {
    fn numeric(&self, column: &str) -> Result<f64, String> {
        match self.0.get(column) {
            Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| n.to_string()),
            Some(JsonValue::String(s)) => parse_finite(s).ok_or_else(|| s.clone()),
            Some(other) => Err(other.to_string()),
            None => Err(String::new()),
        }
    }

    fn text(&self, column: &str) -> Result<String, String> {
        match self.0.get(column) {
            Some(JsonValue::String(s)) => Ok(s.trim().to_string()),
            Some(JsonValue::Number(n)) => Ok(n.to_string()),
            Some(JsonValue::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(other.to_string()),
            None => Err(String::new()),
        }
    }
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Attendance": 84, "Hours_Studied": 23, "Gender": "Male", ... },
///   ...
/// ]
/// ```
///
/// Every object must carry every required key; an empty array is rejected
/// the way a header without columns would be.
fn load_json(path: &Path) -> Result<Vec<StudentRecord>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .context("parsing JSON")
        .map_err(|e| malformed(path, e))?;

    let rows = root
        .as_array()
        .context("expected top-level JSON array")
        .map_err(|e| malformed(path, e))?;
    // No header to inspect: an empty array carries none of the required keys.
    if rows.is_empty() {
        check_columns(path, |_| false)?;
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .with_context(|| format!("row {row} is not a JSON object"))
            .map_err(|e| malformed(path, e))?;
        check_columns(path, |c| obj.contains_key(c))?;
        records.push(build_record(path, row, &JsonRow(obj))?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// One row of a record batch whose required columns were cast up front:
/// numeric columns to Float64, categorical ones to Utf8.
struct BatchRow<'a> {
    columns: &'a BTreeMap<&'static str, Arc<dyn Array>>,
    row: usize,
}

impl RowSource for BatchRow<'_> {
    fn numeric(&self, column: &str) -> Result<f64, String> {
        let Some(arr) = self.columns.get(column) else {
            return Err(String::new());
        };
        if arr.is_null(self.row) {
            return Err("null".to_string());
        }
        let v = arr.as_primitive::<Float64Type>().value(self.row);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(v.to_string())
        }
    }

    fn text(&self, column: &str) -> Result<String, String> {
        let Some(arr) = self.columns.get(column) else {
            return Err(String::new());
        };
        if arr.is_null(self.row) {
            return Err("null".to_string());
        }
        Ok(arr.as_string::<i32>().value(self.row).trim().to_string())
    }
}

/// Load a Parquet file, one column per field.
///
/// Numeric columns may be any integer or float type; categorical columns any
/// string type (dictionary-encoded included). Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<StudentRecord>, DataLoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")
        .map_err(|e| malformed(path, e))?;

    {
        let schema = builder.schema();
        check_columns(path, |c| schema.index_of(c).is_ok())?;
    }

    let reader = builder
        .build()
        .context("building parquet reader")
        .map_err(|e| malformed(path, e))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .context("reading parquet record batch")
            .map_err(|e| malformed(path, e))?;

        let columns = cast_required_columns(&batch).map_err(|e| malformed(path, e))?;
        let offset = records.len();
        for row in 0..batch.num_rows() {
            let src = BatchRow {
                columns: &columns,
                row,
            };
            records.push(build_record(path, offset + row + 1, &src)?);
        }
    }

    Ok(records)
}

fn cast_required_columns(
    batch: &arrow::record_batch::RecordBatch,
) -> Result<BTreeMap<&'static str, Arc<dyn Array>>> {
    let mut out = BTreeMap::new();
    let targets = NumericColumn::ALL
        .iter()
        .map(|c| (c.name(), DataType::Float64))
        .chain(CategoryColumn::ALL.iter().map(|c| (c.name(), DataType::Utf8)));

    for (name, target) in targets {
        let col = batch
            .column_by_name(name)
            .with_context(|| format!("record batch missing '{name}'"))?;
        let casted = cast(col, &target).with_context(|| {
            format!("column '{name}' of type {:?} cannot be read as {target:?}", col.data_type())
        })?;
        out.insert(name, casted);
    }
    Ok(out)
}

/// Path of a loaded dataset, for display.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
