use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::model::{CellValue, ScoreTable};
use super::TableFormat;

/// Save `table` in the format implied by the extension of `path`.
pub fn save_file(table: &ScoreTable, path: &Path) -> Result<()> {
    let written = match TableFormat::from_path(path)? {
        TableFormat::Csv => {
            let file = std::fs::File::create(path).context("creating CSV file")?;
            write_csv(table, file)
        }
        TableFormat::Json => {
            let file = std::fs::File::create(path).context("creating JSON file")?;
            serde_json::to_writer_pretty(file, &to_json_records(table)).context("writing JSON")
        }
        TableFormat::Parquet => write_parquet(table, path),
    };
    written.with_context(|| format!("saving {}", path.display()))?;

    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn write_csv<W: Write>(table: &ScoreTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for (row_no, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON (records-oriented)
// ---------------------------------------------------------------------------

pub fn to_json_records(table: &ScoreTable) -> JsonValue {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let obj: Map<String, JsonValue> = table
                .columns
                .iter()
                .cloned()
                .zip(row.iter().map(cell_to_json))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();
    JsonValue::Array(records)
}

fn cell_to_json(cell: &CellValue) -> JsonValue {
    match cell {
        CellValue::String(s) => JsonValue::String(s.clone()),
        CellValue::Integer(i) => JsonValue::from(*i),
        // Non-finite floats have no JSON form and become null.
        CellValue::Float(f) => {
            serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
        }
        CellValue::Bool(b) => JsonValue::Bool(*b),
        CellValue::Null => JsonValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Narrowest Arrow type that holds every non-null cell of a column.
fn column_type(table: &ScoreTable, idx: usize) -> DataType {
    let mut ty: Option<DataType> = None;
    for cell in table.rows.iter().map(|row| &row[idx]) {
        let cell_ty = match cell {
            CellValue::Null => continue,
            CellValue::Integer(_) => DataType::Int64,
            CellValue::Float(_) => DataType::Float64,
            CellValue::Bool(_) => DataType::Boolean,
            CellValue::String(_) => return DataType::Utf8,
        };
        ty = Some(match (ty, cell_ty) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64), DataType::Float64)
            | (Some(DataType::Float64), DataType::Int64) => DataType::Float64,
            _ => return DataType::Utf8,
        });
    }
    ty.unwrap_or(DataType::Utf8)
}

fn build_column(table: &ScoreTable, idx: usize, ty: &DataType) -> ArrayRef {
    let cells = table.rows.iter().map(|row| &row[idx]);
    match ty {
        DataType::Int64 => Arc::new(
            cells
                .map(|c| match c {
                    CellValue::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(cells.map(CellValue::as_f64).collect::<Float64Array>()),
        DataType::Boolean => Arc::new(
            cells
                .map(|c| match c {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        _ => Arc::new(
            cells
                .map(|c| (!c.is_null()).then(|| c.to_string()))
                .collect::<StringArray>(),
        ),
    }
}

fn write_parquet(table: &ScoreTable, path: &Path) -> Result<()> {
    let types: Vec<DataType> = (0..table.columns.len())
        .map(|idx| column_type(table, idx))
        .collect();

    let schema = Arc::new(Schema::new(
        table
            .columns
            .iter()
            .zip(&types)
            .map(|(name, ty)| Field::new(name, ty.clone(), true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = types
        .iter()
        .enumerate()
        .map(|(idx, ty)| build_column(table, idx, ty))
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
