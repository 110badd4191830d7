use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{guess_cell_type, CellValue, ScoreTable};
use super::TableFormat;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a score table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one student per line
/// * `.json`    – `[{ "name": "...", "exam1": 91, ... }, ...]`
/// * `.parquet` – flat scalar columns, as written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<ScoreTable> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => load_csv(path),
        TableFormat::Json => load_json(path),
        TableFormat::Parquet => load_parquet(path),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ScoreTable> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Header row gives the column names; each cell's dtype is guessed.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ScoreTable> {
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| guess_cell_type(v.trim())).collect());
    }

    Ok(ScoreTable::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "student_id": 1, "name": "Ana", "exam1": 91.5 },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance across the records.
fn load_json(path: &Path) -> Result<ScoreTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_records(&text)
}

pub fn parse_json_records(text: &str) -> Result<ScoreTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(ScoreTable::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns (strings, ints, floats,
/// bools). Nested columns are carried along as their type name.
fn load_parquet(path: &Path) -> Result<ScoreTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {}", rows.len()))?;
            rows.push(cells);
        }
    }

    Ok(ScoreTable::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(i64::from(downcast::<Int32Array>(col)?.value(row))),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => CellValue::Float(f64::from(downcast::<Float32Array>(col)?.value(row))),
        DataType::Float64 => CellValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => CellValue::String(format!("{other:?}")),
    };
    Ok(cell)
}

fn downcast<T: Array + 'static>(col: &Arc<dyn Array>) -> Result<&T> {
    match col.as_any().downcast_ref::<T>() {
        Some(arr) => Ok(arr),
        None => bail!("unexpected array layout for {:?}", col.data_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_columns_and_types() {
        let data = "student_id,name,exam1\n1,Ana,91.5\n2,Bo,67\n";
        let table = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(table.columns, vec!["student_id", "name", "exam1"]);
        assert_eq!(table.rows[0][1], CellValue::String("Ana".into()));
        assert_eq!(table.rows[1][2], CellValue::Integer(67));
        assert_eq!(table.scores("exam1").unwrap().as_slice(), &[91.5, 67.0]);
    }

    #[test]
    fn json_columns_in_first_seen_order() {
        let table = parse_json_records(
            r#"[{"name": "Ana", "exam1": 91.5}, {"exam1": 40, "name": "Bo", "late": true}]"#,
        )
        .unwrap();
        assert_eq!(table.columns, vec!["name", "exam1", "late"]);
        assert_eq!(table.rows[0][2], CellValue::Null);
        assert_eq!(table.rows[1][1], CellValue::Integer(40));
    }

    #[test]
    fn json_must_be_records() {
        assert!(parse_json_records(r#"{"exam1": [1, 2]}"#).is_err());
        assert!(parse_json_records(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("scores.xlsx")).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }
}
