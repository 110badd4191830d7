/// Data layer: score tables, loading, and saving.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ScoreTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ ScoreTable  │  columns + rows; scores(column) → ScoreSet
///   └────────────┘
///        │  with_grades(assignment)
///        ▼
///   ┌──────────┐
///   │  writer   │  ScoreTable → same file format
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;

use std::path::Path;

use anyhow::{bail, Result};

/// On-disk table formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "json" => Ok(TableFormat::Json),
            "parquet" | "pq" => Ok(TableFormat::Parquet),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_by_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a.CSV")).unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("a.pq")).unwrap(), TableFormat::Parquet);
        assert_eq!(TableFormat::from_path(Path::new("a.json")).unwrap(), TableFormat::Json);
        assert!(TableFormat::from_path(Path::new("grades")).is_err());
    }
}
