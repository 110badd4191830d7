use std::fmt;

use anyhow::{bail, Result};

use crate::grading::{GradeAssignment, GradingError, ScoreSet};

/// Column that receives the computed grades.
pub const GRADE_COLUMN: &str = "Grade";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the score table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` score.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ScoreTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// A loaded table: one row per student, columns in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    /// Column names in the order they appeared in the source.
    pub columns: Vec<String>,
    /// Row-major cells; every row has `columns.len()` entries.
    pub rows: Vec<Vec<CellValue>>,
}

impl ScoreTable {
    /// Build a table, padding short rows with `Null`.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        ScoreTable { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Pull a numeric column out as a [`ScoreSet`], one score per row.
    pub fn scores(&self, column: &str) -> Result<ScoreSet> {
        let Some(idx) = self.column_index(column) else {
            return Err(GradingError::MissingData(format!(
                "column '{column}' not found (available: {})",
                self.columns.join(", ")
            ))
            .into());
        };

        let mut scores = Vec::with_capacity(self.rows.len());
        for (row_no, row) in self.rows.iter().enumerate() {
            let cell = &row[idx];
            match cell.as_f64() {
                Some(v) if v.is_finite() => scores.push(v),
                _ if cell.is_null() => bail!("Row {row_no}: '{column}' is empty"),
                _ => bail!("Row {row_no}: '{column}' value '{cell}' is not a finite number"),
            }
        }
        Ok(ScoreSet::new(scores))
    }

    /// A copy of this table with `assignment` in the `Grade` column.
    ///
    /// An existing `Grade` column is overwritten in place; otherwise the
    /// column is appended after the others.
    pub fn with_grades(&self, assignment: &GradeAssignment) -> Result<ScoreTable> {
        if assignment.len() != self.rows.len() {
            return Err(GradingError::LengthMismatch {
                assigned: assignment.len(),
                scores: self.rows.len(),
            }
            .into());
        }

        let mut table = self.clone();
        let idx = match table.column_index(GRADE_COLUMN) {
            Some(idx) => idx,
            None => {
                table.columns.push(GRADE_COLUMN.to_string());
                for row in &mut table.rows {
                    row.push(CellValue::Null);
                }
                table.columns.len() - 1
            }
        };

        for (row, label) in table.rows.iter_mut().zip(assignment.labels()) {
            row[idx] = CellValue::String(label.clone());
        }
        Ok(table)
    }
}

/// Interpret a text cell the way a CSV reader would guess its dtype.
pub fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}
