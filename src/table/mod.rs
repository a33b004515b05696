//! In-memory tables built from uploaded CSV or spreadsheet files.
//!
//! ## Main Types
//!
//! - [`Table`] - Header plus rows of [`Cell`]s, rectangular by construction
//! - [`TableFormat`] - Supported upload formats, picked from the file name

pub mod reader;

pub use reader::{read_bytes, read_path, TableFormat};

use std::fmt;

/// Text a missing value is scored as, the way dataframe string coercion
/// renders nulls.
pub const MISSING_TEXT: &str = "nan";

/// A single table value as it came out of the file.
///
/// `Display` writes the value back out as it appeared in the file (missing
/// values as an empty field); [`Cell::as_text`] is what gets scored.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Textual representation fed to the normalizer. Missing values become
    /// [`MISSING_TEXT`].
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => MISSING_TEXT.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table. Short rows are padded with [`Cell::Empty`] and long
    /// rows truncated so every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// A one-column table, mostly useful for scoring plain lists of reviews.
    pub fn from_texts<I, S>(column: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = texts
            .into_iter()
            .map(|t| vec![Cell::from(t.into())])
            .collect();
        Self::new(vec![column.into()], rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cells of column `index`, in row order.
    pub fn column(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.columns.len() {
            return None;
        }
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Scoring text of every cell in column `index`, in row order.
    pub fn column_texts(&self, index: usize) -> Option<Vec<String>> {
        self.column(index)
            .map(|cells| cells.into_iter().map(Cell::as_text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_made_rectangular() {
        let table = Table::new(
            vec!["Review".into(), "Sentiment".into()],
            vec![
                vec![Cell::from("ok")],
                vec![Cell::from("a"), Cell::from("b"), Cell::from("c")],
            ],
        );
        assert_eq!(table.rows()[0], vec![Cell::from("ok"), Cell::Empty]);
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn cells_coerce_to_text() {
        assert_eq!(Cell::Empty.as_text(), "nan");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Int(5).as_text(), "5");
        assert_eq!(Cell::Float(2.5).as_text(), "2.5");
        assert_eq!(Cell::Bool(true).as_text(), "true");
        assert_eq!(Cell::from("").as_text(), "nan");
    }

    #[test]
    fn column_texts_checks_bounds() {
        let table = Table::from_texts("Review", ["good", ""]);
        assert_eq!(table.column_texts(0), Some(vec!["good".into(), "nan".into()]));
        assert_eq!(table.column(0), Some(vec![&Cell::from("good"), &Cell::Empty]));
        assert_eq!(table.column_texts(1), None);
        assert_eq!(Table::default().column_texts(0), None);
    }
}
