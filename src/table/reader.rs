use super::{Cell, Table};
use crate::core::{Result, SentimentError};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::fmt;
use std::io::Cursor;
use std::path::Path;

/// Upload formats accepted by the batch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    /// Any workbook calamine can open (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).
    Spreadsheet,
}

impl TableFormat {
    /// Pick the format from a file name's extension.
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            _ => Err(SentimentError::unreadable(
                if extension.is_empty() { "unknown" } else { extension.as_str() },
                format!("unsupported file type for `{name}`, upload a .csv or .xlsx file"),
            )),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Csv => f.write_str("csv"),
            TableFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// Read a table from disk, choosing the parser from the file extension.
pub fn read_path(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    let format = TableFormat::from_name(&name)?;
    let bytes = std::fs::read(path).map_err(|e| SentimentError::unreadable(format.to_string(), e))?;
    read_bytes(format, bytes)
}

/// Parse an uploaded file's contents.
pub fn read_bytes(format: TableFormat, bytes: Vec<u8>) -> Result<Table> {
    let table = match format {
        TableFormat::Csv => read_csv(&bytes)?,
        TableFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };
    tracing::debug!(
        %format,
        columns = table.n_columns(),
        rows = table.n_rows(),
        "parsed uploaded table"
    );
    Ok(table)
}

fn unnamed(index: usize, name: String) -> String {
    if name.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        name
    }
}

fn read_csv(bytes: &[u8]) -> Result<Table> {
    let unreadable = |e: csv::Error| SentimentError::unreadable("csv", e);

    // Short rows are padded by `Table::new`; only rows wider than the header
    // are rejected.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(unreadable)?
        .iter()
        .enumerate()
        .map(|(i, h)| unnamed(i, h.to_string()))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(unreadable)?;
        if record.len() > columns.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(SentimentError::unreadable(
                "csv",
                format!(
                    "expected {} fields in line {line}, saw {}",
                    columns.len(),
                    record.len()
                ),
            ));
        }
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(Table::new(columns, rows))
}

fn spreadsheet_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(x) => Cell::Float(*x),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

fn read_spreadsheet(bytes: Vec<u8>) -> Result<Table> {
    let unreadable = |e: calamine::Error| SentimentError::unreadable("spreadsheet", e);

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(unreadable)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(unreadable)?,
        None => return Ok(Table::default()),
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| unnamed(i, spreadsheet_cell(cell).to_string()))
        .collect();
    let rows = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(Table::new(columns, rows))
}
