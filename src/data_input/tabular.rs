// src/data_input/tabular.rs

use csv::ReaderBuilder;
use csv::WriterBuilder;
use log::{debug, info};
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::{MISSING_MARKERS, PRODUCT_COLUMN_NAME};
use crate::error::{ExplorerError, Result};

/// A single parsed cell. Text cells keep their original spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if !value.is_nan() => Cell::Number(value),
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Missing-value counts gathered by [`Table::audit_and_clean`].
#[derive(Debug, Clone, PartialEq)]
pub struct NanReport {
    pub per_column: Vec<(String, usize)>,
    pub total: usize,
    pub rows_dropped: usize,
}

impl fmt::Display for NanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NaN values per column:")?;
        let width = self
            .per_column
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);
        for (name, count) in &self.per_column {
            writeln!(f, "  {name:<width$}  {count}")?;
        }
        if self.total == 0 {
            write!(f, "There are no NaN values in the data.")
        } else {
            writeln!(f, "Total NaN values in the data: {}", self.total)?;
            write!(f, "Rows with NaN values removed: {}", self.rows_dropped)
        }
    }
}

/// An in-memory delimited table. The first column of the file is kept apart
/// as the index and is not listed among the data columns.
#[derive(Debug, Clone)]
pub struct Table {
    pub source: PathBuf,
    pub index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Loads a CSV file with a header row, using the first column as the index.
    pub fn load(path: &Path) -> Result<Table> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExplorerError::FileNotFound(path.to_path_buf()),
            _ => ExplorerError::Io(e),
        })?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader.headers()?.clone();
        if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
            return Err(ExplorerError::EmptyFile(path.to_path_buf()));
        }
        debug!("Headers found in CSV: {:?}", headers);

        let index_name = headers[0].to_string();
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut index = Vec::new();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            index.push(record.get(0).unwrap_or_default().to_string());
            rows.push(record.iter().skip(1).map(Cell::parse).collect());
        }

        let table = Table {
            source: path.to_path_buf(),
            index_name,
            columns,
            index,
            rows,
        };
        info!(
            "Loaded '{}': {} rows x {} columns",
            path.display(),
            table.len(),
            table.columns.len()
        );
        Ok(table)
    }

    /// Builds a table directly from parsed parts.
    pub fn from_parts(
        index_name: &str,
        columns: Vec<String>,
        index: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Table {
        Table {
            source: PathBuf::new(),
            index_name: index_name.to_string(),
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Checks that both plot columns exist.
    pub fn require_columns(&self, x: &str, y: &str) -> Result<()> {
        if self.has_column(x) && self.has_column(y) {
            Ok(())
        } else {
            Err(ExplorerError::UnknownColumns {
                x: x.to_string(),
                y: y.to_string(),
            })
        }
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ExplorerError::UnknownColumn(name.to_string()))
    }

    /// True when every present cell of the column is a number.
    pub fn is_numeric(&self, name: &str) -> bool {
        match self.column_index(name) {
            Some(col) => self
                .rows
                .iter()
                .all(|row| !matches!(row.get(col), Some(Cell::Text(_)))),
            None => false,
        }
    }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let col = self.require_column(name)?;
        if !self.is_numeric(name) {
            return Err(ExplorerError::NonNumericColumn(name.to_string()));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(col).and_then(Cell::as_f64))
            .collect())
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let col = self.require_column(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| match row.get(col) {
                Some(Cell::Missing) | None => None,
                Some(cell) => Some(cell.to_string()),
            })
            .collect())
    }

    /// Counts missing cells per data column.
    pub fn nan_report(&self) -> NanReport {
        let per_column: Vec<(String, usize)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let count = self
                    .rows
                    .iter()
                    .filter(|row| row.get(col).map_or(true, Cell::is_missing))
                    .count();
                (name.clone(), count)
            })
            .collect();
        let total = per_column.iter().map(|(_, count)| count).sum();
        NanReport {
            per_column,
            total,
            rows_dropped: 0,
        }
    }

    /// Removes every row holding at least one missing data cell.
    pub fn drop_missing_rows(&mut self) -> usize {
        let before = self.rows.len();
        let n_cols = self.columns.len();
        let keep: Vec<bool> = self
            .rows
            .iter()
            .map(|row| row.len() == n_cols && !row.iter().any(Cell::is_missing))
            .collect();

        let mut keep_iter = keep.iter();
        self.rows.retain(|_| *keep_iter.next().unwrap_or(&false));
        let mut keep_iter = keep.iter();
        self.index.retain(|_| *keep_iter.next().unwrap_or(&false));

        before - self.rows.len()
    }

    /// Reports missing values and drops the affected rows when there are any.
    pub fn audit_and_clean(&mut self) -> NanReport {
        let mut report = self.nan_report();
        if report.total > 0 {
            report.rows_dropped = self.drop_missing_rows();
            info!(
                "Dropped {} rows with missing values ({} remain)",
                report.rows_dropped,
                self.len()
            );
        }
        report
    }

    /// Adds the element-wise product of two numeric columns and writes the table,
    /// without its index column, to `file_name` (".csv" is appended if absent).
    pub fn multiply_columns_and_save(
        &mut self,
        col1: &str,
        col2: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        if !self.has_column(col1) || !self.has_column(col2) {
            return Err(ExplorerError::UnknownColumns {
                x: col1.to_string(),
                y: col2.to_string(),
            });
        }
        let a = self.numeric_column(col1)?;
        let b = self.numeric_column(col2)?;

        let product: Vec<Cell> = a
            .iter()
            .zip(&b)
            .map(|pair| match pair {
                (Some(x), Some(y)) => Cell::Number(x * y),
                _ => Cell::Missing,
            })
            .collect();
        self.set_column(PRODUCT_COLUMN_NAME, product);

        let path = PathBuf::from(with_csv_extension(file_name));
        self.write_csv(&path)?;
        info!("Wrote derived table to '{}'", path.display());
        Ok(path)
    }

    fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Writes the data columns (not the index) as CSV.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Renders the first `n` rows, index included, for the console.
    pub fn preview(&self, n: usize) -> String {
        let mut out = String::new();
        out.push_str(&self.index_name);
        for col in &self.columns {
            out.push('\t');
            out.push_str(col);
        }
        out.push('\n');
        for (idx, row) in self.index.iter().zip(&self.rows).take(n) {
            out.push_str(idx);
            for cell in row {
                out.push('\t');
                match cell {
                    Cell::Missing => out.push_str("NaN"),
                    other => out.push_str(&other.to_string()),
                }
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "[{} rows x {} columns]",
            self.len(),
            self.columns.len()
        ));
        out
    }
}

fn with_csv_extension(file_name: &str) -> String {
    if file_name.ends_with(".csv") {
        file_name.to_string()
    } else {
        format!("{file_name}.csv")
    }
}
