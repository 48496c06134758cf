//! Shared DataFrame plumbing for the CSV pipelines: reading yearly extracts,
//! schema checks, string-to-numeric parsing, group-by aggregation, and
//! cleaned-CSV output.

use std::path::Path;

use polars::prelude::*;

use crate::error::StatError;

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
pub fn read_csv(path: &Path) -> Result<DataFrame, StatError> {
    if !path.is_file() {
        return Err(StatError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no such file: {}", path.display()),
        )));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), StatError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(StatError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Drop the listed columns where present; absent ones are ignored.
pub fn drop_existing(df: DataFrame, columns: &[&str]) -> Result<DataFrame, StatError> {
    let mut df = df;
    for &column in columns {
        if df.schema().contains(column) {
            df = df.drop(column)?;
        }
    }
    Ok(df)
}

/// Parse a string column to Float64. Unparseable values become null.
pub fn parse_float(column: &str) -> Expr {
    col(column)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .cast(DataType::Float64)
}

/// Parse a string column to Int64. Unparseable values become null.
pub fn parse_int(column: &str) -> Expr {
    col(column)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .cast(DataType::Int64)
}

/// Predicate that holds when every listed column is non-null.
pub fn all_not_null(columns: &[&str]) -> Expr {
    columns
        .iter()
        .fold(lit(true), |acc, c| acc.and(col(*c).is_not_null()))
}

/// Group by `keys` and sum `values`, sorted by the group keys so output is
/// independent of input row order.
pub fn sum_by(df: DataFrame, keys: &[&str], values: &[&str]) -> Result<DataFrame, StatError> {
    let key_cols: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let sums: Vec<Expr> = values.iter().map(|v| col(*v).sum()).collect();

    let out = df
        .lazy()
        .group_by(key_cols)
        .agg(sums)
        .sort(keys.to_vec(), SortMultipleOptions::default())
        .collect()?;

    Ok(out)
}

/// Round a Float64 column to 2 decimal places in place.
pub fn round_2dp(df: &mut DataFrame, column: &str) -> Result<(), StatError> {
    let rounded = df
        .column(column)?
        .f64()?
        .apply_values(|v| (v * 100.0).round() / 100.0);
    df.replace(column, rounded.into_series())?;
    Ok(())
}

/// Write a cleaned table as UTF-8 CSV with a header row and no index column.
/// `float_precision` fixes the number of decimals for float columns.
pub fn write_csv(
    df: &mut DataFrame,
    path: &Path,
    float_precision: Option<usize>,
) -> Result<(), StatError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_float_precision(float_precision)
        .finish(df)?;

    Ok(())
}
