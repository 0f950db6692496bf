//! Data Loading and Validation
//!
//! Reads the food emissions dataset into a Polars DataFrame and checks it
//! against the schema contract before any scoring happens.
//!
//! Supported sources (chosen by file extension):
//! - `.csv` via the Polars CSV reader
//! - `.parquet` via a Polars parquet scan
//! - `.xlsx` / `.xlsm` / `.xls` / `.ods` via calamine (first worksheet)

use crate::scorer::EmissionComponent;
use crate::utils::frame_helpers::{
    cast_to_f64, cast_to_string, drop_null_rows, first_null_row, missing_columns,
};
use calamine::{open_workbook_auto, DataType as Cell, Reader};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Product name column
pub const FOOD_PRODUCT_COL: &str = "Food product";

/// Total emissions column (kg CO2e per kg product)
pub const TOTAL_EMISSIONS_COL: &str = "kg CO2e/ pr. kg";

/// Product image URL column (nullable)
pub const IMAGE_LINK_COL: &str = "Image Link";

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("failed to read spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("unsupported dataset format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),
}

/// Every column the schema contract requires
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![FOOD_PRODUCT_COL, TOTAL_EMISSIONS_COL, IMAGE_LINK_COL];
    columns.extend(EmissionComponent::ALL.iter().map(|c| c.column()));
    columns
}

/// Read and validate the emissions dataset
///
/// Either a fully valid frame is returned or the call fails; there is no
/// partial-success mode.
pub fn load_emissions(path: impl AsRef<Path>) -> Result<DataFrame, DataLoadError> {
    let path = path.as_ref();
    let raw = read_frame(path)?;
    let before = raw.height();

    let df = prepare_frame(raw)?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        dropped = before - df.height(),
        "Loaded emissions dataset"
    );

    Ok(df)
}

/// Validate the schema contract and normalise dtypes
///
/// 1. Fail if any required column is absent
/// 2. Cast total and component columns to Float64 (NaN counts as null),
///    text columns to String
/// 3. Drop rows whose total emissions are null
/// 4. Fail on a null product name or component value in a surviving row
pub fn prepare_frame(mut df: DataFrame) -> Result<DataFrame, DataLoadError> {
    let missing = missing_columns(&df, &required_columns());
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    cast_to_f64(&mut df, TOTAL_EMISSIONS_COL)?;
    for component in EmissionComponent::ALL {
        cast_to_f64(&mut df, component.column())?;
    }
    cast_to_string(&mut df, FOOD_PRODUCT_COL)?;
    cast_to_string(&mut df, IMAGE_LINK_COL)?;

    let df = drop_null_rows(&df, TOTAL_EMISSIONS_COL)?;

    let mut not_null = vec![FOOD_PRODUCT_COL];
    not_null.extend(EmissionComponent::ALL.iter().map(|c| c.column()));
    for column in not_null {
        if let Some(row) = first_null_row(&df, column)? {
            return Err(DataLoadError::NullValue {
                column: column.to_string(),
                row,
            });
        }
    }

    Ok(df)
}

/// Read the raw frame for a path, dispatching on extension
fn read_frame(path: &Path) -> Result<DataFrame, DataLoadError> {
    std::fs::metadata(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => read_csv(path),
        Some("parquet") => read_parquet(path),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => read_spreadsheet(path),
        _ => Err(DataLoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, DataLoadError> {
    let parse_err = |source| DataLoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_err)?
        .finish()
        .map_err(parse_err)
}

fn read_parquet(path: &Path) -> Result<DataFrame, DataLoadError> {
    let parse_err = |source| DataLoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    LazyFrame::scan_parquet(path, Default::default())
        .map_err(parse_err)?
        .collect()
        .map_err(parse_err)
}

/// Load the first worksheet into a frame holding only the required columns
///
/// The header row names the columns. Fully empty rows are skipped.
fn read_spreadsheet(path: &Path) -> Result<DataFrame, DataLoadError> {
    let sheet_err = |message: String| DataLoadError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook =
        open_workbook_auto(path).map_err(|err| sheet_err(format!("unable to open workbook: {err}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| sheet_err("workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| sheet_err(format!("worksheet '{sheet_name}' not found")))?
        .map_err(|err| sheet_err(format!("unable to read worksheet '{sheet_name}': {err}")))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| sheet_err("worksheet is empty".to_string()))?
        .iter()
        .map(|cell| cell_to_string(cell).unwrap_or_default())
        .collect();

    let required = required_columns();
    let mut missing = Vec::new();
    let mut indices = Vec::with_capacity(required.len());
    for name in &required {
        match header.iter().position(|h| h == name) {
            Some(idx) => indices.push(idx),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        missing.sort();
        return Err(DataLoadError::MissingColumns(missing));
    }

    let data_rows: Vec<&[Cell]> = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Cell::Empty)))
        .collect();

    let mut columns = Vec::with_capacity(required.len());
    for (name, idx) in required.iter().zip(indices) {
        let column = if *name == FOOD_PRODUCT_COL || *name == IMAGE_LINK_COL {
            let values: Vec<Option<String>> = data_rows
                .iter()
                .map(|row| row.get(idx).and_then(cell_to_string))
                .collect();
            Column::new((*name).into(), values)
        } else {
            let values: Vec<Option<f64>> = data_rows
                .iter()
                .map(|row| row.get(idx).and_then(cell_to_f64))
                .collect();
            Column::new((*name).into(), values)
        };
        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}

fn cell_to_string(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn cell_to_f64(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Float(f) => Some(*f),
        Cell::Int(i) => Some(*i as f64),
        Cell::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
