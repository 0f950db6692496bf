//! DataFrame helpers with column validation
//!
//! Small, explicit accessors for pulling typed values out of a Polars
//! DataFrame whose dtypes depend on the source file (CSV inference, parquet
//! schema, spreadsheet cells).

use polars::prelude::*;
use std::collections::HashSet;

/// Names from `required` that are absent from `df`, sorted
///
/// # Example
/// ```ignore
/// let missing = missing_columns(&df, &["Food product", "Retail"]);
/// assert!(missing.is_empty());
/// ```
pub fn missing_columns(df: &DataFrame, required: &[&str]) -> Vec<String> {
    let actual: HashSet<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut missing: Vec<String> = required
        .iter()
        .filter(|name| !actual.contains(**name))
        .map(|name| name.to_string())
        .collect();
    missing.sort();
    missing
}

/// Cast a column to Float64 in place
///
/// Non-numeric values and NaN both become null (non-strict cast), so null
/// checks see every missing value.
pub fn cast_to_f64(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    let cleaned: Float64Chunked = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    df.with_column(cleaned.with_name(name.into()).into_series())?;
    Ok(())
}

/// Cast a column to String in place
pub fn cast_to_string(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    df.with_column(casted)?;
    Ok(())
}

/// Collect a numeric column as `Option<f64>` values (casting if needed)
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

/// Collect a column as `Option<String>` values (casting if needed)
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|opt| opt.map(|s| s.to_string()))
        .collect())
}

/// Index of the first null entry in a column, if any
pub fn first_null_row(df: &DataFrame, name: &str) -> PolarsResult<Option<usize>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series.is_null().into_iter().position(|v| v == Some(true)))
}

/// Drop every row where `name` is null; surviving rows keep their order
pub fn drop_null_rows(df: &DataFrame, name: &str) -> PolarsResult<DataFrame> {
    let mask = df.column(name)?.as_materialized_series().is_not_null();
    df.filter(&mask)
}
