use polars::prelude::*;

use crate::error::{Error, Result};

/// Fills gaps in the named columns, forward first and then backward.
///
/// Forward fill propagates the last observed value into each gap; a gap at
/// the start of a series has no predecessor and is resolved by the backward
/// pass instead. Row count and ordering are preserved, and columns not named
/// in `columns` pass through untouched.
///
/// # Errors
/// `InvalidArgument` when a named column is missing from the frame.
pub fn back_forward_fill(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut filled = df.clone();

    for &name in columns {
        let series = df
            .column(name)
            .map_err(|_| Error::InvalidArgument(format!("unknown column '{name}'")))?
            .as_materialized_series()
            .fill_null(FillNullStrategy::Forward(None))?
            .fill_null(FillNullStrategy::Backward(None))?;
        filled.with_column(series)?;
    }

    Ok(filled)
}
