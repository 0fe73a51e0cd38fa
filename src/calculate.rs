//! Calculation engine: derive parameter columns on the Measurement Table.
//!
//! A calculation validates its column requirements up front, evaluates the
//! formula row-wise over a working copy sorted by (sample, time), and
//! writes the result back into the table in its original row order. The
//! dark-measured baselines `fm` and `f0` are forward-filled over that sort
//! order before evaluation. The fill is intentionally global, not grouped by
//! sample: a trailing baseline can carry across a sample boundary.

use std::collections::HashMap;

use colored::Colorize;
use polars::prelude::*;
use tracing::debug;

use crate::catalogue::{self, CalcOptions};
use crate::error::{PhenomicsError, Result};
use crate::schema;

/// Row-order column added to the working copy so results can be written
/// back in the table's original order
const ROW_ORDER: &str = "__row_order";

/// Per-call settings: column-name overrides, an output alias and formula
/// constants
#[derive(Debug, Clone, Default)]
pub struct CalcRequest {
    /// Logical input name -> actual column name
    pub columns: HashMap<String, String>,
    /// Output column name; defaults to the parameter name
    pub alias: Option<String>,
    pub options: CalcOptions,
}

impl CalcRequest {
    pub fn with_column(mut self, logical: impl Into<String>, actual: impl Into<String>) -> Self {
        self.columns.insert(logical.into(), actual.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_options(mut self, options: CalcOptions) -> Self {
        self.options = options;
        self
    }
}

/// Calculate a catalogue parameter with default column names and constants
pub fn calculate(df: &mut DataFrame, parameter: &str) -> Result<()> {
    calculate_with(df, parameter, &CalcRequest::default())
}

/// Calculate a catalogue parameter.
///
/// Fails with [`PhenomicsError::UnknownParameter`] for a name in neither
/// catalogue and with [`PhenomicsError::MissingColumns`] (naming the absent
/// logical inputs) when the table lacks a required column.
pub fn calculate_with(df: &mut DataFrame, parameter: &str, request: &CalcRequest) -> Result<()> {
    let Some(spec) = catalogue::lookup(parameter) else {
        return Err(PhenomicsError::UnknownParameter {
            name: parameter.to_string(),
            known: catalogue::known_parameters().join(", "),
        });
    };

    let resolved: Vec<(String, String)> = spec
        .inputs
        .iter()
        .map(|logical| {
            let actual = request
                .columns
                .get(*logical)
                .cloned()
                .unwrap_or_else(|| logical.to_string());
            (logical.to_string(), actual)
        })
        .collect();

    let missing = schema::missing_columns(df, &resolved);
    if !missing.is_empty() {
        return Err(PhenomicsError::missing_columns(parameter, &missing));
    }

    let out_name = request.alias.clone().unwrap_or_else(|| parameter.to_string());
    match &request.alias {
        Some(alias) => println!(
            "{} {} (as \"{}\")",
            "Calculating".bright_cyan(),
            parameter,
            alias
        ),
        None => println!("{} {}", "Calculating".bright_cyan(), parameter),
    }

    let sources: Vec<String> = resolved.iter().map(|(_, actual)| actual.clone()).collect();
    let fill: Vec<String> = resolved
        .iter()
        .filter(|(logical, _)| spec.fill.contains(&logical.as_str()))
        .map(|(_, actual)| actual.clone())
        .collect();

    let options = request.options;
    apply_rowwise(df, &out_name, &sources, &fill, |values| {
        (spec.eval)(values, &options)
    })
}

/// Calculate a caller-supplied formula.
///
/// `formula` receives one value per entry of `source_columns`, in order,
/// plus the `extra` constants. Columns named in `fill_columns` are
/// forward-filled over the (sample, time) sort before evaluation, like the
/// standard catalogue's baselines.
pub fn calculate_custom<F>(
    df: &mut DataFrame,
    name: &str,
    formula: F,
    source_columns: &[&str],
    fill_columns: &[&str],
    extra: &HashMap<String, f64>,
) -> Result<()>
where
    F: Fn(&[f64], &HashMap<String, f64>) -> f64,
{
    if name.is_empty() {
        return Err(PhenomicsError::configuration("Parameter name not defined"));
    }

    let required: Vec<(String, String)> = source_columns
        .iter()
        .chain(fill_columns.iter())
        .map(|c| (c.to_string(), c.to_string()))
        .collect();
    let missing = schema::missing_columns(df, &required);
    if !missing.is_empty() {
        return Err(PhenomicsError::missing_columns(name, &missing));
    }

    println!("{} {}", "Calculating".bright_cyan(), name);

    let sources: Vec<String> = source_columns.iter().map(|c| c.to_string()).collect();
    let fill: Vec<String> = fill_columns.iter().map(|c| c.to_string()).collect();
    apply_rowwise(df, name, &sources, &fill, |values| formula(values, extra))
}

/// Shared evaluation pipeline: stable (sample, time) sort, forward-fill,
/// row-wise evaluation, write-back in original row order.
///
/// A row evaluates to missing when any input is missing after the fill;
/// non-finite results of the arithmetic itself are kept as values.
fn apply_rowwise(
    df: &mut DataFrame,
    out_name: &str,
    sources: &[String],
    fill: &[String],
    eval: impl Fn(&[f64]) -> f64,
) -> Result<()> {
    let working = df.with_row_index(ROW_ORDER.into(), None)?;
    let mut sorted = working.sort(
        ["sample", "time"],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;

    for column in fill {
        let filled = sorted
            .column(column)?
            .as_materialized_series()
            .fill_null(FillNullStrategy::Forward(None))?;
        sorted.with_column(filled)?;
    }

    let mut inputs: Vec<Float64Chunked> = Vec::with_capacity(sources.len());
    for column in sources {
        let series = sorted
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        inputs.push(series.f64()?.clone());
    }

    let height = sorted.height();
    let mut out: Vec<Option<f64>> = Vec::with_capacity(height);
    let mut args = vec![0.0f64; sources.len()];
    'rows: for i in 0..height {
        for (j, input) in inputs.iter().enumerate() {
            match input.get(i) {
                Some(v) => args[j] = v,
                None => {
                    out.push(None);
                    continue 'rows;
                }
            }
        }
        out.push(Some(eval(&args)));
    }

    sorted.with_column(Column::new(out_name.into(), out))?;
    let restored = sorted.sort([ROW_ORDER], SortMultipleOptions::default())?;
    let result = restored.column(out_name)?.as_materialized_series().clone();

    debug!(
        "Computed column \"{}\" over {} rows ({} non-missing)",
        out_name,
        height,
        height - result.null_count()
    );

    df.with_column(result)?;
    Ok(())
}
