//! Human-readable summaries of a Measurement Table.

use colored::Colorize;
use polars::prelude::*;

use crate::error::Result;
use crate::schema;

/// Print shape, estimated memory footprint and column dtypes
pub fn info(df: &DataFrame) {
    println!("{}", "Measurement Table".bright_green().bold());
    println!(
        "  {} {} rows x {} columns",
        "Shape:".bright_cyan(),
        df.height(),
        df.width()
    );
    println!(
        "  {} {:.2} MB",
        "Estimated size:".bright_cyan(),
        df.estimated_size() as f64 / (1024.0 * 1024.0)
    );
    for (name, dtype) in df.schema().iter() {
        println!("  {:<24} {}", name.as_str(), dtype);
    }
}

/// Unique strain names, in order of first appearance
pub fn samples(df: &DataFrame) -> Result<Vec<String>> {
    unique_strings(df, "name")
}

/// Summary of the experiment's content: experiments, samples, lines,
/// duration and maximum light intensity
pub fn description(df: &DataFrame) -> Result<String> {
    let experiments = if schema::has_column(df, "experiment") {
        unique_strings(df, "experiment")?
    } else {
        Vec::new()
    };
    let sample_count = df.column("sample")?.as_materialized_series().n_unique()?;
    let mut lines = samples(df)?;
    lines.sort_by_key(|n| n.to_lowercase());

    let duration = df
        .column("time")?
        .as_materialized_series()
        .max::<f64>()?
        .unwrap_or(0.0);

    let light = if schema::has_column(df, "light_intensity") {
        df.column("light_intensity")?
            .as_materialized_series()
            .max::<f64>()?
            .map(|v| v.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    } else {
        "n/a".to_string()
    };

    let mut experiment_list = experiments.clone();
    experiment_list.sort_by_key(|n| n.to_lowercase());

    Ok(format!(
        "The current DataFrame contains {} experiment(s) with {} sample(s) of {} individual lines. \
         The duration of the experiment was {} hours ({} day(s)) with a maximum light intensity of {} uE.\n\n\
         # Lines: {}\n\n# Experiments:\n{}",
        experiments.len(),
        sample_count,
        lines.len(),
        duration,
        duration / crate::constants::HOURS_PER_DAY,
        light,
        lines.join(", "),
        experiment_list.join("\n"),
    ))
}

/// Distinct values of a string-like column, in order of first appearance
fn unique_strings(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let cast = df.column(column)?.cast(&DataType::String)?;
    let ca = cast.as_materialized_series().str()?.clone();

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for value in (&ca).into_iter().flatten() {
        if seen.insert(value.to_string()) {
            out.push(value.to_string());
        }
    }
    Ok(out)
}
