//! Export back to the Visual Phenomics per-parameter text format.
//!
//! Each exported column becomes one tab-separated `all<column>.txt`: the
//! identifier column first, one column per distinct measurement time that
//! holds data for that parameter, one row per sample, and a trailing
//! `*light_intensity` row. Missing cells are written as `NaN`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use polars::prelude::*;
use tracing::info;

use crate::constants::{LIGHT_INTENSITY_SENTINEL, MISSING_VALUE_TEXT, SAMPLE_HEADER};
use crate::error::{PhenomicsError, Result};
use crate::sample::SampleId;
use crate::schema;

/// Export table columns as parameter text files.
///
/// With an empty `cols`, every non-metadata column is exported. Requesting
/// a reserved metadata column or a column absent from the table fails
/// before anything is written.
pub fn to_txt(df: &DataFrame, folder: &Path, cols: &[&str]) -> Result<()> {
    let export_cols: Vec<String> = if cols.is_empty() {
        df.get_column_names()
            .iter()
            .map(|c| c.to_string())
            .filter(|c| !schema::is_reserved(c))
            .collect()
    } else {
        let reserved: Vec<String> = cols
            .iter()
            .filter(|c| schema::is_reserved(c))
            .map(|c| c.to_string())
            .collect();
        if !reserved.is_empty() {
            return Err(PhenomicsError::ReservedColumns {
                columns: reserved.join(", "),
            });
        }
        let unknown: Vec<String> = cols
            .iter()
            .filter(|c| !schema::has_column(df, c))
            .map(|c| c.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(PhenomicsError::ColumnsNotFound {
                columns: unknown.join(", "),
            });
        }
        cols.iter().map(|c| c.to_string()).collect()
    };

    fs::create_dir_all(folder)?;

    let n = df.height();
    let sample_ca = utf8_column(df, "sample")?.ok_or_else(|| PhenomicsError::ColumnsNotFound {
        columns: "sample".to_string(),
    })?;
    let time_ca = df
        .column("time")?
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .clone();

    let identifiers = row_identifiers(df, &sample_ca, n)?;
    let light = light_by_time(df, &time_ca, n)?;

    for column in &export_cols {
        let values = df
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .clone();

        // Timepoints that actually hold data for this parameter
        let mut times: Vec<f64> = (0..n)
            .filter(|&i| values.get(i).is_some())
            .filter_map(|i| time_ca.get(i))
            .collect();
        times.sort_by(f64::total_cmp);
        times.dedup_by(|a, b| a.to_bits() == b.to_bits());

        // Cell values per sample, in order of first appearance
        let mut order: Vec<String> = Vec::new();
        let mut rows: HashMap<String, (String, HashMap<u64, f64>)> = HashMap::new();
        for i in 0..n {
            let Some(value) = values.get(i) else { continue };
            let Some(time) = time_ca.get(i) else { continue };
            let sample = sample_ca.get(i).unwrap_or_default().to_string();
            let entry = rows.entry(sample.clone()).or_insert_with(|| {
                order.push(sample);
                (identifiers[i].clone(), HashMap::new())
            });
            entry.1.insert(time.to_bits(), value);
        }

        let path = folder.join(format!("all{column}.txt"));
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .from_path(&path)?;

        let mut header: Vec<String> = Vec::with_capacity(times.len() + 1);
        header.push(SAMPLE_HEADER.to_string());
        header.extend(times.iter().map(|t| format_value(*t)));
        writer.write_record(&header)?;

        for sample in &order {
            let (identifier, cells) = &rows[sample];
            let mut record = Vec::with_capacity(times.len() + 1);
            record.push(identifier.clone());
            for time in &times {
                record.push(match cells.get(&time.to_bits()) {
                    Some(v) => format_value(*v),
                    None => MISSING_VALUE_TEXT.to_string(),
                });
            }
            writer.write_record(&record)?;
        }

        let mut record = Vec::with_capacity(times.len() + 1);
        record.push(LIGHT_INTENSITY_SENTINEL.to_string());
        for time in &times {
            record.push(match light.get(&time.to_bits()) {
                Some(v) => format_value(*v),
                None => MISSING_VALUE_TEXT.to_string(),
            });
        }
        writer.write_record(&record)?;
        writer.flush()?;

        info!("Exported column \"{}\" to {}", column, path.display());
    }

    Ok(())
}

/// Format a float the way it is parsed back: plain decimal, `NaN` for
/// not-a-number
fn format_value(value: f64) -> String {
    format!("{value}")
}

/// A column cast to strings, or `None` when the table lacks it
fn utf8_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>> {
    if !schema::has_column(df, name) {
        return Ok(None);
    }
    let cast = df.column(name)?.cast(&DataType::String)?;
    Ok(Some(cast.as_materialized_series().str()?.clone()))
}

/// Reconstruct the encoded identifier per row; rows without complete
/// metadata fall back to the raw `sample` value
fn row_identifiers(df: &DataFrame, sample_ca: &StringChunked, n: usize) -> Result<Vec<String>> {
    let name = utf8_column(df, "name")?;
    let position = utf8_column(df, "position")?;
    let flat = utf8_column(df, "flat")?;
    let experiment = utf8_column(df, "experiment")?;
    let camera = utf8_column(df, "camera")?;
    let replicate = utf8_column(df, "replicate")?;

    let mut identifiers = Vec::with_capacity(n);
    for i in 0..n {
        let raw = sample_ca.get(i).unwrap_or_default().to_string();
        let encoded = match (&name, &position, &flat, &experiment, &camera, &replicate) {
            (Some(name), Some(position), Some(flat), Some(experiment), Some(camera), Some(replicate)) => {
                match (
                    name.get(i),
                    position.get(i),
                    flat.get(i),
                    experiment.get(i),
                    camera.get(i),
                    replicate.get(i),
                ) {
                    (Some(name), Some(position), Some(flat), Some(experiment), Some(camera), Some(replicate)) => {
                        Some(
                            SampleId {
                                name: name.to_string(),
                                position: position.to_string(),
                                flat: flat.to_string(),
                                experiment: experiment.to_string(),
                                camera: camera.to_string(),
                                replicate: replicate.to_string(),
                            }
                            .encode(),
                        )
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        identifiers.push(encoded.unwrap_or(raw));
    }
    Ok(identifiers)
}

/// Light intensity per timepoint, first occurrence wins
fn light_by_time(df: &DataFrame, time_ca: &Float64Chunked, n: usize) -> Result<HashMap<u64, f64>> {
    let mut light = HashMap::new();
    if !schema::has_column(df, "light_intensity") {
        return Ok(light);
    }
    let values = df
        .column("light_intensity")?
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .clone();
    for i in 0..n {
        if let (Some(time), Some(value)) = (time_ca.get(i), values.get(i)) {
            light.entry(time.to_bits()).or_insert(value);
        }
    }
    Ok(light)
}
