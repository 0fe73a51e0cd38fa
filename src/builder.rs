//! Ingestion pipeline: per-parameter text files to the Measurement Table.
//!
//! Each source location holds one tab-delimited file per fluorescence
//! parameter, with samples as rows and measurement times as columns. The
//! pipeline pivots those into one tidy table keyed by (sample, time),
//! reconciles the `*light_intensity` side channel, decodes sample metadata,
//! and derives the day-bucket columns. One malformed file never aborts an
//! import: it is recorded in the [`BuildReport`] and processing continues.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::functions::concat_df_diagonal;
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::{
    CATEGORY_COLUMNS, DATA_FILE_EXTENSION, DEFAULT_FILE_PREFIX, HOURS_PER_DAY,
    LIGHT_INTENSITY_SENTINEL,
};
use crate::error::{PhenomicsError, Result};
use crate::header::{FileHeader, HeaderFormat};
use crate::sample::SampleId;

/// Outcome of importing a single parameter file
#[derive(Debug, Clone)]
pub enum FileStatus {
    /// Parsed against a recognized header schema
    Imported { rows: usize },
    /// Parsed, but without sample metadata (non-standard header)
    Degraded { rows: usize, reason: String },
    /// Not imported at all
    Skipped { reason: String },
}

/// Per-file import record
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub parameter: String,
    pub status: FileStatus,
}

/// Batch report over all files of an import run.
///
/// Lets a caller inspect which files degraded or were skipped without
/// scraping console output.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub files: Vec<FileReport>,
}

impl BuildReport {
    pub fn imported(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Imported { .. }))
            .count()
    }

    pub fn degraded(&self) -> Vec<&FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Degraded { .. }))
            .collect()
    }

    pub fn skipped(&self) -> Vec<&FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Skipped { .. }))
            .collect()
    }
}

/// One (sample, time) row under construction
struct RowRecord {
    sample: String,
    meta: Option<SampleId>,
    time: f64,
    values: HashMap<String, f64>,
}

/// Accumulates rows, parameter columns and the light side-table for one
/// source location
#[derive(Default)]
struct LocationTable {
    columns: Vec<String>,
    rows: Vec<RowRecord>,
    index: HashMap<(String, u64), usize>,
    light: HashMap<u64, Option<f64>>,
}

impl LocationTable {
    fn add_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    /// First non-missing reading wins; a missing placeholder is filled by a
    /// later non-missing duplicate
    fn record_light(&mut self, time: f64, value: Option<f64>) {
        match self.light.get_mut(&time.to_bits()) {
            None => {
                self.light.insert(time.to_bits(), value);
            }
            Some(existing) => {
                if existing.is_none() && value.is_some() {
                    *existing = value;
                }
            }
        }
    }

    fn row_mut(&mut self, sample: &str, time: f64, meta: Option<&SampleId>) -> &mut RowRecord {
        let key = (sample.to_string(), time.to_bits());
        if let Some(&idx) = self.index.get(&key) {
            return &mut self.rows[idx];
        }
        self.rows.push(RowRecord {
            sample: sample.to_string(),
            meta: meta.cloned(),
            time,
            values: HashMap::new(),
        });
        let idx = self.rows.len() - 1;
        self.index.insert(key, idx);
        &mut self.rows[idx]
    }
}

/// Build the Measurement Table from one or more source locations.
///
/// `prefix` is a regex stripped once from each file stem to obtain the
/// parameter column name; it defaults to `^all` (so `allnpq.txt` feeds the
/// `npq` column).
pub fn dataframe<P: AsRef<Path>>(paths: &[P], prefix: Option<&str>) -> Result<DataFrame> {
    dataframe_with_report(paths, prefix).map(|(df, _)| df)
}

/// Like [`dataframe`], additionally returning the per-file [`BuildReport`]
pub fn dataframe_with_report<P: AsRef<Path>>(
    paths: &[P],
    prefix: Option<&str>,
) -> Result<(DataFrame, BuildReport)> {
    if paths.is_empty() {
        return Err(PhenomicsError::configuration("Path not defined"));
    }

    let prefix_pattern = prefix.unwrap_or(DEFAULT_FILE_PREFIX);
    let prefix_re = Regex::new(prefix_pattern).map_err(|e| {
        PhenomicsError::configuration(format!("Invalid prefix pattern '{prefix_pattern}': {e}"))
    })?;

    let multiple = paths.len() > 1;
    let mut report = BuildReport::default();
    let mut frames = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(PhenomicsError::PathNotFound {
                path: path.to_path_buf(),
            });
        }

        let folder = multiple.then(|| path.to_string_lossy().to_string());
        let frame = assemble_location(path, &prefix_re, folder.as_deref(), &mut report)?;
        frames.push(frame);
    }

    let mut df = if frames.len() == 1 {
        frames.into_iter().next().expect("one frame")
    } else {
        concat_df_diagonal(&frames)?
    };

    cast_categories(&mut df)?;
    add_day_columns(&mut df)?;

    Ok((df, report))
}

/// Import every parameter file of one location into a single DataFrame
fn assemble_location(
    location: &Path,
    prefix_re: &Regex,
    folder: Option<&str>,
    report: &mut BuildReport,
) -> Result<DataFrame> {
    let mut table = LocationTable::default();

    for entry in WalkDir::new(location)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(DATA_FILE_EXTENSION) {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parameter = prefix_re.replace(&stem, "").to_string();

        let status = import_file(&mut table, path, &parameter);
        if let FileStatus::Skipped { reason } = &status {
            warn!("File \"{}\" skipped: {}", path.display(), reason);
        }
        report.files.push(FileReport {
            path: path.to_path_buf(),
            parameter,
            status,
        });
    }

    debug!(
        "Location {}: {} rows, {} parameter columns, {} light timepoints",
        location.display(),
        table.rows.len(),
        table.columns.len(),
        table.light.len()
    );

    materialize(table, folder)
}

/// Parse one parameter file into the location table.
///
/// Row- and cell-level anomalies degrade to missing values; only a file
/// that cannot be opened or read at all is skipped.
fn import_file(table: &mut LocationTable, path: &Path, parameter: &str) -> FileStatus {
    let mut reader = match csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
    {
        Ok(r) => r,
        Err(e) => {
            return FileStatus::Skipped {
                reason: format!("cannot open: {e}"),
            };
        }
    };

    let file_label = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let header_record = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            return FileStatus::Skipped {
                reason: format!("cannot read header: {e}"),
            };
        }
    };

    let Some(header) = FileHeader::parse(&header_record, &file_label) else {
        return FileStatus::Skipped {
            reason: "empty header row".to_string(),
        };
    };

    table.add_column(parameter);

    let mut rows = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("File \"{}\": bad record skipped: {}", file_label, e);
                continue;
            }
        };

        let Some(sample) = record.get(0) else {
            continue;
        };

        // Imaging artifacts, not real samples
        if sample.is_empty() || sample.starts_with('[') || sample.starts_with("null") {
            continue;
        }

        if sample == LIGHT_INTENSITY_SENTINEL {
            for (i, time) in header.times.iter().enumerate() {
                let Some(time) = time else { continue };
                let value = parse_cell(record.get(i + 1));
                table.record_light(*time, value);
            }
            continue;
        }

        let meta = match header.format {
            HeaderFormat::Current | HeaderFormat::Legacy => SampleId::decode(sample),
            HeaderFormat::NonStandard => None,
        };

        let mut contributed = false;
        for (i, time) in header.times.iter().enumerate() {
            let Some(time) = time else { continue };
            let Some(value) = parse_cell(record.get(i + 1)) else {
                // Non-numeric cell stays missing
                continue;
            };
            let row = table.row_mut(sample, *time, meta.as_ref());
            row.values.insert(parameter.to_string(), value);
            contributed = true;
        }
        if contributed {
            rows += 1;
        }
    }

    match header.format {
        HeaderFormat::NonStandard => FileStatus::Degraded {
            rows,
            reason: format!("non-standard identifier header '{}'", header.id_column),
        },
        _ => FileStatus::Imported { rows },
    }
}

/// Parse one data cell. The files write the literal `NaN` for a missing
/// cell, and Rust's float parser accepts it, so a NaN parse is a missing
/// value rather than a reading.
fn parse_cell(field: Option<&str>) -> Option<f64> {
    field
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

/// Turn the accumulated rows into a DataFrame, broadcast the light
/// side-table, drop all-missing columns and tag provenance
fn materialize(table: LocationTable, folder: Option<&str>) -> Result<DataFrame> {
    let n = table.rows.len();

    let mut sample_v: Vec<String> = Vec::with_capacity(n);
    let mut name_v: Vec<String> = Vec::with_capacity(n);
    let mut time_v: Vec<f64> = Vec::with_capacity(n);
    let mut light_v: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut position_v: Vec<Option<String>> = Vec::with_capacity(n);
    let mut flat_v: Vec<Option<String>> = Vec::with_capacity(n);
    let mut experiment_v: Vec<Option<String>> = Vec::with_capacity(n);
    let mut camera_v: Vec<Option<String>> = Vec::with_capacity(n);
    let mut replicate_v: Vec<Option<String>> = Vec::with_capacity(n);
    let mut param_vs: Vec<Vec<Option<f64>>> = table.columns.iter().map(|_| Vec::with_capacity(n)).collect();

    for row in &table.rows {
        sample_v.push(row.sample.clone());
        name_v.push(match &row.meta {
            Some(meta) => meta.name.clone(),
            None => row.sample.clone(),
        });
        time_v.push(row.time);
        light_v.push(table.light.get(&row.time.to_bits()).copied().flatten());
        position_v.push(row.meta.as_ref().map(|m| m.position.clone()));
        flat_v.push(row.meta.as_ref().map(|m| m.flat.clone()));
        experiment_v.push(row.meta.as_ref().map(|m| m.experiment.clone()));
        camera_v.push(row.meta.as_ref().map(|m| m.camera.clone()));
        replicate_v.push(row.meta.as_ref().map(|m| m.replicate.clone()));
        for (i, column) in table.columns.iter().enumerate() {
            param_vs[i].push(row.values.get(column).copied());
        }
    }

    let mut columns: Vec<Column> = vec![
        Column::new("sample".into(), sample_v),
        Column::new("name".into(), name_v),
        Column::new("time".into(), time_v),
        Column::new("light_intensity".into(), light_v),
    ];
    for (name, values) in table.columns.iter().zip(param_vs) {
        columns.push(Column::new(name.as_str().into(), values));
    }
    columns.push(Column::new("position".into(), position_v));
    columns.push(Column::new("flat".into(), flat_v));
    columns.push(Column::new("experiment".into(), experiment_v));
    columns.push(Column::new("camera".into(), camera_v));
    columns.push(Column::new("replicate".into(), replicate_v));
    if let Some(folder) = folder {
        columns.push(Column::new("folder".into(), vec![folder.to_string(); n]));
    }

    let mut df = DataFrame::new(columns)?;

    if df.height() > 0 {
        let empty: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.null_count() == c.len())
            .map(|c| c.name().to_string())
            .collect();
        for name in empty {
            df.drop_in_place(&name)?;
            info!("Empty column \"{}\" was dropped", name);
        }
    }

    Ok(df)
}

/// Cast the low-cardinality identity columns to categorical.
///
/// Lexical ordering keeps sorts identical to plain string sorts, which the
/// calculation engine's (sample, time) ordering relies on.
fn cast_categories(df: &mut DataFrame) -> Result<()> {
    for name in CATEGORY_COLUMNS {
        if crate::schema::has_column(df, name) {
            let cast = df
                .column(name)?
                .cast(&DataType::Categorical(None, CategoricalOrdering::Lexical))?;
            df.with_column(cast)?;
        }
    }
    Ok(())
}

/// Derive the `day` and `hours_day` bucketing columns from `time`.
///
/// `day = floor(time / 24) + 1`, so a time that is an exact multiple of 24
/// opens one more bucket than `ceil(max / 24)` would suggest. Downstream
/// consumers group on that exact boundary; do not special-case it.
fn add_day_columns(df: &mut DataFrame) -> Result<()> {
    if df.height() == 0 || !crate::schema::has_column(df, "time") {
        return Ok(());
    }

    let time = df.column("time")?.as_materialized_series().f64()?.clone();

    let day: Int32Chunked = (&time)
        .into_iter()
        .map(|t| t.map(|t| (t / HOURS_PER_DAY).floor() as i32 + 1))
        .collect();
    let hours_day: Float64Chunked = (&time)
        .into_iter()
        .map(|t| t.map(|t| t - (t / HOURS_PER_DAY).floor() * HOURS_PER_DAY))
        .collect();

    df.with_column(day.with_name("day".into()).into_series())?;
    df.with_column(hours_day.with_name("hours_day".into()).into_series())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_side_table_keeps_first_non_missing() {
        let mut table = LocationTable::default();
        table.record_light(1.5, Some(100.0));
        table.record_light(1.5, Some(200.0));
        assert_eq!(table.light[&1.5f64.to_bits()], Some(100.0));
    }

    #[test]
    fn light_side_table_fills_missing_placeholder() {
        let mut table = LocationTable::default();
        table.record_light(2.5, None);
        table.record_light(2.5, Some(50.0));
        assert_eq!(table.light[&2.5f64.to_bits()], Some(50.0));
        // And stays at the first non-missing value afterwards
        table.record_light(2.5, Some(75.0));
        assert_eq!(table.light[&2.5f64.to_bits()], Some(50.0));
    }

    #[test]
    fn nan_text_parses_as_missing() {
        assert_eq!(parse_cell(Some("0.5")), Some(0.5));
        assert_eq!(parse_cell(Some(" 0.5 ")), Some(0.5));
        assert_eq!(parse_cell(Some("NaN")), None);
        assert_eq!(parse_cell(Some("nan")), None);
        assert_eq!(parse_cell(Some("garbage")), None);
        assert_eq!(parse_cell(None), None);
    }

    #[test]
    fn rows_are_created_once_per_sample_time() {
        let mut table = LocationTable::default();
        let meta = SampleId::decode("a[p][f][e][c][r]");
        table
            .row_mut("a[p][f][e][c][r]", 0.5, meta.as_ref())
            .values
            .insert("npq".to_string(), 1.0);
        table
            .row_mut("a[p][f][e][c][r]", 0.5, meta.as_ref())
            .values
            .insert("phi2".to_string(), 2.0);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values.len(), 2);
    }

    #[test]
    fn day_bucket_formula() {
        let mut df = DataFrame::new(vec![Column::new(
            "time".into(),
            vec![0.0, 12.0, 23.99, 24.0, 47.5, 48.0],
        )])
        .unwrap();
        add_day_columns(&mut df).unwrap();

        let day = df.column("day").unwrap().as_materialized_series().i32().unwrap().clone();
        let days: Vec<i32> = (&day).into_iter().map(|d| d.unwrap()).collect();
        // Exact multiples of 24 open a fresh bucket
        assert_eq!(days, vec![1, 1, 1, 2, 2, 3]);

        let hours = df
            .column("hours_day")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .clone();
        let hours: Vec<f64> = (&hours).into_iter().map(|h| h.unwrap()).collect();
        assert_eq!(hours[3], 0.0);
        assert!((hours[4] - 23.5).abs() < 1e-9);
    }

    #[test]
    fn empty_paths_is_a_configuration_error() {
        let paths: Vec<&Path> = vec![];
        let err = dataframe(&paths, None).unwrap_err();
        assert!(matches!(err, PhenomicsError::Configuration { .. }));
    }

    #[test]
    fn missing_location_is_a_path_error() {
        let err = dataframe(&[Path::new("/no/such/place")], None).unwrap_err();
        assert!(matches!(err, PhenomicsError::PathNotFound { .. }));
    }
}
