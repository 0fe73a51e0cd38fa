//! Input-file header schema detection.
//!
//! Visual Phenomics wrote two identifier-column headers over the years, and
//! third-party exports sometimes carry neither. The first header field
//! decides which grammar is in effect; the remaining fields are measurement
//! times in hours.

use csv::StringRecord;
use tracing::warn;

use crate::constants::{SAMPLE_HEADER, SAMPLE_HEADER_LEGACY};

/// Which identifier-column grammar a file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFormat {
    /// `name[position][flat][experiment][camera][replicate]`
    Current,
    /// `name[flat][experiment][camera][replicate]`
    Legacy,
    /// Anything else; imported without metadata columns
    NonStandard,
}

impl HeaderFormat {
    pub fn detect(first_field: &str) -> HeaderFormat {
        if first_field == SAMPLE_HEADER {
            HeaderFormat::Current
        } else if first_field == SAMPLE_HEADER_LEGACY {
            HeaderFormat::Legacy
        } else {
            HeaderFormat::NonStandard
        }
    }
}

/// Parsed header row of a parameter file
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub format: HeaderFormat,
    /// Literal text of the identifier column (useful for non-standard files)
    pub id_column: String,
    /// Time in hours per data column, `None` where the header field did not
    /// parse as a number (that column is skipped during import)
    pub times: Vec<Option<f64>>,
}

impl FileHeader {
    /// Interpret a CSV header record.
    ///
    /// Returns `None` for an empty header row.
    pub fn parse(record: &StringRecord, file_label: &str) -> Option<FileHeader> {
        let first = record.get(0)?;
        let format = HeaderFormat::detect(first);

        if format == HeaderFormat::NonStandard {
            warn!(
                "File \"{}\" has a non-standard format, importing without sample metadata",
                file_label
            );
        }

        let times = record
            .iter()
            .skip(1)
            .map(|field| match field.trim().parse::<f64>() {
                Ok(t) => Some(t),
                Err(_) => {
                    warn!(
                        "File \"{}\": header field '{}' is not a time value, column skipped",
                        file_label, field
                    );
                    None
                }
            })
            .collect();

        Some(FileHeader {
            format,
            id_column: first.to_string(),
            times,
        })
    }
}
