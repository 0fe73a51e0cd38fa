//! Application constants for Visual Phenomics data processing
//!
//! This module contains the file-format literals, sentinel values and
//! default formula constants used throughout the crate.

// =============================================================================
// Input File Format
// =============================================================================

/// Identifier-column header written by current Visual Phenomics releases
pub const SAMPLE_HEADER: &str = "name[position][flat][experiment][camera][replicate]";

/// Identifier-column header of the legacy format (no position field)
pub const SAMPLE_HEADER_LEGACY: &str = "name[flat][experiment][camera][replicate]";

/// Row sentinel marking the light-intensity side channel
pub const LIGHT_INTENSITY_SENTINEL: &str = "*light_intensity";

/// Sentinel stored when a sample carries no position field
pub const POSITION_NA: &str = "n/a";

/// Extension of the per-parameter data files
pub const DATA_FILE_EXTENSION: &str = "txt";

/// Default regex stripped once from a file stem to obtain the parameter name
pub const DEFAULT_FILE_PREFIX: &str = "^all";

/// Text written for a missing cell on export
pub const MISSING_VALUE_TEXT: &str = "NaN";

// =============================================================================
// Measurement Table Columns
// =============================================================================

/// Metadata columns that identify a row rather than carry a measurement.
/// These are never exported as parameter files.
pub const RESERVED_COLUMNS: &[&str] = &[
    "sample",
    "name",
    "position",
    "flat",
    "experiment",
    "camera",
    "replicate",
    "time",
    "light_intensity",
    "folder",
    "day",
    "hours_day",
];

/// Columns cast to the categorical dtype after assembly (low cardinality)
pub const CATEGORY_COLUMNS: &[&str] = &[
    "name",
    "sample",
    "position",
    "flat",
    "experiment",
    "camera",
    "replicate",
    "folder",
];

/// Length of a day bucket in hours
pub const HOURS_PER_DAY: f64 = 24.0;

// =============================================================================
// Cache
// =============================================================================

/// File stem of the persisted Measurement Table inside a cache directory
pub const CACHE_FILE_STEM: &str = "dataframe";

// =============================================================================
// Formula Constants
// =============================================================================

/// Default Fv/Fm ratio used by the NPQt family of formulas
pub const FM_F0_RATIO: f64 = 4.88;

/// Default optimum PhiNO
pub const PHINO_OPT: f64 = 0.2;

/// Default leaf absorptivity
pub const ABSORPTIVITY: f64 = 0.5;
