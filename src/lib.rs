//! Visual Phenomics data processing
//!
//! A Rust library for importing tab-delimited instrument output from the
//! DEPI / Visual Phenomics plant-phenotyping platform into a tidy polars
//! DataFrame and deriving photosynthesis-efficiency parameters from it.
//!
//! This library provides tools for:
//! - Parsing per-parameter text files across the current and legacy header
//!   formats, with graceful degradation for non-standard files
//! - Decoding the bracketed sample-identifier grammar into typed metadata
//! - Reconciling the `*light_intensity` side channel onto every row
//! - Calculating a catalogue of fluorescence parameters with explicit
//!   column-dependency validation and forward-filled baselines
//! - Persisting the assembled table to a compressed parquet cache
//! - Exporting columns back to the original text format

pub mod about;
pub mod builder;
pub mod calculate;
pub mod catalogue;
pub mod constants;
pub mod error;
pub mod export;
pub mod header;
pub mod labels;
pub mod parameters;
pub mod parameters_additional;
pub mod sample;
pub mod schema;
pub mod store;
pub mod timeline;

pub use builder::{BuildReport, FileReport, FileStatus, dataframe, dataframe_with_report};
pub use calculate::{CalcRequest, calculate, calculate_custom, calculate_with};
pub use catalogue::CalcOptions;
pub use error::{PhenomicsError, Result};
pub use export::to_txt;
pub use labels::label;
pub use sample::SampleId;
pub use store::{Compression, load, save};
pub use timeline::{Protocol, protocol_std_timing, vp_file_header};
