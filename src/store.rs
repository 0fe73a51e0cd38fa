//! Cache persistence for the assembled Measurement Table.
//!
//! Saving writes a single `dataframe.parquet` into a target directory so an
//! experiment does not need re-importing and re-calculating. The
//! compression scheme is selected by name; parquet is self-describing, so
//! loading only needs the file path.

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;
use tracing::info;

use crate::constants::CACHE_FILE_STEM;
use crate::error::{PhenomicsError, Result};

/// Supported cache compression schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Deflate-family default ("zip"), mapped to gzip
    #[default]
    Zip,
    Zstd,
    Snappy,
    Lz4,
    Uncompressed,
}

impl FromStr for Compression {
    type Err = PhenomicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "zip" | "gzip" => Ok(Compression::Zip),
            "zstd" => Ok(Compression::Zstd),
            "snappy" => Ok(Compression::Snappy),
            "lz4" => Ok(Compression::Lz4),
            "uncompressed" | "none" => Ok(Compression::Uncompressed),
            _ => Err(PhenomicsError::UnknownCompression {
                name: s.to_string(),
            }),
        }
    }
}

impl Compression {
    fn to_parquet(self) -> ParquetCompression {
        match self {
            Compression::Zip => ParquetCompression::Gzip(None),
            Compression::Zstd => ParquetCompression::Zstd(None),
            Compression::Snappy => ParquetCompression::Snappy,
            Compression::Lz4 => ParquetCompression::Lz4Raw,
            Compression::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Save the table as `dataframe.parquet` inside `dir`, creating the
/// directory when needed. Returns the written path.
pub fn save(df: &DataFrame, dir: &Path, compression: Compression) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{CACHE_FILE_STEM}.parquet"));

    let file = File::create(&path)?;
    let mut out = df.clone();
    ParquetWriter::new(file)
        .with_compression(compression.to_parquet())
        .finish(&mut out)?;

    info!(
        "Saved {} rows to {} ({:?})",
        df.height(),
        path.display(),
        compression
    );
    Ok(path)
}

/// Read a previously saved table back from `path`
pub fn load(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PhenomicsError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_names() {
        assert_eq!("zip".parse::<Compression>().unwrap(), Compression::Zip);
        assert_eq!("gzip".parse::<Compression>().unwrap(), Compression::Zip);
        assert_eq!("ZSTD".parse::<Compression>().unwrap(), Compression::Zstd);
        assert!(matches!(
            "brotli".parse::<Compression>(),
            Err(PhenomicsError::UnknownCompression { .. })
        ));
    }

    #[test]
    fn load_of_missing_path_fails() {
        let err = load(Path::new("/no/such/dataframe.parquet")).unwrap_err();
        assert!(matches!(err, PhenomicsError::PathNotFound { .. }));
    }
}
