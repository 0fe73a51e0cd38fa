//! Measurement timing for standard DEPI protocols.
//!
//! Generates the per-day measurement times the imaging platform uses, for
//! building test fixtures or simulating acquisition schedules, plus the
//! matching output-file header string.

use std::str::FromStr;

use crate::constants::SAMPLE_HEADER;
use crate::error::{PhenomicsError, Result};

/// Measurement dip applied to every second fluctuating-light timepoint,
/// in hours
const FLUCTUATING_DIP: f64 = 0.0833;

/// Standard DEPI measurement protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// One measurement at the start of the day
    Dark,
    /// One measurement per hour
    Flat,
    /// Two measurements per hour
    Sinusoidal,
    /// Four measurements per hour, every second one pulled back slightly
    Fluctuating,
}

impl FromStr for Protocol {
    type Err = PhenomicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Protocol::Dark),
            "flat" => Ok(Protocol::Flat),
            "sinusoidal" => Ok(Protocol::Sinusoidal),
            "fluctuating" => Ok(Protocol::Fluctuating),
            _ => Err(PhenomicsError::UnknownProtocol {
                name: s.to_string(),
            }),
        }
    }
}

/// Measurement times in hours for one day of a standard protocol.
///
/// `offset` shifts the whole day (e.g. to day 3 of an experiment), `hours`
/// is the measured span of the day.
pub fn protocol_std_timing(offset: f64, hours: u32, protocol: Protocol) -> Vec<f64> {
    match protocol {
        Protocol::Dark => vec![offset],
        Protocol::Flat => (0..hours).map(|i| i as f64 + offset).collect(),
        Protocol::Sinusoidal => (0..hours * 2).map(|i| i as f64 * 0.5 + offset).collect(),
        Protocol::Fluctuating => (0..hours * 4)
            .map(|i| {
                let t = i as f64 * 0.25;
                if i % 2 == 1 {
                    t - FLUCTUATING_DIP + offset
                } else {
                    t + offset
                }
            })
            .collect(),
    }
}

/// Header string for a Visual Phenomics output file with these timepoints.
///
/// `init_col` prepends the identifier-column header.
pub fn vp_file_header(timing: &[f64], init_col: bool) -> String {
    let times = timing
        .iter()
        .map(|t| format!("{t:.3}"))
        .collect::<Vec<_>>()
        .join("  ");

    if init_col {
        format!("{SAMPLE_HEADER} {times}")
    } else {
        times
    }
}
