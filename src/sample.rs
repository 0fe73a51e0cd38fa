//! Sample identifier codec.
//!
//! Visual Phenomics encodes sample metadata into the identifier column as
//! `name[position][flat][experiment][camera][replicate]`. Legacy files omit
//! the position field. This module decodes that grammar into typed fields
//! and reconstructs the identifier for export.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::constants::POSITION_NA;

static BRACKET_FIELDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("bracket field regex is valid"));

/// Decoded sample metadata.
///
/// `position` holds `"n/a"` when the source identifier had no position
/// field (legacy four-field format) or an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleId {
    pub name: String,
    pub position: String,
    pub flat: String,
    pub experiment: String,
    pub camera: String,
    pub replicate: String,
}

impl SampleId {
    /// Decode a raw identifier string.
    ///
    /// Returns `None` when the string does not follow the bracketed-metadata
    /// grammar (no bracket fields at all, or too few to identify a sample).
    /// Callers fall back to a degenerate record in that case.
    pub fn decode(sample: &str) -> Option<SampleId> {
        let mut fields: Vec<String> = BRACKET_FIELDS
            .captures_iter(sample)
            .map(|c| c[1].to_string())
            .collect();

        if fields.is_empty() {
            return None;
        }

        // Some samples miss the position field entirely (legacy format)
        if fields.len() == 4 {
            fields.insert(0, POSITION_NA.to_string());
        }

        if fields.len() < 5 {
            warn!(
                "Sample identifier '{}' has only {} metadata field(s), expected 5",
                sample,
                fields.len()
            );
            return None;
        }

        if fields[0].is_empty() {
            fields[0] = POSITION_NA.to_string();
        }

        let name = sample.split('[').next().unwrap_or_default().to_string();
        let mut it = fields.into_iter();

        Some(SampleId {
            name,
            position: it.next().unwrap_or_default(),
            flat: it.next().unwrap_or_default(),
            experiment: it.next().unwrap_or_default(),
            camera: it.next().unwrap_or_default(),
            replicate: it.next().unwrap_or_default(),
        })
    }

    /// Reconstruct the encoded identifier string
    pub fn encode(&self) -> String {
        format!(
            "{}[{}][{}][{}][{}][{}]",
            self.name, self.position, self.flat, self.experiment, self.camera, self.replicate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_current_format() {
        let id = SampleId::decode("StrainA[pos1][flat2][exp3][cam1][rep2]").unwrap();
        assert_eq!(id.name, "StrainA");
        assert_eq!(id.position, "pos1");
        assert_eq!(id.flat, "flat2");
        assert_eq!(id.experiment, "exp3");
        assert_eq!(id.camera, "cam1");
        assert_eq!(id.replicate, "rep2");
    }

    #[test]
    fn decode_legacy_format_inserts_position_sentinel() {
        let id = SampleId::decode("col-0[f1][e2][c3][r4]").unwrap();
        assert_eq!(id.position, "n/a");
        assert_eq!(id.flat, "f1");
        assert_eq!(id.replicate, "r4");
    }

    #[test]
    fn decode_empty_position_becomes_sentinel() {
        let id = SampleId::decode("col-0[][f1][e2][c3][r4]").unwrap();
        assert_eq!(id.position, "n/a");
    }

    #[test]
    fn decode_without_brackets_fails() {
        assert_eq!(SampleId::decode("just_a_name"), None);
    }

    #[test]
    fn decode_with_too_few_fields_fails() {
        assert_eq!(SampleId::decode("name[a][b]"), None);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let raw = "StrainA[pos1][flat2][exp3][cam1][rep2]";
        let id = SampleId::decode(raw).unwrap();
        assert_eq!(id.encode(), raw);
    }
}
