//! Display labels for table columns.
//!
//! Maps column names to formatted (LaTeX) strings for plot axes and
//! legends. The map is immutable; callers merge their own overrides per
//! lookup instead of mutating shared state.

use std::collections::HashMap;
use std::sync::LazyLock;

static LABELS_FORMATTED: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("f0", r"$F_{0}$"),
        ("fm", r"$F_{M}$"),
        ("fmp", r"$F_{M}'$"),
        ("fmpp", r"$F_{M}''$"),
        ("fmt", r"$F_{Mt}$"),
        ("fs", r"$F_{S}$"),
        ("fvfm", r"$\frac{F_{V}}{F_{M}}$"),
        (
            "light_intensity",
            r"PAR [$\mu mol$ $photons \times m^{-2} \times s^{-1}$]",
        ),
        ("name", "Strain"),
        ("npq", r"$NPQ$"),
        ("npqt", r"$NPQ_{t}$"),
        ("phi2", r"$\Phi_{II}$"),
        ("phino", r"$\Phi_{NO}$"),
        ("phinot", r"$\Phi_{NOt}$"),
        ("phinpq", r"$\Phi_{NPQ}$"),
        ("phinpqt", r"$\Phi_{NPQt}$"),
        ("qe", r"$q_{E}$"),
        ("qesv", r"$q_{ESV}$"),
        ("qet", r"$q_{Et}$"),
        ("qi", r"$q_{I}$"),
        ("qit", r"$q_{It}$"),
        ("ql", r"$q_{L}$"),
        ("qlt", r"$q_{Lt}$"),
        ("time", r"Time [h]"),
    ])
});

/// Formatted label for a column name.
///
/// Caller overrides win over the built-in map; an unknown name is returned
/// unchanged.
pub fn label(param: &str, additional: &HashMap<String, String>) -> String {
    if let Some(custom) = additional.get(param) {
        return custom.clone();
    }
    LABELS_FORMATTED
        .get(param)
        .map(|s| s.to_string())
        .unwrap_or_else(|| param.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_are_formatted() {
        assert_eq!(label("phi2", &HashMap::new()), r"$\Phi_{II}$");
        assert_eq!(label("name", &HashMap::new()), "Strain");
    }

    #[test]
    fn overrides_take_precedence() {
        let mut extra = HashMap::new();
        extra.insert("phi2".to_string(), "Phi II".to_string());
        extra.insert("custom".to_string(), "My Column".to_string());
        assert_eq!(label("phi2", &extra), "Phi II");
        assert_eq!(label("custom", &extra), "My Column");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(label("mystery", &HashMap::new()), "mystery");
    }
}
