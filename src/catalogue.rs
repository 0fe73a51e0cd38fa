//! Parameter catalogue for the calculation engine.
//!
//! Maps a parameter name to the columns it reads and the formula that
//! evaluates it, so validation and dispatch are a single lookup instead of
//! a chain of name comparisons. The standard catalogue covers parameters
//! derived from raw fluorescence readings; the additional catalogue covers
//! parameters derived from other calculated parameters.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::constants::{ABSORPTIVITY, FM_F0_RATIO, PHINO_OPT};
use crate::parameters as p;
use crate::parameters_additional as pa;

/// Formula constants that a caller may override per calculation
#[derive(Debug, Clone, Copy)]
pub struct CalcOptions {
    /// Assumed Fv/Fm ratio for the NPQt family
    pub fmf0: f64,
    /// Optimum PhiNO
    pub phino_opt: f64,
    /// Leaf absorptivity
    pub absorptivity: f64,
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            fmf0: FM_F0_RATIO,
            phino_opt: PHINO_OPT,
            absorptivity: ABSORPTIVITY,
        }
    }
}

/// One catalogue entry: which columns a parameter needs and how to compute
/// it from one row's values (passed in `inputs` order).
pub struct ParameterSpec {
    /// Logical input names; each doubles as the default column name
    pub inputs: &'static [&'static str],
    /// Inputs whose columns are forward-filled before evaluation
    pub fill: &'static [&'static str],
    pub eval: fn(&[f64], &CalcOptions) -> f64,
}

/// Parameters computed from raw fluorescence readings.
///
/// `fm` and `f0` are dark-measured baselines that should not vary across
/// typical analysis gaps, so they are the only forward-filled inputs.
pub static STANDARD: LazyLock<HashMap<&'static str, ParameterSpec>> = LazyLock::new(|| {
    let mut m: HashMap<&'static str, ParameterSpec> = HashMap::new();
    m.insert(
        "fvfm",
        ParameterSpec {
            inputs: &["fm", "f0"],
            fill: &["fm", "f0"],
            eval: |v, _| p::fvfm(v[0], v[1]),
        },
    );
    m.insert(
        "npq",
        ParameterSpec {
            inputs: &["fm", "fmp"],
            fill: &["fm"],
            eval: |v, _| p::npq(v[0], v[1]),
        },
    );
    m.insert(
        "npqt",
        ParameterSpec {
            inputs: &["fmp", "f0p"],
            fill: &[],
            eval: |v, o| p::npqt(v[0], v[1], o.fmf0),
        },
    );
    m.insert(
        "phi2",
        ParameterSpec {
            inputs: &["fmp", "fs"],
            fill: &[],
            eval: |v, _| p::phi2(v[0], v[1]),
        },
    );
    m.insert(
        "phino",
        ParameterSpec {
            inputs: &["fmp", "fs", "f0p", "fm", "f0"],
            fill: &["fm", "f0"],
            eval: |v, _| p::phino(v[0], v[1], v[2], v[3], v[4]),
        },
    );
    m.insert(
        "phinot",
        ParameterSpec {
            inputs: &["fmp", "fs", "f0p"],
            fill: &[],
            eval: |v, o| p::phinot(v[0], v[1], v[2], o.fmf0),
        },
    );
    m.insert(
        "phinpq",
        ParameterSpec {
            inputs: &["fmp", "fs", "f0p", "fm", "f0"],
            fill: &["fm", "f0"],
            eval: |v, _| p::phinpq(v[0], v[1], v[2], v[3], v[4]),
        },
    );
    m.insert(
        "phinpqt",
        ParameterSpec {
            inputs: &["fmp", "fs", "f0p"],
            fill: &[],
            eval: |v, o| p::phinpqt(v[0], v[1], v[2], o.fmf0),
        },
    );
    m.insert(
        "qe",
        ParameterSpec {
            inputs: &["fmpp", "fmp"],
            fill: &[],
            eval: |v, _| p::qe(v[0], v[1]),
        },
    );
    m.insert(
        "qesv",
        ParameterSpec {
            inputs: &["fm", "fmp", "fmpp"],
            fill: &["fm"],
            eval: |v, _| p::qesv(v[0], v[1], v[2]),
        },
    );
    m.insert(
        "qet",
        ParameterSpec {
            inputs: &["fmp", "f0p", "fmpp", "f0pp"],
            fill: &[],
            eval: |v, o| p::qet(v[0], v[1], v[2], v[3], o.fmf0),
        },
    );
    m.insert(
        "qi",
        ParameterSpec {
            inputs: &["fm", "fmpp"],
            fill: &["fm"],
            eval: |v, _| p::qi(v[0], v[1]),
        },
    );
    m.insert(
        "qit",
        ParameterSpec {
            inputs: &["fmpp", "f0pp"],
            fill: &[],
            eval: |v, o| p::qit(v[0], v[1], o.fmf0),
        },
    );
    m.insert(
        "ql",
        ParameterSpec {
            inputs: &["fmp", "fs", "f0p"],
            fill: &[],
            eval: |v, _| p::ql(v[0], v[1], v[2]),
        },
    );
    m.insert(
        "qp",
        ParameterSpec {
            inputs: &["fmp", "fs", "f0p"],
            fill: &[],
            eval: |v, _| p::qp(v[0], v[1], v[2]),
        },
    );
    m
});

/// Parameters computed from previously calculated parameters
pub static ADDITIONAL: LazyLock<HashMap<&'static str, ParameterSpec>> = LazyLock::new(|| {
    let mut m: HashMap<&'static str, ParameterSpec> = HashMap::new();
    m.insert(
        "lef",
        ParameterSpec {
            inputs: &["phi2", "light_intensity"],
            fill: &[],
            eval: |v, o| pa::lef(v[0], v[1], o.absorptivity),
        },
    );
    m.insert(
        "vx",
        ParameterSpec {
            inputs: &["phinot", "ql"],
            fill: &[],
            eval: |v, o| pa::vx(v[0], v[1], o.absorptivity),
        },
    );
    m.insert(
        "sphi2",
        ParameterSpec {
            inputs: &["phi2", "phinot", "ql"],
            fill: &[],
            eval: |v, o| pa::sphi2(v[0], v[1], v[2], o.phino_opt, o.fmf0),
        },
    );
    m.insert(
        "sphinpq",
        ParameterSpec {
            inputs: &["phi2", "phinot", "ql"],
            fill: &[],
            eval: |v, o| pa::sphinpq(v[0], v[1], v[2], o.phino_opt, o.fmf0),
        },
    );
    m.insert(
        "deltanpq",
        ParameterSpec {
            inputs: &["phino"],
            fill: &[],
            eval: |v, o| pa::deltanpq(v[0], o.phino_opt),
        },
    );
    m
});

/// Look up a parameter in either catalogue
pub fn lookup(name: &str) -> Option<&'static ParameterSpec> {
    STANDARD.get(name).or_else(|| ADDITIONAL.get(name))
}

/// All known parameter names, sorted, for error messages
pub fn known_parameters() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = STANDARD.keys().chain(ADDITIONAL.keys()).copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_standard_fill_column_is_an_input() {
        for (name, spec) in STANDARD.iter() {
            for fill in spec.fill {
                assert!(
                    spec.inputs.contains(fill),
                    "{} fills '{}' which is not an input",
                    name,
                    fill
                );
            }
        }
    }

    #[test]
    fn only_dark_baselines_are_filled() {
        for spec in STANDARD.values() {
            for fill in spec.fill {
                assert!(*fill == "fm" || *fill == "f0");
            }
        }
        for spec in ADDITIONAL.values() {
            assert!(spec.fill.is_empty());
        }
    }

    #[test]
    fn lookup_spans_both_catalogues() {
        assert!(lookup("npq").is_some());
        assert!(lookup("lef").is_some());
        assert!(lookup("bogus").is_none());
    }

    #[test]
    fn known_parameters_is_sorted_and_complete() {
        let names = known_parameters();
        assert_eq!(names.len(), STANDARD.len() + ADDITIONAL.len());
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn eval_matches_formula_library() {
        let opts = CalcOptions::default();
        let spec = STANDARD.get("fvfm").unwrap();
        assert_eq!((spec.eval)(&[1.0, 0.2], &opts), 0.8);
        let spec = STANDARD.get("phi2").unwrap();
        assert_eq!((spec.eval)(&[0.8, 0.3], &opts), 0.625);
    }
}
