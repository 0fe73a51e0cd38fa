//! Additional fluorescence parameters.
//!
//! These build on the standard parameters rather than on raw fluorescence
//! readings, so they are only meaningful once the standard columns have
//! been calculated (or imported).

/// LEF = phi2 * absorptivity * par
///
/// `par` is the light intensity in µE·s⁻¹·m⁻².
pub fn lef(phi2: f64, par: f64, absorptivity: f64) -> f64 {
    phi2 * absorptivity * par
}

/// Vx = phinot * absorptivity * (1 - ql)
pub fn vx(phinot: f64, ql: f64, absorptivity: f64) -> f64 {
    phinot * absorptivity * (1.0 - ql)
}

/// S~Phi2 = phi2 / (1 + phi2 * (1/phinoopt - 1/phinot) / (ql * fmf0))
pub fn sphi2(phi2: f64, phinot: f64, ql: f64, phinoopt: f64, fmf0: f64) -> f64 {
    phi2 / (1.0 + phi2 * (1.0 / phinoopt - 1.0 / phinot) / (ql * fmf0))
}

/// S~PhiNPQ = 1 - (sphi2 + phinoopt)
pub fn sphinpq(phi2: f64, phinot: f64, ql: f64, phinoopt: f64, fmf0: f64) -> f64 {
    1.0 - (sphi2(phi2, phinot, ql, phinoopt, fmf0) + phinoopt)
}

/// deltaNPQ = (1/phinoopt) - (1/phino)
pub fn deltanpq(phino: f64, phinoopt: f64) -> f64 {
    (1.0 / phinoopt) - (1.0 / phino)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ABSORPTIVITY, FM_F0_RATIO, PHINO_OPT};

    #[test]
    fn lef_scales_with_light() {
        assert_eq!(lef(0.6, 100.0, ABSORPTIVITY), 30.0);
    }

    #[test]
    fn vx_reference() {
        assert!((vx(0.2, 0.5, ABSORPTIVITY) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn sphinpq_complements_sphi2() {
        let (phi2, phinot, ql) = (0.6, 0.25, 0.5);
        let s2 = sphi2(phi2, phinot, ql, PHINO_OPT, FM_F0_RATIO);
        let snpq = sphinpq(phi2, phinot, ql, PHINO_OPT, FM_F0_RATIO);
        assert!((s2 + snpq + PHINO_OPT - 1.0).abs() < 1e-12);
    }

    #[test]
    fn deltanpq_zero_at_optimum() {
        assert!((deltanpq(PHINO_OPT, PHINO_OPT)).abs() < 1e-12);
    }
}
