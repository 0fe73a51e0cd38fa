//! Chlorophyll fluorescence parameter formulas.
//!
//! Stateless closed-form functions over base fluorescence readings.
//! Inputs are plain floats; no missing-value handling happens here, so a
//! zero denominator follows IEEE semantics (±inf, or NaN for 0/0) and
//! propagates into the table.

/// Fv/Fm = (fm - f0) / fm
pub fn fvfm(fm: f64, f0: f64) -> f64 {
    (fm - f0) / fm
}

/// NPQ = (fm - fmp) / fmp
pub fn npq(fm: f64, fmp: f64) -> f64 {
    (fm - fmp) / fmp
}

/// NPQt = (fmf0 / ((fmp / f0p) - 1)) - 1
///
/// `fmf0` is the assumed Fv/Fm ratio, 4.88 by default.
pub fn npqt(fmp: f64, f0p: f64, fmf0: f64) -> f64 {
    (fmf0 / ((fmp / f0p) - 1.0)) - 1.0
}

/// Phi2 = (fmp - fs) / fmp
pub fn phi2(fmp: f64, fs: f64) -> f64 {
    (fmp - fs) / fmp
}

/// PhiNO = 1 / (npq + 1 + ql * ((fm / f0) - 1))
pub fn phino(fmp: f64, fs: f64, f0p: f64, fm: f64, f0: f64) -> f64 {
    let ql_val = ql(fmp, fs, f0p);
    let npq_val = npq(fm, fmp);
    1.0 / (npq_val + 1.0 + ql_val * ((fm / f0) - 1.0))
}

/// PhiNOt = 1 / (npqt + 1 + ql * fmf0)
pub fn phinot(fmp: f64, fs: f64, f0p: f64, fmf0: f64) -> f64 {
    let ql_val = ql(fmp, fs, f0p);
    let npqt_val = npqt(fmp, f0p, fmf0);
    1.0 / (npqt_val + 1.0 + ql_val * fmf0)
}

/// PhiNPQ = 1 - (phi2 + phino)
pub fn phinpq(fmp: f64, fs: f64, f0p: f64, fm: f64, f0: f64) -> f64 {
    1.0 - (phi2(fmp, fs) + phino(fmp, fs, f0p, fm, f0))
}

/// PhiNPQt = 1 - (phi2 + phinot)
pub fn phinpqt(fmp: f64, fs: f64, f0p: f64, fmf0: f64) -> f64 {
    1.0 - (phi2(fmp, fs) + phinot(fmp, fs, f0p, fmf0))
}

/// qE = (fmpp - fmp) / fmp
pub fn qe(fmpp: f64, fmp: f64) -> f64 {
    (fmpp - fmp) / fmp
}

/// qEsv = (fm / fmp) - (fm / fmpp)
pub fn qesv(fm: f64, fmp: f64, fmpp: f64) -> f64 {
    (fm / fmp) - (fm / fmpp)
}

/// qEt = npqt - qit
pub fn qet(fmp: f64, f0p: f64, fmpp: f64, f0pp: f64, fmf0: f64) -> f64 {
    npqt(fmp, f0p, fmf0) - qit(fmpp, f0pp, fmf0)
}

/// qI = (fm - fmpp) / fmpp
pub fn qi(fm: f64, fmpp: f64) -> f64 {
    (fm - fmpp) / fmpp
}

/// qIt = (fmf0 / ((fmpp / f0pp) - 1)) - 1
pub fn qit(fmpp: f64, f0pp: f64, fmf0: f64) -> f64 {
    (fmf0 / ((fmpp / f0pp) - 1.0)) - 1.0
}

/// qL = ((fmp - fs) / (fmp - f0p)) * (f0p / fs)
pub fn ql(fmp: f64, fs: f64, f0p: f64) -> f64 {
    ((fmp - fs) / (fmp - f0p)) * (f0p / fs)
}

/// qP = (fmp - fs) / (fmp - f0p)
pub fn qp(fmp: f64, fs: f64, f0p: f64) -> f64 {
    (fmp - fs) / (fmp - f0p)
}
