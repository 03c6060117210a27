use crate::model::{ParamSample, ParamSet};

/// Smallest mitigation effort `ξ·T` for which the spending share is computed.
///
/// Below it the penalty term `1/(ξ·T)` diverges and the share is 0.
pub const MIN_MITIGATION_EFFORT: f64 = 1e-12;

/// Approximate optimal spending share of one parameter set.
///
/// Evaluates the linear approximation
/// `s = φ·δ₀·β·V − 1/(ξ·T)` with `β = 0.99^T` and clips it to `[0, 1]`.
pub fn score(params: &ParamSet) -> f64 {
    let effort = params.xi * params.period;
    if effort.is_nan() || effort < MIN_MITIGATION_EFFORT {
        return 0.0;
    }

    let s_raw = params.phi * params.delta0 * params.beta() * params.value_of_life - 1.0 / effort;
    if s_raw.is_nan() {
        return 0.0;
    }
    s_raw.clamp(0.0, 1.0)
}

/// Spending shares of every trial of a sample.
pub fn score_sample(sample: &ParamSample) -> Vec<f64> {
    sample.iter().map(|params| score(&params)).collect()
}
