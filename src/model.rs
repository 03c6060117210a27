//! Model data types.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Discount factor per year.
pub const ANNUAL_DISCOUNT: f64 = 0.99;

/// Single set of model parameters.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ParamSet {
    /// Baseline extinction risk per period (`δ₀`).
    pub delta0: f64,
    /// Fraction of the risk that can be mitigated (`φ`).
    pub phi: f64,
    /// Mitigation effectiveness (`ξ`).
    pub xi: f64,
    /// Value of life (`V`).
    pub value_of_life: f64,
    /// Period length (`T`).
    pub period: f64,
}

impl ParamSet {
    /// Baseline calibration: `δ₀ = 1%`, `φ = 0.5`, `ξ = 0.5`, `V = 180`, `T = 10`.
    pub fn baseline() -> Self {
        Self {
            delta0: 0.01,
            phi: 0.5,
            xi: 0.5,
            value_of_life: 180.0,
            period: 10.0,
        }
    }

    /// Discount factor over one period, `β = 0.99^T`.
    pub fn beta(&self) -> f64 {
        ANNUAL_DISCOUNT.powf(self.period)
    }

    /// Check that every parameter is finite and non-negative,
    /// and that `δ₀` and `φ` are probabilities.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("delta0", self.delta0),
            ("phi", self.phi),
            ("xi", self.xi),
            ("value_of_life", self.value_of_life),
            ("period", self.period),
        ];
        for (name, val) in fields {
            if !val.is_finite() || val < 0.0 {
                bail!("{name} must be finite and non-negative, but is {val}");
            }
        }
        if self.delta0 > 1.0 {
            bail!("delta0 must be at most 1, but is {}", self.delta0);
        }
        if self.phi > 1.0 {
            bail!("phi must be at most 1, but is {}", self.phi);
        }
        Ok(())
    }
}

/// Parameter values of a batch of independent trials.
///
/// Stored column-wise: element `i` of every vector belongs to trial `i`.
#[derive(Debug, Clone, Default)]
pub struct ParamSample {
    pub delta0: Vec<f64>,
    pub phi: Vec<f64>,
    pub xi: Vec<f64>,
    pub value_of_life: Vec<f64>,
    pub period: Vec<f64>,
}

impl ParamSample {
    /// Number of trials.
    pub fn len(&self) -> usize {
        self.delta0.len()
    }

    /// Parameters of trial `i_trial`, if it exists.
    pub fn get(&self, i_trial: usize) -> Option<ParamSet> {
        Some(ParamSet {
            delta0: *self.delta0.get(i_trial)?,
            phi: *self.phi.get(i_trial)?,
            xi: *self.xi.get(i_trial)?,
            value_of_life: *self.value_of_life.get(i_trial)?,
            period: *self.period.get(i_trial)?,
        })
    }

    /// Iterate over the trials in order.
    pub fn iter(&self) -> impl Iterator<Item = ParamSet> + '_ {
        (0..self.len()).filter_map(|i_trial| self.get(i_trial))
    }
}

/// Point of a payoff curve.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PayoffPoint {
    /// Mitigation spending share.
    pub x: f64,
    /// Expected payoff at `x`.
    pub payoff: f64,
}
