use crate::model::{ParamSet, PayoffPoint};
use anyhow::{Result, bail};

/// Evenly spaced grid of mitigation spending shares inside `(0, 1)`.
///
/// Both endpoints are included. Construction guarantees that
/// consumption `c = 1 - x` stays positive at every point.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Grid {
    x_min: f64,
    x_max: f64,
    n_points: usize,
}

impl Grid {
    pub fn new(x_min: f64, x_max: f64, n_points: usize) -> Result<Self> {
        if !x_min.is_finite() || !x_max.is_finite() {
            bail!("grid bounds must be finite, but are ({x_min}, {x_max})");
        }
        if x_min <= 0.0 || x_max >= 1.0 {
            bail!("grid must lie strictly inside (0, 1), but spans [{x_min}, {x_max}]");
        }
        if x_min >= x_max {
            bail!("grid lower bound must be below upper bound, but spans [{x_min}, {x_max}]");
        }
        if n_points < 2 {
            bail!("grid must have at least 2 points, but has {n_points}");
        }
        Ok(Self {
            x_min,
            x_max,
            n_points,
        })
    }

    pub fn len(&self) -> usize {
        self.n_points
    }

    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        let span = self.x_max - self.x_min;
        let n_steps = (self.n_points - 1) as f64;
        (0..self.n_points).map(move |i_point| self.x_min + span * i_point as f64 / n_steps)
    }
}

/// Extinction risk per period after spending share `x` on mitigation.
///
/// The unmitigable part `(1 − φ)·δ₀` is unaffected; the mitigable part
/// decays as `exp(−ξ·T·x)`.
pub fn extinction_risk(params: &ParamSet, x: f64) -> f64 {
    let alpha = params.xi * params.period;
    (1.0 - params.phi) * params.delta0 + params.phi * params.delta0 * (-alpha * x).exp()
}

/// Expected payoff `ln(1 − x) + (1 − δ(x))·β·V` of spending share `x`.
pub fn payoff_at(params: &ParamSet, x: f64) -> f64 {
    let consumption = 1.0 - x;
    let utility = consumption.ln();
    utility + (1.0 - extinction_risk(params, x)) * params.beta() * params.value_of_life
}

/// Payoff of every point of the grid.
pub fn payoff_curve(params: &ParamSet, grid: &Grid) -> Vec<PayoffPoint> {
    grid.points()
        .map(|x| PayoffPoint {
            x,
            payoff: payoff_at(params, x),
        })
        .collect()
}
