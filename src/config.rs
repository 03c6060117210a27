use crate::model::ParamSet;
use crate::payoff::Grid;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Closed interval `[low, high]` a parameter is sampled from.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Interval(pub f64, pub f64);

impl Interval {
    pub fn low(&self) -> f64 {
        self.0
    }

    pub fn high(&self) -> f64 {
        self.1
    }

    fn validate(&self) -> Result<()> {
        if !self.0.is_finite() || !self.1.is_finite() {
            bail!("interval bounds must be finite, but are {self:?}");
        }
        if self.0 > self.1 {
            bail!("interval lower bound must not exceed upper bound, but is {self:?}");
        }
        Ok(())
    }
}

/// Uniform sampling ranges and trial count of the Monte Carlo simulation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Number of trials.
    pub n_trials: usize,

    /// Baseline extinction risk per period.
    pub delta0: Interval,
    /// Fraction of the risk that can be mitigated.
    pub phi: Interval,
    /// Mitigation effectiveness.
    pub xi: Interval,
    /// Value of life relative to one period's marginal utility of consumption.
    pub value_of_life: Interval,
    /// Period length in years.
    pub period: Interval,

    /// Random number generator seed (seeded from the OS if absent).
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            n_trials: 10_000,
            delta0: Interval(0.0, 0.02),
            phi: Interval(0.0, 1.0),
            xi: Interval(0.0, 0.99),
            value_of_life: Interval(90.0, 270.0),
            period: Interval(5.0, 20.0),
            seed: None,
        }
    }
}

/// Fixed parameter set and spending grid of the payoff curve.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayoffConfig {
    pub delta0: f64,
    pub phi: f64,
    pub xi: f64,
    pub value_of_life: f64,
    pub period: f64,

    /// Smallest spending share of the grid.
    pub x_min: f64,
    /// Largest spending share of the grid.
    pub x_max: f64,
    /// Number of grid points.
    pub n_points: usize,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        let params = ParamSet::baseline();
        Self {
            delta0: params.delta0,
            phi: params.phi,
            xi: params.xi,
            value_of_life: params.value_of_life,
            period: params.period,
            x_min: 0.001,
            x_max: 0.99,
            n_points: 1000,
        }
    }
}

impl PayoffConfig {
    pub fn params(&self) -> ParamSet {
        ParamSet {
            delta0: self.delta0,
            phi: self.phi,
            xi: self.xi,
            value_of_life: self.value_of_life,
            period: self.period,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Number of histogram bins over `[0, 1]`.
    pub hist_bins: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { hist_bins: 20 }
    }
}

/// Calculator configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// Every field has a default, so the file may be partial or missing altogether.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sampling: SamplingConfig,
    pub payoff: PayoffConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a [`Config`] from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sampling = &self.sampling;
        check_num(sampling.n_trials, 1_000..=1_000_000).context("invalid number of trials")?;
        check_interval(sampling.delta0, 0.0..=1.0).context("invalid extinction risk range")?;
        check_interval(sampling.phi, 0.0..=1.0).context("invalid mitigable fraction range")?;
        check_interval(sampling.xi, 0.0..=1.0).context("invalid mitigation effectiveness range")?;
        check_interval(sampling.value_of_life, 0.0..=1e6)
            .context("invalid value of life range")?;
        check_interval(sampling.period, 0.0..=1e3).context("invalid period length range")?;

        let payoff = &self.payoff;
        payoff.params().validate().context("invalid payoff parameters")?;
        check_num(payoff.x_min, 0.0..1.0).context("invalid grid lower bound")?;
        check_num(payoff.x_max, 0.0..1.0).context("invalid grid upper bound")?;
        check_num(payoff.n_points, 2..=1_000_000).context("invalid number of grid points")?;
        Grid::new(payoff.x_min, payoff.x_max, payoff.n_points).context("invalid spending grid")?;

        check_num(self.output.hist_bins, 1..=1_000).context("invalid number of histogram bins")?;

        Ok(())
    }
}

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_interval<R>(interval: Interval, range: R) -> Result<()>
where
    R: RangeBounds<f64> + Debug + Clone,
{
    interval.validate()?;
    check_num(interval.low(), range.clone()).context("invalid lower bound")?;
    check_num(interval.high(), range).context("invalid upper bound")?;
    Ok(())
}
