use crate::config::{Interval, SamplingConfig};
use crate::model::ParamSample;
use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;

/// Parameter sampler.
///
/// Holds one uniform distribution per model parameter and draws
/// batches of independent trials from them.
#[derive(Debug, Clone)]
pub struct Sampler {
    delta0_dist: Uniform<f64>,
    phi_dist: Uniform<f64>,
    xi_dist: Uniform<f64>,
    value_of_life_dist: Uniform<f64>,
    period_dist: Uniform<f64>,
}

impl Sampler {
    /// Create a new `Sampler` from the sampling ranges of the configuration.
    pub fn new(cfg: &SamplingConfig) -> Result<Self> {
        Ok(Self {
            delta0_dist: uniform(cfg.delta0).context("invalid extinction risk range")?,
            phi_dist: uniform(cfg.phi).context("invalid mitigable fraction range")?,
            xi_dist: uniform(cfg.xi).context("invalid mitigation effectiveness range")?,
            value_of_life_dist: uniform(cfg.value_of_life)
                .context("invalid value of life range")?,
            period_dist: uniform(cfg.period).context("invalid period length range")?,
        })
    }

    /// Draw `n_trials` independent trials.
    ///
    /// Each parameter is sampled as its own column, so no correlation
    /// between parameters is introduced.
    pub fn sample(&self, n_trials: usize, rng: &mut ChaCha12Rng) -> Result<ParamSample> {
        if n_trials == 0 {
            bail!("number of trials must be positive");
        }

        let sample = ParamSample {
            delta0: draw(&self.delta0_dist, n_trials, rng),
            phi: draw(&self.phi_dist, n_trials, rng),
            xi: draw(&self.xi_dist, n_trials, rng),
            value_of_life: draw(&self.value_of_life_dist, n_trials, rng),
            period: draw(&self.period_dist, n_trials, rng),
        };
        log::debug!("sampled {n_trials} trials");

        Ok(sample)
    }
}

/// Create the random number generator, seeded from `seed` or from the OS.
pub fn make_rng(seed: Option<u64>) -> Result<ChaCha12Rng> {
    match seed {
        Some(seed) => Ok(ChaCha12Rng::seed_from_u64(seed)),
        None => ChaCha12Rng::try_from_os_rng().context("failed to seed rng from the OS"),
    }
}

fn uniform(interval: Interval) -> Result<Uniform<f64>> {
    let dist = Uniform::new_inclusive(interval.low(), interval.high())
        .with_context(|| format!("failed to construct distribution over {interval:?}"))?;
    Ok(dist)
}

fn draw(dist: &Uniform<f64>, n_trials: usize, rng: &mut ChaCha12Rng) -> Vec<f64> {
    dist.sample_iter(rng).take(n_trials).collect()
}
