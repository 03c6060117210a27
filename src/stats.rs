use serde::{Deserialize, Serialize};

pub struct Accumulator {
    n_vals: usize,
    n_positive: usize,
    mean: f64,
    diff_2_sum: f64,
    min: f64,
    max: f64,
}

/// Summary of a batch of spending shares.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of values strictly greater than zero.
    pub frac_positive: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            n_positive: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;
        if val > 0.0 {
            self.n_positive += 1;
        }
        self.min = self.min.min(val);
        self.max = self.max.max(val);

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> AccumulatorReport {
        if self.n_vals == 0 {
            return AccumulatorReport {
                n_vals: 0,
                mean: f64::NAN,
                std_dev: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                frac_positive: f64::NAN,
            };
        }
        AccumulatorReport {
            n_vals: self.n_vals,
            mean: self.mean,
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
            min: self.min,
            max: self.max,
            frac_positive: self.n_positive as f64 / self.n_vals as f64,
        }
    }
}

/// Histogram of values in `[0, 1]` with equal-width bins.
pub struct Histogram {
    counts: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistogramReport {
    /// Bin edges, one more than the number of bins.
    pub bin_edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(n_bins: usize) -> Self {
        Self {
            counts: vec![0; n_bins.max(1)],
        }
    }

    pub fn add(&mut self, val: f64) {
        if !(0.0..=1.0).contains(&val) {
            return;
        }
        let n_bins = self.counts.len();
        // The right edge belongs to the last bin.
        let i_bin = ((val * n_bins as f64) as usize).min(n_bins - 1);
        self.counts[i_bin] += 1;
    }

    pub fn report(&self) -> HistogramReport {
        let n_bins = self.counts.len();
        HistogramReport {
            bin_edges: (0..=n_bins)
                .map(|i_edge| i_edge as f64 / n_bins as f64)
                .collect(),
            counts: self.counts.clone(),
        }
    }
}
