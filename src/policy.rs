//! Policy trait definition for k-armed bandit algorithms

use std::fmt;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, RngCore};

use crate::error::{BanditError, Result};

/// Selection policy over a fixed set of `k` arms, addressed by index.
///
/// Every call to [`Policy::select_arm`] must be followed by exactly one call
/// to [`Policy::update`] with the reward observed for the selected arm.
///
/// The trait takes `dyn RngCore` instead of a generic parameter so that
/// `Box<dyn Policy>` stays object-safe; the simulator holds heterogeneous
/// policies side by side.
pub trait Policy: fmt::Display + fmt::Debug + Send + Sync {
    /// Select the next arm to pull.
    ///
    /// Reward estimates are never modified here. Policies with a time index
    /// (UCB1, UCB2) advance it, and UCB2 advances its epoch schedule.
    fn select_arm(&mut self, rng: &mut dyn RngCore) -> usize;

    /// Record the reward observed for `arm`.
    ///
    /// # Panics
    /// Panics if `arm >= self.n_arms()`.
    fn update(&mut self, arm: usize, reward: f64);

    /// Restore the initial state, keeping hyperparameters.
    fn reset(&mut self);

    /// Pull counts and sample-mean estimates.
    fn estimates(&self) -> &ArmEstimates;

    /// Number of arms this policy was configured for.
    fn n_arms(&self) -> usize {
        self.estimates().n_arms()
    }

    /// Clone into a fresh box; used to give every trial its own instance.
    fn boxed_clone(&self) -> Box<dyn Policy>;
}

impl Clone for Box<dyn Policy> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Per-arm pull counts and incremental sample means.
///
/// `values[a]` is only meaningful once `counts[a] > 0`; before that it holds 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ArmEstimates {
    counts: Vec<u64>,
    values: Vec<f64>,
}

impl ArmEstimates {
    /// Zeroed estimates for `k` arms.
    ///
    /// # Errors
    /// Returns [`BanditError::InvalidParameter`] if `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(BanditError::invalid("k must be greater than 0"));
        }
        Ok(Self {
            counts: vec![0; k],
            values: vec![0.0; k],
        })
    }

    /// Increment the count of `arm` and fold `reward` into its running mean.
    pub fn record(&mut self, arm: usize, reward: f64) {
        self.counts[arm] += 1;
        let n = self.counts[arm] as f64;
        self.values[arm] += (reward - self.values[arm]) / n;
    }

    /// Zero all counts and values.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.values.fill(0.0);
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn n_arms(&self) -> usize {
        self.counts.len()
    }

    /// Total number of recorded pulls.
    pub fn total_pulls(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Lowest-index arm that has never been pulled.
    pub fn first_unpulled(&self) -> Option<usize> {
        self.counts.iter().position(|&c| c == 0)
    }

    /// Arm with the highest estimate, first index on ties.
    pub fn greedy_arm(&self) -> usize {
        argmax(&self.values)
    }
}

/// Index of the largest value, first index on ties.
///
/// NaN entries compare as negative infinity. An all-`-inf` slice yields 0.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        let v = if v.is_nan() { f64::NEG_INFINITY } else { v };
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Softmax of `scores / temperature`, shifted by the maximum for stability.
///
/// If the scaled scores overflow, the result degenerates to a one-hot vector
/// on the arg-max.
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    let scaled: Vec<f64> = scores.iter().map(|s| s / temperature).collect();
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        let mut one_hot = vec![0.0; scores.len()];
        if !one_hot.is_empty() {
            one_hot[argmax(scores)] = 1.0;
        }
        return one_hot;
    }

    let exps: Vec<f64> = scaled.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Draw an index from a categorical distribution.
///
/// Falls back to a uniform draw if the weights are unusable.
pub fn sample_categorical(probabilities: &[f64], rng: &mut dyn RngCore) -> usize {
    match WeightedIndex::new(probabilities) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.random_range(0..probabilities.len().max(1)),
    }
}
