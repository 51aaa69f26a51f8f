use std::fmt;

use rand::RngCore;

use crate::error::{BanditError, Result};
use crate::policy::{self, ArmEstimates, Policy};

/// Boltzmann exploration over the sample-mean estimates
///
/// The temperature `tau` controls exploration: large values flatten the
/// distribution towards uniform, values near zero approach greedy selection.
#[derive(Clone, Debug)]
pub struct Softmax {
    tau: f64,
    estimates: ArmEstimates,
}

impl Softmax {
    /// Creates a Softmax policy over `k` arms with temperature `tau > 0`
    pub fn new(k: usize, tau: f64) -> Result<Self> {
        if !(tau.is_finite() && tau > 0.0) {
            return Err(BanditError::invalid(format!(
                "tau must be positive and finite, got {tau}"
            )));
        }
        Ok(Self {
            tau,
            estimates: ArmEstimates::new(k)?,
        })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Current selection probabilities
    pub fn probabilities(&self) -> Vec<f64> {
        policy::softmax(self.estimates.values(), self.tau)
    }
}

impl Policy for Softmax {
    fn select_arm(&mut self, rng: &mut dyn RngCore) -> usize {
        policy::sample_categorical(&self.probabilities(), rng)
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.estimates.record(arm, reward);
    }

    fn reset(&mut self) {
        self.estimates.reset();
    }

    fn estimates(&self) -> &ArmEstimates {
        &self.estimates
    }

    fn boxed_clone(&self) -> Box<dyn Policy> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Softmax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Softmax(tau={})", self.tau)
    }
}
