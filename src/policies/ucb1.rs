use std::fmt;

use rand::RngCore;

use crate::error::{BanditError, Result};
use crate::policy::{ArmEstimates, Policy, argmax};

/// Upper Confidence Bound (UCB1) policy
///
/// Every arm is pulled once, in index order, before the confidence bound is
/// used. After that the policy picks the arm maximising
/// `value + c * sqrt(2 ln t / pulls)`.
#[derive(Clone, Debug)]
pub struct Ucb1 {
    /// Exploration weight
    c: f64,
    estimates: ArmEstimates,
    /// Number of `select_arm` calls so far
    t: u64,
}

impl Ucb1 {
    /// Creates a new UCB1 policy with exploration weight `c >= 0`
    pub fn new(k: usize, c: f64) -> Result<Self> {
        if !(c.is_finite() && c >= 0.0) {
            return Err(BanditError::invalid(format!(
                "c must be non-negative and finite, got {c}"
            )));
        }
        Ok(Self {
            c,
            estimates: ArmEstimates::new(k)?,
            t: 0,
        })
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// Gets the number of selections made so far
    pub fn total_rounds(&self) -> u64 {
        self.t
    }

    /// Confidence bound per arm; unpulled arms score `+inf`
    pub fn ucb_scores(&self) -> Vec<f64> {
        let ln_t = (self.t.max(1) as f64).ln();
        self.estimates
            .counts()
            .iter()
            .zip(self.estimates.values())
            .map(|(&n, &value)| {
                if n == 0 {
                    f64::INFINITY
                } else {
                    value + self.c * (2.0 * ln_t / n as f64).sqrt()
                }
            })
            .collect()
    }
}

impl Policy for Ucb1 {
    fn select_arm(&mut self, _rng: &mut dyn RngCore) -> usize {
        self.t += 1;
        if let Some(arm) = self.estimates.first_unpulled() {
            return arm;
        }
        argmax(&self.ucb_scores())
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.estimates.record(arm, reward);
    }

    fn reset(&mut self) {
        self.estimates.reset();
        self.t = 0;
    }

    fn estimates(&self) -> &ArmEstimates {
        &self.estimates
    }

    fn boxed_clone(&self) -> Box<dyn Policy> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Ucb1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UCB1(c={})", self.c)
    }
}
