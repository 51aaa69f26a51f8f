use std::fmt;

use rand::{Rng, RngCore};

use crate::error::{BanditError, Result};
use crate::policy::{ArmEstimates, Policy};

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    estimates: ArmEstimates,
}

impl EpsilonGreedy {
    /// Creates a new EpsilonGreedy policy over `k` arms
    ///
    /// # Errors
    /// Fails if `k == 0` or `epsilon` is outside `[0, 1]`.
    pub fn new(k: usize, epsilon: f64) -> Result<Self> {
        validate_epsilon(epsilon)?;
        Ok(Self {
            epsilon,
            estimates: ArmEstimates::new(k)?,
        })
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sets the epsilon value
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        validate_epsilon(epsilon)?;
        self.epsilon = epsilon;
        Ok(())
    }
}

fn validate_epsilon(epsilon: f64) -> Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(BanditError::invalid(format!(
            "epsilon must be between 0 and 1, got {epsilon}"
        )))
    }
}

impl Policy for EpsilonGreedy {
    fn select_arm(&mut self, rng: &mut dyn RngCore) -> usize {
        let r: f64 = rng.random_range(0.0..1.0);
        if r < self.epsilon {
            rng.random_range(0..self.estimates.n_arms())
        } else {
            self.estimates.greedy_arm()
        }
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

impl fmt::Display for EpsilonGreedy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpsilonGreedy(epsilon={})", self.epsilon)
    }
}
