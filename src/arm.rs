//! Reward sources for the k-armed bandit.
//!
//! An [`Arm`] has a fixed expected value that the policy under test never
//! sees. The simulation harness reads it only to score regret and to decide
//! which arm is optimal.

use std::fmt;

use rand::{Rng, RngCore};
use rand_distr::{Bernoulli, Binomial, Distribution};

use crate::error::{BanditError, Result};

/// A stochastic reward source.
pub trait Arm: fmt::Display + fmt::Debug + Send + Sync {
    /// Draw one reward sample.
    fn pull(&self, rng: &mut dyn RngCore) -> f64;

    /// The true mean reward of this arm.
    fn expected_value(&self) -> f64;
}

/// Arm paying 1 with probability `p` and 0 otherwise.
#[derive(Clone, Debug)]
pub struct BernoulliArm {
    p: f64,
    dist: Bernoulli,
}

impl BernoulliArm {
    /// Creates a Bernoulli arm with success probability `p`.
    ///
    /// # Errors
    /// Returns [`BanditError::InvalidParameter`] if `p` is outside `[0, 1]`.
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BanditError::invalid(format!(
                "bernoulli p must be between 0 and 1, got {p}"
            )));
        }
        let dist = Bernoulli::new(p).map_err(|e| BanditError::invalid(e.to_string()))?;
        Ok(Self { p, dist })
    }

    /// Draws `k` arms with `p ~ U(0, 1)`.
    pub fn generate<R: Rng + ?Sized>(k: usize, rng: &mut R) -> Result<Vec<Self>> {
        (0..k).map(|_| Self::new(rng.random::<f64>())).collect()
    }

    /// Success probability.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Arm for BernoulliArm {
    fn pull(&self, rng: &mut dyn RngCore) -> f64 {
        if self.dist.sample(rng) { 1.0 } else { 0.0 }
    }

    fn expected_value(&self) -> f64 {
        self.p
    }
}

impl fmt::Display for BernoulliArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bernoulli(p={:.2})", self.p)
    }
}

/// Arm paying the number of successes out of `n` trials with probability `p`.
#[derive(Clone, Debug)]
pub struct BinomialArm {
    n: u64,
    p: f64,
    dist: Binomial,
}

impl BinomialArm {
    /// Creates a Binomial arm.
    ///
    /// # Errors
    /// Returns [`BanditError::InvalidParameter`] if `n == 0` or `p` is outside `[0, 1]`.
    pub fn new(n: u64, p: f64) -> Result<Self> {
        if n == 0 {
            return Err(BanditError::invalid("binomial n must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(BanditError::invalid(format!(
                "binomial p must be between 0 and 1, got {p}"
            )));
        }
        let dist = Binomial::new(n, p).map_err(|e| BanditError::invalid(e.to_string()))?;
        Ok(Self { n, p, dist })
    }

    /// Draws `k` arms sharing `n` with `p ~ U(0, 1)`.
    pub fn generate<R: Rng + ?Sized>(k: usize, n: u64, rng: &mut R) -> Result<Vec<Self>> {
        (0..k).map(|_| Self::new(n, rng.random::<f64>())).collect()
    }

    /// Number of trials per pull.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Per-trial success probability.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Arm for BinomialArm {
    fn pull(&self, rng: &mut dyn RngCore) -> f64 {
        self.dist.sample(rng) as f64
    }

    fn expected_value(&self) -> f64 {
        self.n as f64 * self.p
    }
}

impl fmt::Display for BinomialArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binomial(n={}, p={:.2})", self.n, self.p)
    }
}

/// Index of the arm with the highest expected value (first one on ties).
pub fn optimal_arm(arms: &[Box<dyn Arm>]) -> Option<usize> {
    let values: Vec<f64> = arms.iter().map(|a| a.expected_value()).collect();
    if values.is_empty() {
        None
    } else {
        Some(crate::policy::argmax(&values))
    }
}
