use std::fmt;

use rand::RngCore;

use crate::error::{BanditError, Result};
use crate::policy::{self, ArmEstimates, Policy};

/// Gradient bandit with a running-average reward baseline
///
/// Arms are drawn from the softmax of a preference vector `H`. After each
/// reward the chosen arm's preference moves by `alpha * (r - baseline) * (1 - p)`
/// and every other arm's by `-alpha * (r - baseline) * p`, with `p` taken from
/// the preferences as they were before the update.
#[derive(Clone, Debug)]
pub struct GradientBandit {
    alpha: f64,
    estimates: ArmEstimates,
    preferences: Vec<f64>,
    average_reward: f64,
    t: u64,
}

impl GradientBandit {
    /// Creates a gradient bandit over `k` arms with step size `alpha >= 0`
    pub fn new(k: usize, alpha: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(BanditError::invalid(format!(
                "alpha must be non-negative and finite, got {alpha}"
            )));
        }
        let estimates = ArmEstimates::new(k)?;
        Ok(Self {
            alpha,
            estimates,
            preferences: vec![0.0; k],
            average_reward: 0.0,
            t: 0,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn preferences(&self) -> &[f64] {
        &self.preferences
    }

    /// Running mean of every reward seen, used as the baseline
    pub fn average_reward(&self) -> f64 {
        self.average_reward
    }

    /// Softmax of the current preferences
    pub fn probabilities(&self) -> Vec<f64> {
        policy::softmax(&self.preferences, 1.0)
    }
}

impl Policy for GradientBandit {
    fn select_arm(&mut self, rng: &mut dyn RngCore) -> usize {
        policy::sample_categorical(&self.probabilities(), rng)
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.estimates.record(arm, reward);

        self.t += 1;
        self.average_reward += (reward - self.average_reward) / self.t as f64;

        let probabilities = self.probabilities();
        let advantage = self.alpha * (reward - self.average_reward);
        for (a, (h, p)) in self.preferences.iter_mut().zip(probabilities).enumerate() {
            if a == arm {
                *h += advantage * (1.0 - p);
            } else {
                *h -= advantage * p;
            }
        }
    }

    fn reset(&mut self) {
        self.estimates.reset();
        self.preferences.fill(0.0);
        self.average_reward = 0.0;
        self.t = 0;
    }

    fn estimates(&self) -> &ArmEstimates {
        &self.estimates
    }

    fn boxed_clone(&self) -> Box<dyn Policy> {
        Box::new(self.clone())
    }
}

impl fmt::Display for GradientBandit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GradientBandit(alpha={})", self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    #[test]
    fn test_gradient_preference_update() {
        let mut policy = GradientBandit::new(2, 0.1).unwrap();

        // first reward equals the new baseline, nothing moves
        policy.update(0, 1.0);
        assert_abs_diff_eq!(policy.average_reward(), 1.0);
        assert_eq!(policy.preferences(), &[0.0, 0.0]);

        // baseline 0.5, advantage -0.5, p = [0.5, 0.5]
        policy.update(1, 0.0);
        assert_abs_diff_eq!(policy.average_reward(), 0.5);
        assert_abs_diff_eq!(policy.preferences()[1], -0.025, epsilon = 1e-12);
        assert_abs_diff_eq!(policy.preferences()[0], 0.025, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_preferences_sum_is_conserved() {
        let mut policy = GradientBandit::new(4, 0.3).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for i in 0..200 {
            let arm = policy.select_arm(&mut rng);
            policy.update(arm, if arm == 2 { 1.0 } else { (i % 2) as f64 * 0.3 });
            let total: f64 = policy.preferences().iter().sum();
            assert_abs_diff_eq!(total, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(policy.probabilities().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gradient_zero_alpha_stays_uniform() {
        let mut policy = GradientBandit::new(3, 0.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let arm = policy.select_arm(&mut rng);
            policy.update(arm, arm as f64);
        }
        for p in policy.probabilities() {
            assert_abs_diff_eq!(p, 1.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gradient_learns_best_arm() {
        let mut policy = GradientBandit::new(3, 0.2).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let rewards = [0.1, 0.2, 1.0];
        for _ in 0..2_000 {
            let arm = policy.select_arm(&mut rng);
            policy.update(arm, rewards[arm]);
        }
        let p = policy.probabilities();
        assert!(p[2] > 0.9, "probabilities {p:?}");
    }

    #[test]
    fn test_gradient_reset_and_validation() {
        let mut policy = GradientBandit::new(2, 0.1).unwrap();
        policy.update(0, 1.0);
        policy.update(1, 0.0);
        policy.reset();
        assert_eq!(policy.preferences(), &[0.0, 0.0]);
        assert_eq!(policy.average_reward(), 0.0);
        assert_eq!(policy.estimates().total_pulls(), 0);

        assert!(GradientBandit::new(2, -0.1).is_err());
        assert!(GradientBandit::new(2, f64::NAN).is_err());
        assert_eq!(policy.to_string(), "GradientBandit(alpha=0.1)");
    }
}
