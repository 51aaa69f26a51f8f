//! UCB2: upper confidence bounds with epoch-based exploitation.
//!
//! Each arm `a` carries an epoch counter `r_a` and an epoch target
//! `tau(r_a) = ceil((1 + alpha)^r_a)`. The bonus term is computed from
//! `tau(r_a)` instead of the raw pull count, so the bonus of an arm only
//! shrinks when its epoch advances. An arm's epoch advances when it is
//! selected after its pull count has reached the current target.
//!
//! The schedule is driven entirely by [`Policy::select_arm`]; callers never
//! advance epochs themselves.

use std::f64::consts::E;
use std::fmt;

use rand::RngCore;
use tracing::trace;

use crate::error::{BanditError, Result};
use crate::policy::{ArmEstimates, Policy, argmax};

/// Upper bound on an arm's epoch target.
///
/// `(1 + alpha)^r` overflows for long runs; capping keeps the bonus finite.
pub const TAU_MAX: u64 = 1_000_000;

/// Epoch target `min(ceil((1 + alpha)^epoch), TAU_MAX)`, never below 1.
pub fn epoch_length(alpha: f64, epoch: u32) -> u64 {
    let raw = (1.0 + alpha).powf(f64::from(epoch)).ceil();
    if !raw.is_finite() || raw >= TAU_MAX as f64 {
        TAU_MAX
    } else {
        (raw as u64).max(1)
    }
}

#[derive(Clone, Debug)]
pub struct Ucb2 {
    alpha: f64,
    estimates: ArmEstimates,
    t: u64,
    epochs: Vec<u32>,
    tau: Vec<u64>,
}

impl Ucb2 {
    /// Creates a UCB2 policy over `k` arms.
    ///
    /// # Errors
    /// Fails unless `0 < alpha < 1` and `k > 0`.
    pub fn new(k: usize, alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(BanditError::invalid(format!(
                "alpha must be in (0, 1), got {alpha}"
            )));
        }
        Ok(Self {
            alpha,
            estimates: ArmEstimates::new(k)?,
            t: 0,
            epochs: vec![0; k],
            tau: vec![1; k],
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn total_rounds(&self) -> u64 {
        self.t
    }

    /// Number of times `arm`'s epoch has advanced.
    pub fn epochs(&self, arm: usize) -> u32 {
        self.epochs[arm]
    }

    /// Current epoch target of `arm`.
    pub fn tau(&self, arm: usize) -> u64 {
        self.tau[arm]
    }

    /// Length of `arm`'s next epoch, `tau(r + 1) - tau(r)`.
    ///
    /// A caller that wants to skip redundant selections may replay the arm
    /// this many times; the resulting sequence is not guaranteed to match
    /// step-by-step selection once other arms' bonuses shift with `t`.
    pub fn epoch_repeats(&self, arm: usize) -> u64 {
        let r = self.epochs[arm];
        epoch_length(self.alpha, r.saturating_add(1)) - epoch_length(self.alpha, r)
    }

    /// UCB2 score per arm.
    ///
    /// Epoch targets below 1 are clamped to 1 and any non-finite score is
    /// replaced with `-inf` so a degenerate arm is simply never preferred.
    pub fn ucb_scores(&self) -> Vec<f64> {
        let t = self.t.max(1) as f64;
        self.estimates
            .values()
            .iter()
            .zip(&self.tau)
            .map(|(&value, &tau)| {
                let tau = tau.max(1) as f64;
                let bonus = ((1.0 + self.alpha) * (E * t / tau).ln() / (2.0 * tau)).sqrt();
                let score = value + bonus;
                if score.is_finite() {
                    score
                } else {
                    f64::NEG_INFINITY
                }
            })
            .collect()
    }

    fn advance_epoch(&mut self, arm: usize) {
        let before = self.tau[arm];
        self.epochs[arm] = self.epochs[arm].saturating_add(1);
        self.tau[arm] = epoch_length(self.alpha, self.epochs[arm]);
        if self.tau[arm] == TAU_MAX && before < TAU_MAX {
            trace!(arm, epochs = self.epochs[arm], "ucb2 epoch target saturated");
        } else {
            trace!(arm, epochs = self.epochs[arm], tau = self.tau[arm], "ucb2 epoch advanced");
        }
    }
}

impl Policy for Ucb2 {
    fn select_arm(&mut self, _rng: &mut dyn RngCore) -> usize {
        self.t += 1;

        if let Some(arm) = self.estimates.first_unpulled() {
            self.tau[arm] = 1;
            return arm;
        }

        let arm = argmax(&self.ucb_scores());
        if self.estimates.counts()[arm] >= self.tau[arm] {
            self.advance_epoch(arm);
        }
        arm
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.estimates.record(arm, reward);
    }

    fn reset(&mut self) {
        self.estimates.reset();
        self.t = 0;
        self.epochs.fill(0);
        self.tau.fill(1);
    }

    fn estimates(&self) -> &ArmEstimates {
        &self.estimates
    }

    fn boxed_clone(&self) -> Box<dyn Policy> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Ucb2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UCB2(alpha={})", self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn step(policy: &mut Ucb2, rng: &mut dyn RngCore, rewards: &[f64]) -> usize {
        let arm = policy.select_arm(rng);
        policy.update(arm, rewards[arm]);
        arm
    }

    #[test]
    fn test_epoch_length_values() {
        assert_eq!(epoch_length(0.5, 0), 1);
        assert_eq!(epoch_length(0.5, 1), 2);
        assert_eq!(epoch_length(0.5, 2), 3);
        assert_eq!(epoch_length(0.5, 3), 4);
        assert_eq!(epoch_length(0.5, 4), 6);
    }

    #[test]
    fn test_epoch_length_is_capped() {
        assert_eq!(epoch_length(0.99, 10_000), TAU_MAX);
        assert_eq!(epoch_length(0.5, u32::MAX), TAU_MAX);
        assert_eq!(epoch_length(0.01, 2_000), TAU_MAX);
    }

    #[test]
    fn test_epoch_length_non_decreasing() {
        for alpha in [0.01, 0.1, 0.5, 0.9] {
            let mut prev = 0;
            for r in 0..5_000 {
                let tau = epoch_length(alpha, r);
                assert!(tau >= prev);
                assert!(tau <= TAU_MAX);
                prev = tau;
            }
        }
    }

    #[test]
    fn test_ucb2_pre_exploration_in_order() {
        let mut policy = Ucb2::new(5, 0.5).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for expected in 0..5 {
            assert_eq!(policy.estimates().counts()[expected], 0);
            assert_eq!(step(&mut policy, &mut rng, &[0.0; 5]), expected);
            assert_eq!(policy.tau(expected), 1);
        }
    }

    #[test]
    fn test_ucb2_epoch_advance_sequence() {
        let mut policy = Ucb2::new(2, 0.5).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let rewards = [1.0, 0.0];

        assert_eq!(step(&mut policy, &mut rng, &rewards), 0);
        assert_eq!(step(&mut policy, &mut rng, &rewards), 1);
        assert_eq!(policy.epochs(0), 0);

        // third selection: arm 0 has one pull against target 1
        assert_eq!(step(&mut policy, &mut rng, &rewards), 0);
        assert_eq!(policy.epochs(0), 1);
        assert_eq!(policy.tau(0), 2);

        assert_eq!(step(&mut policy, &mut rng, &rewards), 0);
        assert_eq!(policy.epochs(0), 2);
        assert_eq!(policy.tau(0), 3);
        assert_eq!(policy.epochs(1), 0);
    }

    #[test]
    fn test_ucb2_tau_only_changes_when_target_reached() {
        let mut policy = Ucb2::new(3, 0.3).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let rewards = [0.2, 0.9, 0.5];

        for _ in 0..2_000 {
            let before: Vec<u64> = (0..3).map(|a| policy.tau(a)).collect();
            let counts_before = policy.estimates().counts().to_vec();
            let arm = step(&mut policy, &mut rng, &rewards);
            for a in 0..3 {
                if a != arm {
                    assert_eq!(policy.tau(a), before[a]);
                } else if counts_before[a] > 0 && counts_before[a] < before[a] {
                    assert_eq!(policy.tau(a), before[a]);
                }
                assert!(policy.tau(a) >= 1 && policy.tau(a) <= TAU_MAX);
            }
        }
        assert_eq!(policy.estimates().total_pulls(), 2_000);
    }

    #[test]
    fn test_ucb2_scores_never_nan() {
        let mut policy = Ucb2::new(2, 0.9).unwrap();
        policy.update(0, 1.0);
        policy.update(1, 0.0);
        // epoch target far beyond e * t makes the log negative
        policy.tau[0] = 1_000;
        policy.t = 3;

        let scores = policy.ucb_scores();
        assert_eq!(scores[0], f64::NEG_INFINITY);
        assert!(scores[1].is_finite());

        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert_eq!(policy.select_arm(&mut rng), 1);
    }

    #[test]
    fn test_ucb2_epoch_repeats() {
        let mut policy = Ucb2::new(1, 0.5).unwrap();
        assert_eq!(policy.epoch_repeats(0), 1);
        policy.epochs[0] = 3;
        assert_eq!(policy.epoch_repeats(0), epoch_length(0.5, 4) - epoch_length(0.5, 3));
    }

    #[test]
    fn test_ucb2_reset() {
        let mut policy = Ucb2::new(2, 0.5).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..20 {
            step(&mut policy, &mut rng, &[1.0, 0.0]);
        }
        assert!(policy.epochs(0) > 0);

        policy.reset();
        assert_eq!(policy.total_rounds(), 0);
        assert_eq!(policy.epochs(0), 0);
        assert_eq!(policy.tau(0), 1);
        assert_eq!(policy.estimates().counts(), &[0, 0]);
        assert_eq!(policy.alpha(), 0.5);
    }

    #[test]
    fn test_ucb2_alpha_validation() {
        for alpha in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                Ucb2::new(2, alpha),
                Err(BanditError::InvalidParameter { .. })
            ));
        }
        assert_eq!(Ucb2::new(2, 0.5).unwrap().to_string(), "UCB2(alpha=0.5)");
    }
}
