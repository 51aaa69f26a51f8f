//! Reduction of per-trial trajectories into averaged curves.

use serde::Serialize;

use crate::simulation::Trajectory;

/// Per-arm terminal statistics for one policy, pooled over every trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArmStatistics {
    /// Mean reward delivered by each arm when it was pulled (0 if never pulled).
    pub mean_rewards: Vec<f64>,
    /// Total number of times each arm was selected across all trials.
    pub selection_counts: Vec<u64>,
    /// Index of the arm with the highest true expected value.
    pub optimal_arm: usize,
}

/// Curves for one policy, averaged over trials, indexed by step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlgorithmSummary {
    /// Policy label, e.g. `UCB2(alpha=0.5)`.
    pub label: String,
    pub trials: usize,
    pub mean_reward: Vec<f64>,
    pub cumulative_regret: Vec<f64>,
    /// Fraction of trials that chose an optimal arm at each step.
    pub optimal_fraction: Vec<f64>,
    pub arm_statistics: ArmStatistics,
}

impl AlgorithmSummary {
    pub fn final_cumulative_regret(&self) -> f64 {
        self.cumulative_regret.last().copied().unwrap_or(0.0)
    }

    pub fn final_optimal_fraction(&self) -> f64 {
        self.optimal_fraction.last().copied().unwrap_or(0.0)
    }

    /// Average reward over every step of every trial.
    pub fn overall_mean_reward(&self) -> f64 {
        if self.mean_reward.is_empty() {
            0.0
        } else {
            self.mean_reward.iter().sum::<f64>() / self.mean_reward.len() as f64
        }
    }
}

/// Accumulates trajectories of one policy.
///
/// Sums are kept per step and divided by the number of trials in
/// [`Aggregator::finish`]. Steps beyond `steps` in a trajectory are ignored.
#[derive(Clone, Debug)]
pub struct Aggregator {
    label: String,
    steps: usize,
    optimal_arm: usize,
    trials: usize,
    reward_sum: Vec<f64>,
    cumulative_regret_sum: Vec<f64>,
    optimal_hits: Vec<u64>,
    arm_reward_sum: Vec<f64>,
    arm_counts: Vec<u64>,
}

impl Aggregator {
    pub fn new(label: impl Into<String>, k: usize, steps: usize, optimal_arm: usize) -> Self {
        Self {
            label: label.into(),
            steps,
            optimal_arm,
            trials: 0,
            reward_sum: vec![0.0; steps],
            cumulative_regret_sum: vec![0.0; steps],
            optimal_hits: vec![0; steps],
            arm_reward_sum: vec![0.0; k],
            arm_counts: vec![0; k],
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Fold one trial into the running sums.
    pub fn add(&mut self, trajectory: &Trajectory) {
        self.trials += 1;
        let mut regret = 0.0;
        for (i, step) in trajectory.steps.iter().take(self.steps).enumerate() {
            regret += step.regret;
            self.reward_sum[i] += step.reward;
            self.cumulative_regret_sum[i] += regret;
            if step.optimal {
                self.optimal_hits[i] += 1;
            }
            if let Some(count) = self.arm_counts.get_mut(step.arm) {
                *count += 1;
                self.arm_reward_sum[step.arm] += step.reward;
            }
        }
    }

    /// Divide the sums by the number of trials.
    pub fn finish(self) -> AlgorithmSummary {
        let n = self.trials.max(1) as f64;
        let mean_rewards = self
            .arm_reward_sum
            .iter()
            .zip(&self.arm_counts)
            .map(|(&sum, &count)| if count == 0 { 0.0 } else { sum / count as f64 })
            .collect();

        AlgorithmSummary {
            label: self.label,
            trials: self.trials,
            mean_reward: self.reward_sum.iter().map(|s| s / n).collect(),
            cumulative_regret: self.cumulative_regret_sum.iter().map(|s| s / n).collect(),
            optimal_fraction: self.optimal_hits.iter().map(|&h| h as f64 / n).collect(),
            arm_statistics: ArmStatistics {
                mean_rewards,
                selection_counts: self.arm_counts,
                optimal_arm: self.optimal_arm,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::StepRecord;
    use approx::assert_abs_diff_eq;

    fn trajectory(steps: &[(usize, f64)]) -> Trajectory {
        let expected = [0.9, 0.1];
        let steps: Vec<StepRecord> = steps
            .iter()
            .map(|&(arm, reward)| StepRecord {
                arm,
                reward,
                regret: 0.9 - expected[arm],
                optimal: arm == 0,
            })
            .collect();
        Trajectory {
            steps,
            final_counts: vec![],
            final_values: vec![],
        }
    }

    #[test]
    fn test_aggregates_average_over_trials() {
        let mut agg = Aggregator::new("EpsilonGreedy(epsilon=0)", 2, 3, 0);
        agg.add(&trajectory(&[(0, 1.0), (1, 0.0), (0, 1.0)]));
        agg.add(&trajectory(&[(1, 1.0), (1, 0.0), (0, 0.0)]));
        assert_eq!(agg.trials(), 2);

        let summary = agg.finish();
        assert_eq!(summary.trials, 2);
        assert_eq!(summary.mean_reward, vec![1.0, 0.0, 0.5]);
        assert_eq!(summary.optimal_fraction, vec![0.5, 0.0, 1.0]);

        // trial 1: 0, 0.8, 0.8  trial 2: 0.8, 1.6, 1.6
        assert_abs_diff_eq!(summary.cumulative_regret[0], 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.cumulative_regret[1], 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.final_cumulative_regret(), 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.final_optimal_fraction(), 1.0);
    }

    #[test]
    fn test_arm_statistics() {
        let mut agg = Aggregator::new("x", 2, 3, 0);
        agg.add(&trajectory(&[(0, 1.0), (1, 0.0), (0, 0.0)]));
        agg.add(&trajectory(&[(1, 1.0), (1, 1.0), (0, 1.0)]));

        let stats = agg.finish().arm_statistics;
        assert_eq!(stats.selection_counts, vec![3, 3]);
        assert_abs_diff_eq!(stats.mean_rewards[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.mean_rewards[1], 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(stats.optimal_arm, 0);
    }

    #[test]
    fn test_unpulled_arm_has_zero_mean() {
        let mut agg = Aggregator::new("x", 2, 2, 0);
        agg.add(&trajectory(&[(0, 1.0), (0, 1.0)]));
        let summary = agg.finish();
        assert_eq!(summary.arm_statistics.mean_rewards, vec![1.0, 0.0]);
        assert_eq!(summary.arm_statistics.selection_counts, vec![2, 0]);
        assert_abs_diff_eq!(summary.overall_mean_reward(), 1.0);
    }

    #[test]
    fn test_empty_aggregator() {
        let summary = Aggregator::new("x", 2, 4, 1).finish();
        assert_eq!(summary.trials, 0);
        assert_eq!(summary.mean_reward, vec![0.0; 4]);
        assert_eq!(summary.final_cumulative_regret(), 0.0);
    }
}
