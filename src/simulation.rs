//! Monte-Carlo driver running many independent trials per policy.

use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::arm::{Arm, optimal_arm};
use crate::error::{BanditError, Result};
use crate::policy::Policy;
use crate::stats::{Aggregator, AlgorithmSummary};

const fn default_steps() -> usize {
    1000
}

const fn default_runs() -> usize {
    500
}

const fn default_seed() -> u64 {
    42
}

/// Outcome of one step of one trial.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepRecord {
    pub arm: usize,
    pub reward: f64,
    /// `best expected value - expected value of arm`
    pub regret: f64,
    /// Whether `arm` has the best expected value
    pub optimal: bool,
}

/// Every step of one trial plus the policy's final estimates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trajectory {
    pub steps: Vec<StepRecord>,
    pub final_counts: Vec<u64>,
    pub final_values: Vec<f64>,
}

impl Trajectory {
    /// Arm chosen at each step.
    pub fn selections(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.arm).collect()
    }

    /// Running sum of per-step regret.
    pub fn cumulative_regret(&self) -> Vec<f64> {
        self.steps
            .iter()
            .scan(0.0, |acc, s| {
                *acc += s.regret;
                Some(*acc)
            })
            .collect()
    }

    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|s| s.reward).sum()
    }
}

/// Run `steps` select/pull/update cycles of `policy` against `arms`.
///
/// The policy is used as-is; callers that want a fresh trial reset it first.
pub fn run_episode(
    policy: &mut dyn Policy,
    arms: &[Box<dyn Arm>],
    steps: usize,
    rng: &mut dyn RngCore,
) -> Trajectory {
    let expected: Vec<f64> = arms.iter().map(|a| a.expected_value()).collect();
    let best = expected.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut records = Vec::with_capacity(steps);
    for _ in 0..steps {
        let arm = policy.select_arm(rng);
        let reward = arms[arm].pull(rng);
        policy.update(arm, reward);

        records.push(StepRecord {
            arm,
            reward,
            regret: best - expected[arm],
            optimal: expected[arm] >= best,
        });
    }

    Trajectory {
        steps: records,
        final_counts: policy.estimates().counts().to_vec(),
        final_values: policy.estimates().values().to_vec(),
    }
}

/// Seed of the random stream owned by one (policy, trial) pair.
pub fn trial_seed(seed: u64, policy_index: usize, trial: usize) -> u64 {
    (seed ^ (policy_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)).wrapping_add(trial as u64)
}

/// Aggregated results of a simulation.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    /// One summary per policy, in configuration order.
    pub summaries: Vec<AlgorithmSummary>,
    /// `trajectories[policy][trial]`; empty unless trajectories were kept.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trajectories: Vec<Vec<Trajectory>>,
}

impl SimulationReport {
    /// Summary for the policy with the given label.
    pub fn summary(&self, label: &str) -> Option<&AlgorithmSummary> {
        self.summaries.iter().find(|s| s.label == label)
    }

    /// Serialise the summaries for an external plotting layer.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// Runs `runs` independent trials of `steps` steps for each policy over a
/// shared arm configuration.
#[derive(Debug)]
pub struct Simulator {
    arms: Vec<Box<dyn Arm>>,
    policies: Vec<Box<dyn Policy>>,
    steps: usize,
    runs: usize,
    seed: u64,
    keep_trajectories: bool,
    optimal_arm: usize,
}

impl Simulator {
    /// Create a new builder for constructing a simulator
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::default()
    }

    pub fn arms(&self) -> &[Box<dyn Arm>] {
        &self.arms
    }

    pub fn policies(&self) -> &[Box<dyn Policy>] {
        &self.policies
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index of the arm with the highest expected value.
    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    /// Run one trial of one policy on a freshly reset copy of it.
    ///
    /// # Panics
    /// Panics if `policy_index` is out of range.
    pub fn run_trial(&self, policy_index: usize, trial: usize) -> Trajectory {
        let mut policy = self.policies[policy_index].boxed_clone();
        policy.reset();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(trial_seed(self.seed, policy_index, trial));
        run_episode(policy.as_mut(), &self.arms, self.steps, &mut rng)
    }

    /// Run every trial of every policy and aggregate the results.
    ///
    /// Trials run on the rayon pool. Each owns its policy copy and random
    /// stream, so the report does not depend on scheduling.
    pub fn run(&self) -> SimulationReport {
        let started = Instant::now();
        info!(
            policies = self.policies.len(),
            arms = self.arms.len(),
            steps = self.steps,
            runs = self.runs,
            seed = self.seed,
            "starting simulation"
        );

        let mut summaries = Vec::with_capacity(self.policies.len());
        let mut kept = Vec::new();

        for (index, policy) in self.policies.iter().enumerate() {
            let label = policy.to_string();
            let trajectories: Vec<Trajectory> = (0..self.runs)
                .into_par_iter()
                .map(|trial| {
                    let trajectory = self.run_trial(index, trial);
                    debug!(policy = %label, trial, reward = trajectory.total_reward(), "trial finished");
                    trajectory
                })
                .collect();

            let mut aggregator =
                Aggregator::new(label.clone(), self.arms.len(), self.steps, self.optimal_arm);
            for trajectory in &trajectories {
                aggregator.add(trajectory);
            }
            let summary = aggregator.finish();
            info!(
                policy = %label,
                final_regret = summary.final_cumulative_regret(),
                optimal_fraction = summary.final_optimal_fraction(),
                "policy simulated"
            );
            summaries.push(summary);

            if self.keep_trajectories {
                kept.push(trajectories);
            }
        }

        info!(elapsed_ms = started.elapsed().as_millis() as u64, "simulation finished");
        SimulationReport {
            summaries,
            trajectories: kept,
        }
    }
}

/// Builder for creating simulators with a fluent API
pub struct SimulatorBuilder {
    arms: Vec<Box<dyn Arm>>,
    policies: Vec<Box<dyn Policy>>,
    steps: usize,
    runs: usize,
    seed: u64,
    keep_trajectories: bool,
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self {
            arms: Vec::new(),
            policies: Vec::new(),
            steps: default_steps(),
            runs: default_runs(),
            seed: default_seed(),
            keep_trajectories: false,
        }
    }
}

impl SimulatorBuilder {
    /// Add one arm
    pub fn arm<A: Arm + 'static>(mut self, arm: A) -> Self {
        self.arms.push(Box::new(arm));
        self
    }

    /// Add several boxed arms
    pub fn arms<I>(mut self, arms: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Arm>>,
    {
        self.arms.extend(arms);
        self
    }

    /// Add one policy to compare
    pub fn policy<P: Policy + 'static>(mut self, policy: P) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Add several boxed policies
    pub fn policies<I>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Policy>>,
    {
        self.policies.extend(policies);
        self
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep every per-trial trajectory in the report
    pub fn keep_trajectories(mut self, keep: bool) -> Self {
        self.keep_trajectories = keep;
        self
    }

    /// Build the simulator
    pub fn build(self) -> Result<Simulator> {
        if self.arms.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }
        if self.policies.is_empty() {
            return Err(BanditError::NoPolicies);
        }
        if self.steps == 0 {
            return Err(BanditError::invalid("steps must be greater than 0"));
        }
        if self.runs == 0 {
            return Err(BanditError::invalid("runs must be greater than 0"));
        }
        for policy in &self.policies {
            if policy.n_arms() != self.arms.len() {
                return Err(BanditError::ArmCountMismatch {
                    expected: self.arms.len(),
                    got: policy.n_arms(),
                });
            }
        }

        let optimal_arm = optimal_arm(&self.arms).ok_or(BanditError::NoArmsAvailable)?;
        Ok(Simulator {
            arms: self.arms,
            policies: self.policies,
            steps: self.steps,
            runs: self.runs,
            seed: self.seed,
            keep_trajectories: self.keep_trajectories,
            optimal_arm,
        })
    }
}
