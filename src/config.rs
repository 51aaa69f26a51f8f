//! Declarative simulation configuration.
//!
//! ```yaml
//! steps: 1000
//! runs: 200
//! arms:
//!   - kind: bernoulli
//!     p: 0.9
//!   - kind: binomial
//!     n: 10
//!     p: 0.05
//! algorithms:
//!   - kind: ucb2
//!     alpha: 0.5
//!   - kind: epsilon_greedy
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::arm::{Arm, BernoulliArm, BinomialArm};
use crate::error::{BanditError, Result};
use crate::policies::{EpsilonGreedy, GradientBandit, Softmax, Ucb1, Ucb2};
use crate::policy::Policy;
use crate::simulation::Simulator;

const fn default_steps() -> usize {
    1000
}

const fn default_runs() -> usize {
    500
}

const fn default_seed() -> u64 {
    42
}

const fn default_binomial_n() -> u64 {
    10
}

const fn default_epsilon() -> f64 {
    0.1
}

const fn default_tau() -> f64 {
    1.0
}

const fn default_c() -> f64 {
    1.0
}

const fn default_ucb2_alpha() -> f64 {
    0.5
}

const fn default_gradient_alpha() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default = "default_runs")]
    pub runs: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub keep_trajectories: bool,
    pub arms: Vec<ArmSpec>,
    pub algorithms: Vec<AlgorithmSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArmSpec {
    Bernoulli {
        p: f64,
    },
    Binomial {
        #[serde(default = "default_binomial_n")]
        n: u64,
        p: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgorithmSpec {
    EpsilonGreedy {
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
    Softmax {
        #[serde(default = "default_tau")]
        tau: f64,
    },
    Ucb1 {
        #[serde(default = "default_c")]
        c: f64,
    },
    Ucb2 {
        #[serde(default = "default_ucb2_alpha")]
        alpha: f64,
    },
    GradientBandit {
        #[serde(default = "default_gradient_alpha")]
        alpha: f64,
    },
}

impl ArmSpec {
    pub fn build(&self) -> Result<Box<dyn Arm>> {
        Ok(match *self {
            ArmSpec::Bernoulli { p } => Box::new(BernoulliArm::new(p)?),
            ArmSpec::Binomial { n, p } => Box::new(BinomialArm::new(n, p)?),
        })
    }
}

impl AlgorithmSpec {
    /// Instantiate the policy for `k` arms, validating its hyperparameters.
    pub fn build(&self, k: usize) -> Result<Box<dyn Policy>> {
        Ok(match *self {
            AlgorithmSpec::EpsilonGreedy { epsilon } => Box::new(EpsilonGreedy::new(k, epsilon)?),
            AlgorithmSpec::Softmax { tau } => Box::new(Softmax::new(k, tau)?),
            AlgorithmSpec::Ucb1 { c } => Box::new(Ucb1::new(k, c)?),
            AlgorithmSpec::Ucb2 { alpha } => Box::new(Ucb2::new(k, alpha)?),
            AlgorithmSpec::GradientBandit { alpha } => Box::new(GradientBandit::new(k, alpha)?),
        })
    }
}

impl SimulationConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Validate every arm and algorithm and assemble a simulator.
    pub fn build_simulator(&self) -> Result<Simulator> {
        if self.arms.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }
        let arms = self
            .arms
            .iter()
            .map(ArmSpec::build)
            .collect::<Result<Vec<_>>>()?;
        let k = arms.len();
        let policies = self
            .algorithms
            .iter()
            .map(|spec| spec.build(k))
            .collect::<Result<Vec<_>>>()?;

        Simulator::builder()
            .arms(arms)
            .policies(policies)
            .steps(self.steps)
            .runs(self.runs)
            .seed(self.seed)
            .keep_trajectories(self.keep_trajectories)
            .build()
    }
}
