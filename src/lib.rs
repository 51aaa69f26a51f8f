//! kbandits: stochastic k-armed bandit policies and a Monte-Carlo simulator.
//!
//! Arms are addressed by index `0..k`. A [`Policy`] picks an arm, the
//! simulator pulls it, and the reward flows back through [`Policy::update`].
//! The [`Simulator`] repeats this for many independent trials and reduces
//! the results into averaged reward, regret and optimal-arm curves.
//!
//! # Quick Start
//!
//! ```
//! use kbandits::prelude::*;
//!
//! let report = Simulator::builder()
//!     .arm(BernoulliArm::new(0.9).unwrap())
//!     .arm(BernoulliArm::new(0.1).unwrap())
//!     .policy(EpsilonGreedy::new(2, 0.1).unwrap())
//!     .policy(Ucb2::new(2, 0.5).unwrap())
//!     .steps(200)
//!     .runs(20)
//!     .seed(7)
//!     .build()
//!     .unwrap()
//!     .run();
//!
//! let ucb2 = report.summary("UCB2(alpha=0.5)").unwrap();
//! assert_eq!(ucb2.cumulative_regret.len(), 200);
//! ```
//!
//! Driving a single policy by hand:
//!
//! ```
//! use kbandits::prelude::*;
//! use rand::SeedableRng;
//!
//! let arms = [BernoulliArm::new(0.2).unwrap(), BernoulliArm::new(0.7).unwrap()];
//! let mut policy = Ucb1::new(arms.len(), 1.0).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! for _ in 0..100 {
//!     let arm = policy.select_arm(&mut rng);
//!     let reward = arms[arm].pull(&mut rng);
//!     policy.update(arm, reward);
//! }
//! assert_eq!(policy.estimates().total_pulls(), 100);
//! ```

mod arm;
pub mod config;
mod error;
pub mod policies;
mod policy;
mod simulation;
mod stats;

pub use arm::{Arm, BernoulliArm, BinomialArm, optimal_arm};
pub use error::{BanditError, Result};
pub use policy::{ArmEstimates, Policy, argmax, sample_categorical, softmax};
pub use simulation::{
    SimulationReport, Simulator, SimulatorBuilder, StepRecord, Trajectory, run_episode, trial_seed,
};
pub use stats::{Aggregator, AlgorithmSummary, ArmStatistics};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use kbandits::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AlgorithmSpec, ArmSpec, SimulationConfig};
    pub use crate::policies::{EpsilonGreedy, GradientBandit, Softmax, Ucb1, Ucb2};
    pub use crate::{
        Arm, BanditError, BernoulliArm, BinomialArm, Policy, Result, SimulationReport, Simulator,
    };
}
