//! Concrete selection policies.
//!
//! All of them share the same [`ArmEstimates`](crate::policy::ArmEstimates)
//! base state and differ only in how the next arm is chosen and which extra
//! bookkeeping `update` performs.

mod epsilon_greedy;
mod gradient;
mod softmax;
mod ucb1;
pub mod ucb2;

pub use crate::policy::Policy;
pub use epsilon_greedy::EpsilonGreedy;
pub use gradient::GradientBandit;
pub use softmax::Softmax;
pub use ucb1::Ucb1;
pub use ucb2::{TAU_MAX, Ucb2};
