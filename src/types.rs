//! Core data types shared by the simulator and the environment wrapper.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of money, in abstract currency units.
pub type Currency = f64;

/// Log return, a float in (-inf, inf).
pub type Return = f64;

/// A float in [0.0, 1.0].
pub type Proportion = f64;

/// Portfolio weights, aligned by position with the holdings.
pub type Weights = Vec<Proportion>;

/// Per-asset log returns handed to the agent.
pub type Observation = Vec<Return>;

/// Raw, unnormalised allocation proposed by the agent.
pub type Action = Vec<f64>;

/// One-step reward, the portfolio log return.
pub type Reward = Return;

/// Tolerance used when checking that weights sum to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Box-shaped space: every component lies in `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
    pub dim: usize,
}

impl Bounds {
    pub fn new(low: f64, high: f64, dim: usize) -> Self {
        Self { low, high, dim }
    }

    /// Check whether a vector lies inside the box.
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.dim && values.iter().all(|v| *v >= self.low && *v <= self.high)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Box({}, {}, ({},))", self.low, self.high, self.dim)
    }
}
