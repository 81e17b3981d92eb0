//! Baseline allocation policies for driving the environment.
//!
//! These are reference agents for smoke runs and benchmarks, not learners.
//! A policy maps the latest observation (per-asset log returns) and the
//! current weights to an action; the environment normalises the action.

use crate::types::{Action, Return};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait for allocation policies.
pub trait Policy {
    fn name(&self) -> &str;

    /// Choose the next allocation.
    fn act(&mut self, observation: &[Return], weights: &[f64]) -> Action;
}

/// Keep whatever the portfolio currently holds.
#[derive(Debug, Clone, Default)]
pub struct Hold;

impl Policy for Hold {
    fn name(&self) -> &str {
        "hold"
    }

    fn act(&mut self, observation: &[Return], weights: &[f64]) -> Action {
        if weights.len() == observation.len() {
            weights.to_vec()
        } else {
            vec![1.0; observation.len()]
        }
    }
}

/// Equal weight in every asset.
#[derive(Debug, Clone, Default)]
pub struct EqualWeight;

impl Policy for EqualWeight {
    fn name(&self) -> &str {
        "equal"
    }

    fn act(&mut self, observation: &[Return], _weights: &[f64]) -> Action {
        vec![1.0; observation.len()]
    }
}

/// Uniform random allocation.
///
/// Owns its own random source so the environment's price stream is not
/// consumed by the agent.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, observation: &[Return], _weights: &[f64]) -> Action {
        // Half-open range above zero so the action always has positive mass.
        (0..observation.len())
            .map(|_| self.rng.gen_range(f64::EPSILON..1.0))
            .collect()
    }
}

/// Everything into the asset with the best last log return.
#[derive(Debug, Clone, Default)]
pub struct Momentum;

impl Policy for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn act(&mut self, observation: &[Return], _weights: &[f64]) -> Action {
        let best = observation
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut action = vec![0.0; observation.len()];
        if let Some(slot) = action.get_mut(best) {
            *slot = 1.0;
        }
        action
    }
}

/// Policy selector used by the CLI and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Hold,
    Equal,
    Random,
    Momentum,
}

impl PolicyKind {
    /// Instantiate the policy. `seed` only affects [`PolicyKind::Random`].
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Hold => Box::new(Hold),
            PolicyKind::Equal => Box::new(EqualWeight),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Momentum => Box::new(Momentum),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Hold => write!(f, "hold"),
            PolicyKind::Equal => write!(f, "equal"),
            PolicyKind::Random => write!(f, "random"),
            PolicyKind::Momentum => write!(f, "momentum"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hold" => Ok(PolicyKind::Hold),
            "equal" => Ok(PolicyKind::Equal),
            "random" => Ok(PolicyKind::Random),
            "momentum" => Ok(PolicyKind::Momentum),
            other => Err(format!("unknown policy: {}", other)),
        }
    }
}
