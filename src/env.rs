//! Episode wrapper exposing the portfolio simulator to an RL loop.
//!
//! [`InvestorEnv`] owns one seeded random source and one portfolio. Each call
//! to [`InvestorEnv::step`] normalises the agent's action into weights,
//! rebalances, advances prices by one tick and reports the per-asset log
//! returns as the observation and the portfolio log return as the reward.
//!
//! # Example
//!
//! ```
//! use investor_gym::env::InvestorEnv;
//!
//! let mut env = InvestorEnv::new(20, Some(7)).unwrap();
//! let mut total = 0.0;
//! while !env.done() {
//!     let step = env.step(&[1.0, 1.0, 1.0]).unwrap();
//!     total += step.reward;
//! }
//! assert!(total.is_finite());
//! ```

use crate::error::{GymError, Result};
use crate::factory::PortfolioFactory;
use crate::policy::Policy;
use crate::portfolio::Portfolio;
use crate::types::{Bounds, Observation, Reward, Weights};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub observation: Observation,
    pub reward: Reward,
    pub done: bool,
    pub info: HashMap<String, f64>,
}

/// Outcome of one full episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub policy: String,
    pub steps: usize,
    pub total_reward: Reward,
    pub start_value: f64,
    pub final_value: f64,
    pub final_weights: Option<Weights>,
}

/// Reinforcement-learning environment around a simulated portfolio.
#[derive(Debug, Clone)]
pub struct InvestorEnv {
    horizon: usize,
    day: usize,
    seed: u64,
    rng: StdRng,
    factory: PortfolioFactory,
    portfolio: Portfolio,
}

impl InvestorEnv {
    /// Create an environment with the canonical universe.
    ///
    /// With `seed == None` a seed is drawn from the OS entropy source.
    pub fn new(horizon: usize, seed: Option<u64>) -> Result<Self> {
        Self::with_factory(horizon, seed, PortfolioFactory::new())
    }

    pub fn with_factory(
        horizon: usize,
        seed: Option<u64>,
        factory: PortfolioFactory,
    ) -> Result<Self> {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        let portfolio = factory.build(horizon, &mut rng)?;

        info!(horizon, seed, "created environment");
        Ok(Self {
            horizon,
            day: 0,
            seed,
            rng,
            factory,
            portfolio,
        })
    }

    /// Reseed the random source and return the seed in use.
    ///
    /// The current portfolio is kept: its starting allocation was drawn from
    /// the previous source. Only ticks from now on, and portfolios built by
    /// later resets, use the new seed.
    pub fn seed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        debug!(seed, "reseeded environment");
        seed
    }

    /// Start a new episode and return the initial observation.
    pub fn reset(&mut self) -> Result<Observation> {
        self.day = 0;
        self.portfolio = self.factory.build(self.horizon, &mut self.rng)?;
        debug!("environment reset");
        Ok(self.observation())
    }

    /// Apply an action and advance the simulation by one tick.
    pub fn step(&mut self, action: &[f64]) -> Result<Step> {
        if self.done() {
            return Err(GymError::EpisodeFinished);
        }

        let weights = Self::weights_from_action(action)?;
        self.portfolio.rebalance(&weights)?;
        self.portfolio.tick(&mut self.rng);
        self.day += 1;

        let step = Step {
            observation: self.observation(),
            reward: self.reward(),
            done: self.done(),
            info: self.info(),
        };
        if step.done {
            info!(day = self.day, value = self.portfolio.value(), "episode finished");
        }
        Ok(step)
    }

    /// Normalise a non-negative action vector into weights summing to one.
    pub fn weights_from_action(action: &[f64]) -> Result<Weights> {
        if action.is_empty() {
            return Err(GymError::InvalidAction("empty action".to_string()));
        }
        if action.iter().any(|a| !a.is_finite() || *a < 0.0) {
            return Err(GymError::InvalidAction(format!(
                "action components must be finite and non-negative: {:?}",
                action
            )));
        }
        let total: f64 = action.iter().sum();
        if total <= 0.0 {
            return Err(GymError::InvalidAction(
                "action must have a positive component".to_string(),
            ));
        }
        Ok(action.iter().map(|a| a / total).collect())
    }

    pub fn done(&self) -> bool {
        self.portfolio.value() <= 0.0 || self.day >= self.horizon
    }

    pub fn observation(&self) -> Observation {
        self.portfolio.asset_returns()
    }

    pub fn reward(&self) -> Reward {
        self.portfolio.portfolio_return()
    }

    /// Diagnostic values reported alongside each step.
    pub fn info(&self) -> HashMap<String, f64> {
        let mut info = HashMap::new();
        info.insert("day".to_string(), self.day as f64);
        info.insert("value".to_string(), self.portfolio.value());
        info
    }

    pub fn action_space(&self) -> Bounds {
        Bounds::new(0.0, 1.0, self.portfolio.size())
    }

    pub fn observation_space(&self) -> Bounds {
        Bounds::new(-1.0, 1.0, self.portfolio.size())
    }

    pub fn reward_range(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    /// One-line human readable state.
    pub fn render(&self) -> String {
        let weights = match self.portfolio.weights() {
            Ok(w) => w
                .iter()
                .map(|w| format!("{:.2}", w))
                .collect::<Vec<_>>()
                .join(", "),
            Err(_) => "n/a".to_string(),
        };
        format!(
            "day: {:3},\tvalue: {:.2},\tweights: ({})",
            self.day,
            self.portfolio.value(),
            weights
        )
    }

    /// Reset and play one episode to completion with `policy`.
    ///
    /// Every step is passed to `on_step`, which the CLI uses for rendering.
    pub fn run_episode<F>(
        &mut self,
        episode: usize,
        policy: &mut dyn Policy,
        mut on_step: F,
    ) -> Result<EpisodeSummary>
    where
        F: FnMut(&Self, &Step),
    {
        let mut observation = self.reset()?;
        let start_value = self.portfolio.value();
        let mut total_reward = 0.0;
        let mut steps = 0;

        while !self.done() {
            let weights = self.portfolio.weights()?;
            let action = policy.act(&observation, &weights);
            let step = self.step(&action)?;
            total_reward += step.reward;
            steps += 1;
            on_step(&*self, &step);
            observation = step.observation;
        }

        Ok(EpisodeSummary {
            episode,
            policy: policy.name().to_string(),
            steps,
            total_reward,
            start_value,
            final_value: self.portfolio.value(),
            final_weights: self.portfolio.weights().ok(),
        })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn current_seed(&self) -> u64 {
        self.seed
    }
}
