//! Investor Gym - a stochastic multi-asset portfolio simulator.
//!
//! # Overview
//!
//! Investor Gym generates the state and reward signal for a
//! reinforcement-learning agent that allocates capital across a small
//! universe of simulated assets:
//!
//! - **Price generation**: each asset follows a geometric Brownian motion
//!   driven by a caller-supplied random source
//! - **Portfolio tracking**: value, weights and log returns across holdings,
//!   with frictionless, value-preserving rebalancing
//! - **Episode construction**: a randomized three-asset starting portfolio
//!   scaled to the episode horizon
//! - **Environment wrapper**: step/reset lifecycle with observation and
//!   action spaces
//! - **Configuration files**: TOML-based configuration for reproducible runs
//!
//! # Quick Start
//!
//! ```
//! use investor_gym::factory::PortfolioFactory;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut portfolio = PortfolioFactory::new().build(100, &mut rng).unwrap();
//!
//! let start = portfolio.value();
//! let mut total = 0.0;
//! for _ in 0..100 {
//!     portfolio.rebalance(&[0.2, 0.3, 0.5]).unwrap();
//!     portfolio.tick(&mut rng);
//!     total += portfolio.portfolio_return();
//! }
//! assert!((total - (portfolio.value() / start).ln()).abs() < 1e-6);
//! ```
//!
//! # Randomness
//!
//! No component stores a random source. Every operation that draws
//! randomness takes `&mut R where R: rand::Rng`, so one source belongs to one
//! simulation run and reproducibility follows from seeding it.
//!
//! # Modules
//!
//! - [`asset`]: Single-asset GBM price process
//! - [`portfolio`]: Holdings, valuation and rebalancing
//! - [`factory`]: Episode-start portfolio construction
//! - [`env`]: Reinforcement-learning environment wrapper
//! - [`policy`]: Baseline allocation policies
//! - [`config`]: TOML configuration file support
//! - [`types`]: Shared aliases and space descriptions
//! - [`error`]: Error types

pub mod asset;
pub mod config;
pub mod env;
pub mod error;
pub mod factory;
pub mod policy;
pub mod portfolio;
pub mod types;

// Re-exports for convenience
pub use asset::PriceProcess;
pub use config::{GymFileConfig, SimulationSettings};
pub use env::{EpisodeSummary, InvestorEnv, Step};
pub use error::{GymError, Result};
pub use factory::{AssetSpec, CapitalAssignment, PortfolioFactory, UniverseConfig};
pub use policy::{EqualWeight, Hold, Momentum, Policy, PolicyKind, RandomPolicy};
pub use portfolio::{Holding, Portfolio};
pub use types::{
    Action, Bounds, Currency, Observation, Proportion, Return, Reward, Weights, WEIGHT_TOLERANCE,
};
