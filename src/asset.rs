//! Single-asset price generation.
//!
//! A [`PriceProcess`] follows a geometric Brownian motion sampled once per
//! tick:
//!
//! ```text
//! m_{t+1} = m_t * exp((mu - sigma^2 / 2) + sigma * Z),   Z ~ N(0, 1)
//! price_t = initial_value * m_t
//! ```
//!
//! The random source is never stored; it is borrowed for the duration of each
//! [`PriceProcess::tick`] call.
//!
//! # Example
//!
//! ```
//! use investor_gym::asset::PriceProcess;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut stock = PriceProcess::new(0.001, 0.02, 100.0).unwrap();
//!
//! let price = stock.tick(&mut rng);
//! assert!(price > 0.0);
//! assert!((stock.log_return() - (price / 100.0).ln()).abs() < 1e-12);
//! ```

use crate::error::{GymError, Result};
use crate::types::{Currency, Return};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Geometric Brownian motion price path for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceProcess {
    name: String,
    /// Drift per tick.
    mu: f64,
    /// Volatility per tick.
    sigma: f64,
    initial_value: Currency,
    /// Cumulative multiplier, product of all per-tick growth factors.
    multiplier: f64,
    last_price: Currency,
    current_price: Currency,
}

impl PriceProcess {
    /// Create an unnamed price process.
    pub fn new(mu: f64, sigma: f64, initial_value: Currency) -> Result<Self> {
        Self::named("", mu, sigma, initial_value)
    }

    /// Create a price process with a display name.
    pub fn named(
        name: impl Into<String>,
        mu: f64,
        sigma: f64,
        initial_value: Currency,
    ) -> Result<Self> {
        if !mu.is_finite() {
            return Err(GymError::ConfigError(format!("drift must be finite, got {}", mu)));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(GymError::ConfigError(format!(
                "volatility must be finite and non-negative, got {}",
                sigma
            )));
        }
        if !initial_value.is_finite() || initial_value <= 0.0 {
            return Err(GymError::ConfigError(format!(
                "initial value must be positive, got {}",
                initial_value
            )));
        }

        Ok(Self {
            name: name.into(),
            mu,
            sigma,
            initial_value,
            multiplier: 1.0,
            last_price: initial_value,
            current_price: initial_value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn initial_value(&self) -> Currency {
        self.initial_value
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Current price.
    pub fn price(&self) -> Currency {
        self.current_price
    }

    /// Price before the most recent tick.
    pub fn last_price(&self) -> Currency {
        self.last_price
    }

    /// Log return over the most recent tick.
    ///
    /// Log returns telescope: summed over any span they equal the log of the
    /// total price ratio. The expected log return over `t` ticks is
    /// `mu * t - sigma^2 * t / 2`. Zero before the first tick.
    pub fn log_return(&self) -> Return {
        (self.current_price / self.last_price).ln()
    }

    /// Advance the path by one step and return the new price.
    ///
    /// Exactly one standard normal is drawn per call, including when
    /// `sigma == 0`, so the number of draws taken from `rng` never depends on
    /// the asset parameters.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Currency {
        let z: f64 = rng.sample(StandardNormal);
        let growth = ((self.mu - self.sigma.powi(2) / 2.0) + self.sigma * z).exp();

        self.multiplier *= growth;
        self.last_price = self.current_price;
        self.current_price = self.initial_value * self.multiplier;

        trace!(asset = %self.name, z, price = self.current_price, "tick");
        self.current_price
    }

    /// Restart the path at the initial value.
    ///
    /// The random source is untouched: the next tick continues from wherever
    /// the caller's stream currently is.
    pub fn reset(&mut self) {
        self.multiplier = 1.0;
        self.last_price = self.initial_value;
        self.current_price = self.initial_value;
    }
}
