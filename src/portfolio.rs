//! Portfolio aggregation, value tracking and frictionless rebalancing.

use crate::asset::PriceProcess;
use crate::error::{GymError, Result};
use crate::types::{Currency, Observation, Return, Weights, WEIGHT_TOLERANCE};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An asset paired with the number of units held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset: PriceProcess,
    pub quantity: f64,
}

impl Holding {
    pub fn new(asset: PriceProcess, quantity: f64) -> Self {
        Self { asset, quantity }
    }

    /// Market value of this holding.
    pub fn market_value(&self) -> Currency {
        self.asset.price() * self.quantity
    }
}

/// A fixed, ordered set of holdings.
///
/// The position of a holding is its identity: weight vectors passed to
/// [`Portfolio::rebalance`] and returned by [`Portfolio::weights`] are
/// aligned with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
    last_total_value: Currency,
    current_total_value: Currency,
}

impl Portfolio {
    /// Create a portfolio from a non-empty list of holdings.
    pub fn new(holdings: Vec<Holding>) -> Result<Self> {
        if holdings.is_empty() {
            return Err(GymError::ConfigError(
                "portfolio needs at least one holding".to_string(),
            ));
        }
        if let Some((i, h)) = holdings
            .iter()
            .enumerate()
            .find(|(_, h)| !h.quantity.is_finite() || h.quantity < 0.0)
        {
            return Err(GymError::ConfigError(format!(
                "holding {} has invalid quantity {}",
                i, h.quantity
            )));
        }

        let value = holdings.iter().map(Holding::market_value).sum();
        Ok(Self {
            holdings,
            last_total_value: value,
            current_total_value: value,
        })
    }

    /// Number of holdings.
    pub fn size(&self) -> usize {
        self.holdings.len()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Asset display names in holding order.
    pub fn names(&self) -> Vec<&str> {
        self.holdings.iter().map(|h| h.asset.name()).collect()
    }

    /// Current price of each asset in holding order.
    pub fn prices(&self) -> Vec<Currency> {
        self.holdings.iter().map(|h| h.asset.price()).collect()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.holdings.iter().map(|h| h.quantity).collect()
    }

    /// Total market value, `sum(price_i * quantity_i)`.
    pub fn value(&self) -> Currency {
        self.holdings.iter().map(Holding::market_value).sum()
    }

    /// Total value before the most recent tick.
    pub fn last_value(&self) -> Currency {
        self.last_total_value
    }

    /// Share of total value held in each asset.
    ///
    /// Fails with [`GymError::DomainError`] when the portfolio is worth
    /// nothing or its value is not finite, since the shares are undefined.
    pub fn weights(&self) -> Result<Weights> {
        let value = self.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(GymError::DomainError(format!(
                "weights undefined for portfolio value {}",
                value
            )));
        }
        Ok(self
            .holdings
            .iter()
            .map(|h| h.market_value() / value)
            .collect())
    }

    /// Most recent log return of every asset, in holding order.
    pub fn asset_returns(&self) -> Observation {
        self.holdings.iter().map(|h| h.asset.log_return()).collect()
    }

    /// Log return of the whole portfolio over the most recent tick.
    ///
    /// Summed over consecutive ticks this equals `ln(value_end / value_start)`.
    /// Zero when the value did not change, including a worthless portfolio.
    pub fn portfolio_return(&self) -> Return {
        if self.current_total_value == self.last_total_value {
            return 0.0;
        }
        (self.current_total_value / self.last_total_value).ln()
    }

    /// Advance every asset by one step.
    ///
    /// The value before and after are taken around the same set of asset
    /// ticks so that successive portfolio returns telescope.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let before = self.value();
        for holding in &mut self.holdings {
            holding.asset.tick(rng);
        }
        self.last_total_value = before;
        self.current_total_value = self.value();

        debug!(
            value = self.current_total_value,
            ret = self.portfolio_return(),
            "portfolio tick"
        );
    }

    /// Reallocate quantities so realized weights match `weights`.
    ///
    /// Total value is preserved. Nothing is mutated unless the whole weight
    /// vector is valid and the portfolio has a finite positive value with
    /// every price finite and positive.
    pub fn rebalance(&mut self, weights: &[f64]) -> Result<()> {
        if let Err(e) = self
            .validate_weights(weights)
            .and_then(|_| self.validate_rebalance_state())
        {
            warn!("rejected rebalance: {}", e);
            return Err(e);
        }

        let value = self.value();
        for (holding, weight) in self.holdings.iter_mut().zip(weights) {
            holding.quantity = value * weight / holding.asset.price();
        }
        self.current_total_value = self.value();

        debug!(value, ?weights, "rebalanced");
        Ok(())
    }

    fn validate_rebalance_state(&self) -> Result<()> {
        let value = self.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(GymError::DomainError(format!(
                "cannot rebalance portfolio with value {}",
                value
            )));
        }
        if let Some((i, h)) = self
            .holdings
            .iter()
            .enumerate()
            .find(|(_, h)| !h.asset.price().is_finite() || h.asset.price() <= 0.0)
        {
            return Err(GymError::DomainError(format!(
                "cannot rebalance: asset {} has price {}",
                i,
                h.asset.price()
            )));
        }
        Ok(())
    }

    fn validate_weights(&self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.holdings.len() {
            return Err(GymError::InvalidWeights(format!(
                "expected {} weights, got {}",
                self.holdings.len(),
                weights.len()
            )));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(GymError::InvalidWeights(format!(
                "weight {} is {}, must be a non-negative number",
                i, w
            )));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(GymError::InvalidWeights(format!(
                "weights sum to {}, expected 1.0",
                sum
            )));
        }
        Ok(())
    }
}
