//! Construction of the starting portfolio for an episode.
//!
//! The default universe has three assets: a risk-free `bank`, a
//! positive-drift `good_stock` and a negative-drift `bad_stock`. Drift and
//! volatility are given per episode and scaled by the horizon
//! (`mu / horizon`, `sigma * sqrt(2 / horizon)`) so the distribution of the
//! per-episode return does not depend much on how many ticks an episode has.
//!
//! All starting cash goes to the first asset of the universe. The holdings
//! are then shuffled with the caller's random source.

use crate::asset::PriceProcess;
use crate::error::{GymError, Result};
use crate::portfolio::{Holding, Portfolio};
use crate::types::Currency;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Base parameters of one asset, before horizon scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub name: String,
    /// Drift over a whole episode.
    pub mu: f64,
    /// Volatility over a whole episode.
    pub sigma: f64,
    #[serde(default = "default_initial_value")]
    pub initial_value: Currency,
}

fn default_initial_value() -> Currency { 1.0 }

impl AssetSpec {
    pub fn new(name: impl Into<String>, mu: f64, sigma: f64, initial_value: Currency) -> Self {
        Self {
            name: name.into(),
            mu,
            sigma,
            initial_value,
        }
    }
}

/// How the starting cash ends up in a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapitalAssignment {
    /// Shuffle the (asset, amount) pairs together. The cash stays with the
    /// first listed asset; only its position in the portfolio is random.
    #[default]
    ShuffleHoldings,
    /// Keep the asset order and shuffle the amounts, so a random asset
    /// receives the cash.
    ShuffleAmounts,
}

/// Asset universe and starting capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    #[serde(default = "default_start_cash")]
    pub start_cash: Currency,
    #[serde(default)]
    pub capital_assignment: CapitalAssignment,
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetSpec>,
}

fn default_start_cash() -> Currency { 10_000.0 }

fn default_assets() -> Vec<AssetSpec> {
    vec![
        AssetSpec::new("bank", 0.1, 0.0, 1.0),
        AssetSpec::new("good_stock", 1.0, 0.1, 1.0),
        AssetSpec::new("bad_stock", -1.0, 0.1, 1.0),
    ]
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            start_cash: default_start_cash(),
            capital_assignment: CapitalAssignment::default(),
            assets: default_assets(),
        }
    }
}

impl UniverseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            return Err(GymError::ConfigError(
                "universe needs at least one asset".to_string(),
            ));
        }
        if !self.start_cash.is_finite() || self.start_cash <= 0.0 {
            return Err(GymError::ConfigError(format!(
                "start cash must be positive, got {}",
                self.start_cash
            )));
        }
        Ok(())
    }
}

/// Builds episode-start portfolios.
#[derive(Debug, Clone, Default)]
pub struct PortfolioFactory {
    universe: UniverseConfig,
}

impl PortfolioFactory {
    /// Factory for the canonical three-asset universe.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_universe(universe: UniverseConfig) -> Result<Self> {
        universe.validate()?;
        Ok(Self { universe })
    }

    pub fn universe(&self) -> &UniverseConfig {
        &self.universe
    }

    /// Build a fresh portfolio scaled to `horizon` ticks.
    ///
    /// Randomness is only used for the shuffle; asset prices start at their
    /// initial values and draw from the source later, on tick.
    pub fn build<R: Rng + ?Sized>(&self, horizon: usize, rng: &mut R) -> Result<Portfolio> {
        if horizon == 0 {
            return Err(GymError::ConfigError("horizon must be positive".to_string()));
        }

        let mu_scale = 1.0 / horizon as f64;
        let sigma_scale = (2.0 / horizon as f64).sqrt();

        let mut assets = self
            .universe
            .assets
            .iter()
            .map(|spec| {
                PriceProcess::named(
                    spec.name.clone(),
                    spec.mu * mu_scale,
                    spec.sigma * sigma_scale,
                    spec.initial_value,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        // Units, not currency: the cash buys `start_cash / price` of the first asset.
        let mut amounts = vec![0.0; assets.len()];
        amounts[0] = self.universe.start_cash / assets[0].price();

        match self.universe.capital_assignment {
            CapitalAssignment::ShuffleHoldings => {
                let mut pairs: Vec<_> = assets.into_iter().zip(amounts).collect();
                pairs.shuffle(rng);
                let (shuffled_assets, shuffled_amounts): (Vec<_>, Vec<_>) =
                    pairs.into_iter().unzip();
                assets = shuffled_assets;
                amounts = shuffled_amounts;
            }
            CapitalAssignment::ShuffleAmounts => amounts.shuffle(rng),
        }

        let holdings: Vec<Holding> = assets
            .into_iter()
            .zip(amounts)
            .map(|(asset, quantity)| Holding::new(asset, quantity))
            .collect();

        let portfolio = Portfolio::new(holdings)?;
        debug!(horizon, names = ?portfolio.names(), quantities = ?portfolio.quantities(), "built portfolio");
        Ok(portfolio)
    }
}

/// Build the canonical three-asset portfolio for `horizon` ticks.
pub fn build<R: Rng + ?Sized>(horizon: usize, rng: &mut R) -> Result<Portfolio> {
    PortfolioFactory::new().build(horizon, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_horizon_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(build(0, &mut rng), Err(GymError::ConfigError(_))));
    }

    #[test]
    fn test_canonical_universe() {
        let mut rng = StdRng::seed_from_u64(42);
        let horizon = 100;
        let portfolio = build(horizon, &mut rng).unwrap();

        assert_eq!(portfolio.size(), 3);
        assert!((portfolio.value() - 10_000.0).abs() < 1e-9);

        let mut names = portfolio.names();
        names.sort();
        assert_eq!(names, vec!["bad_stock", "bank", "good_stock"]);

        for h in portfolio.holdings() {
            let (mu, sigma) = match h.asset.name() {
                "bank" => (0.1, 0.0),
                "good_stock" => (1.0, 0.1),
                "bad_stock" => (-1.0, 0.1),
                other => panic!("unexpected asset {}", other),
            };
            assert!((h.asset.mu() - mu / horizon as f64).abs() < 1e-15);
            assert!((h.asset.sigma() - sigma * (2.0 / horizon as f64).sqrt()).abs() < 1e-15);
            assert_eq!(h.asset.price(), 1.0);
        }
    }

    #[test]
    fn test_capital_in_exactly_one_asset() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let portfolio = build(50, &mut rng).unwrap();
            let funded: Vec<_> = portfolio.quantities().into_iter().filter(|q| *q > 0.0).collect();
            assert_eq!(funded.len(), 1);
            assert_eq!(funded[0], 10_000.0);
        }
    }

    #[test]
    fn test_shuffle_holdings_keeps_cash_with_bank() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let portfolio = build(50, &mut rng).unwrap();
            for h in portfolio.holdings() {
                assert_eq!(h.quantity > 0.0, h.asset.name() == "bank");
            }
        }
    }

    #[test]
    fn test_shuffle_amounts_keeps_order() {
        let universe = UniverseConfig {
            capital_assignment: CapitalAssignment::ShuffleAmounts,
            ..Default::default()
        };
        let factory = PortfolioFactory::with_universe(universe).unwrap();

        let mut funded_names = std::collections::HashSet::new();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let portfolio = factory.build(10, &mut rng).unwrap();
            assert_eq!(portfolio.names(), vec!["bank", "good_stock", "bad_stock"]);
            let idx = portfolio.quantities().iter().position(|q| *q > 0.0).unwrap();
            funded_names.insert(portfolio.names()[idx].to_string());
        }
        assert!(funded_names.len() > 1);
    }

    #[test]
    fn test_same_seed_same_portfolio() {
        let mut rng_a = StdRng::seed_from_u64(77);
        let mut rng_b = StdRng::seed_from_u64(77);
        let a = build(100, &mut rng_a).unwrap();
        let b = build(100, &mut rng_b).unwrap();
        assert_eq!(a.names(), b.names());
        assert_eq!(a.quantities(), b.quantities());
    }

    #[test]
    fn test_custom_universe_buys_units() {
        let universe = UniverseConfig {
            start_cash: 500.0,
            capital_assignment: CapitalAssignment::ShuffleHoldings,
            assets: vec![
                AssetSpec::new("cash", 0.0, 0.0, 2.0),
                AssetSpec::new("risky", 0.5, 0.3, 10.0),
            ],
        };
        let factory = PortfolioFactory::with_universe(universe).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let portfolio = factory.build(20, &mut rng).unwrap();

        assert!((portfolio.value() - 500.0).abs() < 1e-9);
        let cash = portfolio
            .holdings()
            .iter()
            .find(|h| h.asset.name() == "cash")
            .unwrap();
        assert_eq!(cash.quantity, 250.0);
    }

    #[test]
    fn test_invalid_universe_rejected() {
        let empty = UniverseConfig {
            assets: vec![],
            ..Default::default()
        };
        assert!(PortfolioFactory::with_universe(empty).is_err());

        let broke = UniverseConfig {
            start_cash: 0.0,
            ..Default::default()
        };
        assert!(PortfolioFactory::with_universe(broke).is_err());
    }
}
