//! Configuration file support for simulation runs.
//!
//! Allows loading run settings and the asset universe from TOML files for
//! reproducibility.

use crate::error::{GymError, Result};
use crate::factory::{PortfolioFactory, UniverseConfig};
use crate::policy::PolicyKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Complete run configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GymFileConfig {
    /// Episode settings.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Asset universe and starting capital.
    #[serde(default)]
    pub universe: UniverseConfig,
}

/// Episode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Ticks per episode.
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    /// Number of episodes to play.
    #[serde(default = "default_episodes")]
    pub episodes: usize,
    /// Random seed (None for entropy).
    #[serde(default)]
    pub seed: Option<u64>,
    /// Baseline policy driving the episodes.
    #[serde(default = "default_policy")]
    pub policy: PolicyKind,
    /// Print the state after every step.
    #[serde(default)]
    pub render: bool,
}

fn default_horizon() -> usize { 100 }
fn default_episodes() -> usize { 10 }
fn default_policy() -> PolicyKind { PolicyKind::Equal }

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            episodes: default_episodes(),
            seed: None,
            policy: default_policy(),
            render: false,
        }
    }
}

impl GymFileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let config: GymFileConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GymError::ConfigError(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation.horizon == 0 {
            return Err(GymError::ConfigError("horizon must be positive".to_string()));
        }
        self.universe.validate()
    }

    /// Factory for the configured universe.
    pub fn factory(&self) -> Result<PortfolioFactory> {
        PortfolioFactory::with_universe(self.universe.clone())
    }

    /// Generate an example configuration file content.
    pub fn example() -> String {
        r#"# Investor Gym Configuration File

[simulation]
horizon = 100
episodes = 10
seed = 42
policy = "equal"     # hold, equal, random, momentum
render = false

[universe]
start_cash = 10000.0
# "shuffle-holdings": cash stays with the first asset, order is shuffled
# "shuffle-amounts": order is fixed, a random asset receives the cash
capital_assignment = "shuffle-holdings"

# mu and sigma are per episode; they are scaled by the horizon.
[[universe.assets]]
name = "bank"
mu = 0.1
sigma = 0.0
initial_value = 1.0

[[universe.assets]]
name = "good_stock"
mu = 1.0
sigma = 0.1
initial_value = 1.0

[[universe.assets]]
name = "bad_stock"
mu = -1.0
sigma = 0.1
initial_value = 1.0
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::CapitalAssignment;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GymFileConfig::default();
        assert_eq!(config.simulation.horizon, 100);
        assert_eq!(config.simulation.policy, PolicyKind::Equal);
        assert_eq!(config.universe.start_cash, 10_000.0);
        assert_eq!(config.universe.assets.len(), 3);
    }

    #[test]
    fn test_load_config() {
        let toml_content = r#"
[simulation]
horizon = 250
seed = 7
policy = "momentum"

[universe]
start_cash = 500.0
capital_assignment = "shuffle-amounts"

[[universe.assets]]
name = "cash"
mu = 0.0
sigma = 0.0

[[universe.assets]]
name = "index"
mu = 0.3
sigma = 0.2
initial_value = 25.0
"#;
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", toml_content).unwrap();

        let config = GymFileConfig::load(file.path()).unwrap();
        assert_eq!(config.simulation.horizon, 250);
        assert_eq!(config.simulation.episodes, 10);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.policy, PolicyKind::Momentum);
        assert_eq!(config.universe.capital_assignment, CapitalAssignment::ShuffleAmounts);
        assert_eq!(config.universe.assets[0].initial_value, 1.0);
        assert_eq!(config.universe.assets[1].initial_value, 25.0);
    }

    #[test]
    fn test_load_rejects_zero_horizon() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nhorizon = 0").unwrap();
        assert!(matches!(
            GymFileConfig::load(file.path()),
            Err(GymError::ConfigError(_))
        ));
    }

    #[test]
    fn test_save_config() {
        let config = GymFileConfig::default();
        let file = NamedTempFile::new().unwrap();
        config.save(file.path()).unwrap();

        let loaded = GymFileConfig::load(file.path()).unwrap();
        assert_eq!(loaded.simulation.horizon, config.simulation.horizon);
        assert_eq!(loaded.universe, config.universe);
    }

    #[test]
    fn test_example_config_parses() {
        let example = GymFileConfig::example();
        let config: GymFileConfig = toml::from_str(&example).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.universe, UniverseConfig::default());
    }
}
