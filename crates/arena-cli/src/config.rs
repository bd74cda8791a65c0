use std::{fs, path::Path};

use anyhow::{Context, Result};
use match_logic::{check_catalog, Mode, Payoffs, Rules, Strategy, StrategyParams};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Tournament settings, loadable from a JSON file. Missing fields take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TournamentConfig {
    pub iterations: usize,
    pub mode: Mode,
    /// Unseeded runs draw a seed from OS entropy
    pub seed: Option<u64>,
    pub strategies: Vec<Strategy>,
    pub payoffs: Payoffs,
    pub params: StrategyParams,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            mode: Mode::Cumulative,
            seed: None,
            strategies: Strategy::CATALOG.to_vec(),
            payoffs: Payoffs::standard(),
            params: StrategyParams::default(),
        }
    }
}

impl TournamentConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    pub fn rules(&self) -> Rules {
        Rules { payoffs: self.payoffs, params: self.params }
    }

    pub fn validate(&self) -> Result<()> {
        self.rules().validate().context("invalid game rules")?;
        check_catalog(&self.strategies).context("invalid strategy list")?;
        Ok(())
    }
}
