//! Strategy definitions and execution

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::{ArenaError, ArenaResult};

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

/// The fixed strategy catalog, declared in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Always defect, never cooperate.
    AlwaysDefect,
    /// Always cooperate, never defect.
    AlwaysCollaborate,
    /// Copy opponent's last move. Start with cooperate.
    TitForTat,
    /// Fair coin flip each round.
    Random,
    /// Tit-for-Tat, but cooperate anyway with a small probability.
    TitForTatWithForgiveness,
    /// Cooperate, mirror or defect depending on the opponent's defection rate.
    TitForTatWithReputation,
    /// Weighted coin biased toward defection.
    RandomnessWithReputation,
}

impl Strategy {
    /// All strategies in catalog order. Order fixes table rows and which pairs are played.
    pub const CATALOG: [Strategy; 7] = [
        Strategy::AlwaysDefect,
        Strategy::AlwaysCollaborate,
        Strategy::TitForTat,
        Strategy::Random,
        Strategy::TitForTatWithForgiveness,
        Strategy::TitForTatWithReputation,
        Strategy::RandomnessWithReputation,
    ];

    /// Human-readable catalog label
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AlwaysDefect => "always defect",
            Strategy::AlwaysCollaborate => "always collaborate",
            Strategy::TitForTat => "tit-for-tat",
            Strategy::Random => "random",
            Strategy::TitForTatWithForgiveness => "tit-for-tat with forgiveness",
            Strategy::TitForTatWithReputation => "tit-for-tat with reputation",
            Strategy::RandomnessWithReputation => "randomness with reputation",
        }
    }

    /// Identifier used on the command line and in serialized config
    pub fn id(&self) -> &'static str {
        match self {
            Strategy::AlwaysDefect => "always_defect",
            Strategy::AlwaysCollaborate => "always_collaborate",
            Strategy::TitForTat => "tit_for_tat",
            Strategy::Random => "random",
            Strategy::TitForTatWithForgiveness => "tit_for_tat_with_forgiveness",
            Strategy::TitForTatWithReputation => "tit_for_tat_with_reputation",
            Strategy::RandomnessWithReputation => "randomness_with_reputation",
        }
    }

    /// One-based position in [`Strategy::CATALOG`]
    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    /// Whether the strategy consumes randomness
    pub fn is_stochastic(&self) -> bool {
        matches!(
            self,
            Strategy::Random
                | Strategy::TitForTatWithForgiveness
                | Strategy::RandomnessWithReputation
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ArenaError;

    /// Accepts either the catalog label or the identifier.
    /// Case, dashes, underscores and spaces are not significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |text: &str| -> String {
            text.chars()
                .filter(|c| !matches!(c, '-' | '_' | ' '))
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = normalize(s.trim());
        Strategy::CATALOG
            .iter()
            .copied()
            .find(|strategy| normalize(strategy.id()) == wanted)
            .ok_or_else(|| ArenaError::UnknownStrategy(s.to_string()))
    }
}

/// Tunable constants for the randomized and reputation-based strategies
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Probability that forgiving Tit-for-Tat cooperates regardless of history
    pub forgiveness: f64,
    /// Defection rate below which reputation Tit-for-Tat cooperates
    pub reputation_low: f64,
    /// Defection rate from which reputation Tit-for-Tat always defects
    pub reputation_high: f64,
    /// Probability that randomness-with-reputation defects
    pub defect_bias: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            forgiveness: 0.1,
            reputation_low: 1.0 / 3.0,
            reputation_high: 2.0 / 3.0,
            defect_bias: 0.7,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> ArenaResult<()> {
        let probabilities = [
            ("forgiveness", self.forgiveness),
            ("reputation_low", self.reputation_low),
            ("reputation_high", self.reputation_high),
            ("defect_bias", self.defect_bias),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArenaError::InvalidParams(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.reputation_low > self.reputation_high {
            return Err(ArenaError::InvalidParams(format!(
                "reputation_low ({}) exceeds reputation_high ({})",
                self.reputation_low, self.reputation_high
            )));
        }
        Ok(())
    }
}

/// Opponent's defection rate, `None` before the first round.
///
/// A high value means the opponent defects a lot.
pub fn reputation(opponent_history: &[Move]) -> Option<f64> {
    if opponent_history.is_empty() {
        return None;
    }
    let defections = opponent_history
        .iter()
        .filter(|m| **m == Move::Defect)
        .count();
    Some(defections as f64 / opponent_history.len() as f64)
}

/// Next move with the default parameters
pub fn next_move<R: Rng + ?Sized>(
    strategy: Strategy,
    opponent_history: &[Move],
    rng: &mut R,
) -> Move {
    execute_strategy(strategy, &StrategyParams::default(), opponent_history, rng)
}

/// Execute a strategy for one round
///
/// # Arguments
/// * `strategy` - The strategy to execute
/// * `params` - Probabilities and thresholds for the stochastic strategies
/// * `opponent_history` - Opponent's past moves in this match, oldest first
/// * `rng` - Random source, drawn from only by stochastic strategies
pub fn execute_strategy<R: Rng + ?Sized>(
    strategy: Strategy,
    params: &StrategyParams,
    opponent_history: &[Move],
    rng: &mut R,
) -> Move {
    match strategy {
        Strategy::AlwaysDefect => Move::Defect,
        Strategy::AlwaysCollaborate => Move::Cooperate,
        Strategy::TitForTat => execute_tit_for_tat(opponent_history),
        Strategy::Random => execute_random(rng),
        Strategy::TitForTatWithForgiveness => {
            execute_forgiving_tit_for_tat(opponent_history, params, rng)
        }
        Strategy::TitForTatWithReputation => {
            execute_reputation_tit_for_tat(opponent_history, params)
        }
        Strategy::RandomnessWithReputation => execute_weighted_random(params, rng),
    }
}

/// Tit-for-Tat: Copy opponent's last move, start with cooperate
fn execute_tit_for_tat(opponent_history: &[Move]) -> Move {
    opponent_history.last().copied().unwrap_or(Move::Cooperate)
}

fn execute_random<R: Rng + ?Sized>(rng: &mut R) -> Move {
    if rng.gen_bool(0.5) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Draws every call, even on the first round
fn execute_forgiving_tit_for_tat<R: Rng + ?Sized>(
    opponent_history: &[Move],
    params: &StrategyParams,
    rng: &mut R,
) -> Move {
    let roll: f64 = rng.gen();
    if roll < params.forgiveness {
        return Move::Cooperate;
    }
    execute_tit_for_tat(opponent_history)
}

/// Low defection rate: cooperate. Middling: mirror. High: defect.
fn execute_reputation_tit_for_tat(opponent_history: &[Move], params: &StrategyParams) -> Move {
    let Some(rate) = reputation(opponent_history) else {
        return Move::Cooperate;
    };
    if rate < params.reputation_low {
        Move::Cooperate
    } else if rate < params.reputation_high {
        execute_tit_for_tat(opponent_history)
    } else {
        Move::Defect
    }
}

/// Ignores history entirely
fn execute_weighted_random<R: Rng + ?Sized>(params: &StrategyParams, rng: &mut R) -> Move {
    let roll: f64 = rng.gen();
    if roll < params.defect_bias {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Get a human-readable description of a strategy
pub fn describe_strategy(strategy: Strategy, params: &StrategyParams) -> String {
    match strategy {
        Strategy::AlwaysDefect => "Never cooperates. Always defects.".to_string(),
        Strategy::AlwaysCollaborate => "Never defects. Always cooperates.".to_string(),
        Strategy::TitForTat => "Copies opponent's last move. Starts by cooperating.".to_string(),
        Strategy::Random => "Cooperates or defects with equal probability.".to_string(),
        Strategy::TitForTatWithForgiveness => format!(
            "Tit-for-tat with a {:.0}% chance to cooperate anyway.",
            params.forgiveness * 100.0
        ),
        Strategy::TitForTatWithReputation => format!(
            "Cooperates while the opponent defects under {:.0}% of the time, \
             mirrors up to {:.0}%, defects beyond.",
            params.reputation_low * 100.0,
            params.reputation_high * 100.0
        ),
        Strategy::RandomnessWithReputation => format!(
            "Defects with probability {:.0}%, ignoring history.",
            params.defect_bias * 100.0
        ),
    }
}
