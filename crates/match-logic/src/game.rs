//! Match execution engine

use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::ArenaResult;
use crate::payoff::Payoffs;
use crate::strategy::{execute_strategy, Move, Strategy, StrategyParams};

/// How per-round scores are aggregated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Running totals only
    #[default]
    Cumulative,
    /// Totals plus every round's score, for plotting
    Trajectory,
}

/// Game constants shared by every match of a tournament
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub payoffs: Payoffs,
    pub params: StrategyParams,
}

impl Rules {
    pub fn validate(&self) -> ArenaResult<()> {
        self.payoffs.validate()?;
        self.params.validate()
    }
}

/// Per-round discounted scores of both players
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub scores_a: Vec<f64>,
    pub scores_b: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.scores_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores_a.is_empty()
    }
}

/// Result of a complete match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub strategy_a: Strategy,
    pub strategy_b: Strategy,
    pub rounds: usize,
    pub total_score_a: f64,
    pub total_score_b: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Trajectory>,
}

impl MatchResult {
    /// `(a, b)` with two decimals, as shown in the results table
    pub fn summary(&self) -> String {
        format!("({:.2}, {:.2})", self.total_score_a, self.total_score_b)
    }
}

/// Run a complete match between two strategies
///
/// # Arguments
/// * `rules` - Payoff table and strategy parameters
/// * `iterations` - Number of rounds; zero yields an empty result
/// * `strategy_a` - First player's strategy
/// * `strategy_b` - Second player's strategy
/// * `mode` - Whether to keep every round's score
/// * `rng` - Random source shared by both players, consumed A then B each round
pub fn run_match<R: Rng + ?Sized>(
    rules: &Rules,
    iterations: usize,
    strategy_a: Strategy,
    strategy_b: Strategy,
    mode: Mode,
    rng: &mut R,
) -> MatchResult {
    let mut history_a: Vec<Move> = Vec::with_capacity(iterations);
    let mut history_b: Vec<Move> = Vec::with_capacity(iterations);
    let mut trajectory = match mode {
        Mode::Cumulative => None,
        Mode::Trajectory => Some(Trajectory {
            scores_a: Vec::with_capacity(iterations),
            scores_b: Vec::with_capacity(iterations),
        }),
    };
    let mut total_a = 0.0;
    let mut total_b = 0.0;

    for round in 0..iterations as u64 {
        // Simultaneous play: each side only sees the other's past moves
        let move_a = execute_strategy(strategy_a, &rules.params, &history_b, rng);
        let move_b = execute_strategy(strategy_b, &rules.params, &history_a, rng);
        history_a.push(move_a);
        history_b.push(move_b);

        let (score_a, score_b) = rules.payoffs.evaluate(move_a, move_b, round);
        total_a += score_a;
        total_b += score_b;

        if let Some(trajectory) = trajectory.as_mut() {
            trajectory.scores_a.push(score_a);
            trajectory.scores_b.push(score_b);
        }
    }

    log::debug!(
        "{} vs. {}: ({:.2}, {:.2}) over {} rounds",
        strategy_a,
        strategy_b,
        total_a,
        total_b,
        iterations
    );

    MatchResult {
        strategy_a,
        strategy_b,
        rounds: iterations,
        total_score_a: total_a,
        total_score_b: total_b,
        trajectory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::{closed_form_total, DISCOUNT_RATE};
    use crate::random::seeded;
    use approx::assert_relative_eq;

    fn play(a: Strategy, b: Strategy, iterations: usize, mode: Mode) -> MatchResult {
        run_match(&Rules::default(), iterations, a, b, mode, &mut seeded(42))
    }

    #[test]
    fn test_zero_iterations() {
        for a in Strategy::CATALOG {
            for b in Strategy::CATALOG {
                let result = play(a, b, 0, Mode::Trajectory);
                assert_eq!(result.rounds, 0);
                assert_eq!(result.total_score_a, 0.0);
                assert_eq!(result.total_score_b, 0.0);
                assert!(result.trajectory.unwrap().is_empty());
            }
        }
    }

    #[test]
    fn test_cooperate_vs_cooperate_matches_geometric_series() {
        for n in [1usize, 10, 1_000, 10_000] {
            let result = play(
                Strategy::AlwaysCollaborate,
                Strategy::AlwaysCollaborate,
                n,
                Mode::Cumulative,
            );
            let expected = closed_form_total(6.0, n, DISCOUNT_RATE);
            assert_relative_eq!(result.total_score_a, expected, max_relative = 1e-9);
            assert_relative_eq!(result.total_score_b, expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_defect_vs_cooperate() {
        for n in [1usize, 2, 50, 5_000] {
            let result =
                play(Strategy::AlwaysDefect, Strategy::AlwaysCollaborate, n, Mode::Cumulative);
            assert!(result.total_score_a > result.total_score_b);
            let expected_a = closed_form_total(9.0, n, DISCOUNT_RATE);
            let expected_b = closed_form_total(2.0, n, DISCOUNT_RATE);
            assert_relative_eq!(result.total_score_a, expected_a, max_relative = 1e-9);
            assert_relative_eq!(result.total_score_b, expected_b, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_tft_vs_always_defect() {
        let result = play(Strategy::TitForTat, Strategy::AlwaysDefect, 100, Mode::Trajectory);
        let trajectory = result.trajectory.unwrap();

        // Round 0: TFT cooperates, AD defects
        assert_eq!(trajectory.scores_a[0], 2.0);
        assert_eq!(trajectory.scores_b[0], 9.0);

        // Round 1+: TFT retaliates, both defect
        for round in 1..100 {
            let expected = 3.0 * DISCOUNT_RATE.powf(round as f64);
            assert_relative_eq!(trajectory.scores_a[round], expected);
            assert_relative_eq!(trajectory.scores_b[round], expected);
        }
    }

    #[test]
    fn test_tft_vs_tft_cooperates_throughout() {
        let result = play(Strategy::TitForTat, Strategy::TitForTat, 200, Mode::Cumulative);
        let expected = closed_form_total(6.0, 200, DISCOUNT_RATE);
        assert_relative_eq!(result.total_score_a, expected, max_relative = 1e-9);
        assert!(result.trajectory.is_none());
    }

    #[test]
    fn test_reputation_tft_vs_always_defect() {
        let result =
            play(Strategy::TitForTatWithReputation, Strategy::AlwaysDefect, 10, Mode::Trajectory);
        let trajectory = result.trajectory.unwrap();
        // Cooperates once, then sees a 100% defection rate and defects
        assert_eq!(trajectory.scores_a[0], 2.0);
        assert_relative_eq!(trajectory.scores_a[1], 3.0 * DISCOUNT_RATE);
    }

    #[test]
    fn test_trajectory_sums_to_totals() {
        let result =
            play(Strategy::Random, Strategy::TitForTatWithForgiveness, 1_000, Mode::Trajectory);
        let trajectory = result.trajectory.as_ref().unwrap();
        assert_eq!(trajectory.len(), 1_000);
        assert_eq!(trajectory.scores_b.len(), 1_000);
        let sum_a: f64 = trajectory.scores_a.iter().sum();
        let sum_b: f64 = trajectory.scores_b.iter().sum();
        assert_relative_eq!(sum_a, result.total_score_a, max_relative = 1e-9);
        assert_relative_eq!(sum_b, result.total_score_b, max_relative = 1e-9);
    }

    #[test]
    fn test_modes_agree_on_totals() {
        let (a, b) = (Strategy::Random, Strategy::RandomnessWithReputation);
        let cumulative = play(a, b, 500, Mode::Cumulative);
        let trajectory = play(a, b, 500, Mode::Trajectory);
        assert_eq!(cumulative.total_score_a, trajectory.total_score_a);
        assert_eq!(cumulative.total_score_b, trajectory.total_score_b);
    }

    #[test]
    fn test_match_determinism() {
        let a = play(Strategy::TitForTat, Strategy::Random, 300, Mode::Trajectory);
        let b = play(Strategy::TitForTat, Strategy::Random, 300, Mode::Trajectory);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let rules = Rules::default();
        let random = Strategy::Random;
        let a = run_match(&rules, 300, random, random, Mode::Trajectory, &mut seeded(1));
        let b = run_match(&rules, 300, random, random, Mode::Trajectory, &mut seeded(2));
        assert_ne!(a.trajectory, b.trajectory);
    }

    #[test]
    fn test_custom_payoffs() {
        let rules = Rules {
            payoffs: Payoffs { discount_rate: 1.0, ..Payoffs::standard() },
            ..Rules::default()
        };
        let defect = Strategy::AlwaysDefect;
        let result = run_match(&rules, 10, defect, defect, Mode::Cumulative, &mut seeded(0));
        assert_eq!(result.total_score_a, 30.0);
        assert_eq!(result.total_score_b, 30.0);
    }

    #[test]
    fn test_round_index_drives_decay() {
        let rules = Rules {
            payoffs: Payoffs { discount_rate: 0.5, ..Payoffs::standard() },
            ..Rules::default()
        };
        let defect = Strategy::AlwaysDefect;
        let result = run_match(&rules, 4, defect, defect, Mode::Trajectory, &mut seeded(0));
        let trajectory = result.trajectory.unwrap();
        assert_eq!(trajectory.scores_a, vec![3.0, 1.5, 0.75, 0.375]);
        assert_eq!(trajectory.scores_b, trajectory.scores_a);
    }

    #[test]
    fn test_summary_format() {
        let result =
            play(Strategy::AlwaysDefect, Strategy::AlwaysCollaborate, 1, Mode::Cumulative);
        assert_eq!(result.summary(), "(9.00, 2.00)");
    }

    #[test]
    fn test_rules_validation() {
        assert!(Rules::default().validate().is_ok());
        let rules = Rules {
            params: StrategyParams { defect_bias: -0.1, ..Default::default() },
            ..Rules::default()
        };
        assert!(rules.validate().is_err());
    }
}
