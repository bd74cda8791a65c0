//! Match Logic for Prisoner's Arena
//!
//! Core game logic for iterated Prisoner's Dilemma tournaments between a
//! fixed catalog of strategies:
//! - `payoff`: discounted payoff per round
//! - `strategy`: next-move policy for each catalog strategy
//! - `game`: one multi-round match
//! - `tournament`: every unordered pair of a catalog

mod error;
mod game;
mod payoff;
mod pairing;
mod random;
mod strategy;
mod tournament;

pub use error::{ArenaError, ArenaResult};
pub use game::{run_match, MatchResult, Mode, Rules, Trajectory};
pub use payoff::{closed_form_total, decay, payoff, Payoffs, DISCOUNT_RATE};
pub use pairing::{pair_count, pair_index, round_robin_pairs, unrank_pair};
pub use random::{for_match, from_entropy, seeded};
pub use strategy::{
    describe_strategy, execute_strategy, next_move, reputation, Move, Strategy, StrategyParams,
};
pub use tournament::{check_catalog, run_tournament, ResultMatrix, Standing};

#[cfg(feature = "parallel")]
pub use tournament::run_tournament_parallel;
