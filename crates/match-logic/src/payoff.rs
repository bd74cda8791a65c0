//! Discounted payoff evaluation

use serde::{Deserialize, Serialize};
use crate::error::{ArenaError, ArenaResult};
use crate::strategy::Move;

/// Standard discount applied per round.
pub const DISCOUNT_RATE: f64 = 0.999;

/// Payoff table for the Prisoner's Dilemma plus the per-round discount.
///
/// The four base values follow the usual naming: `reward` for mutual
/// cooperation, `sucker` for cooperating against a defector, `temptation`
/// for defecting against a cooperator and `punishment` for mutual defection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payoffs {
    pub reward: f64,
    pub sucker: f64,
    pub temptation: f64,
    pub punishment: f64,
    pub discount_rate: f64,
}

impl Payoffs {
    /// R=6, S=2, T=9, P=3, discounted by 0.999 per round
    pub const fn standard() -> Self {
        Self {
            reward: 6.0,
            sucker: 2.0,
            temptation: 9.0,
            punishment: 3.0,
            discount_rate: DISCOUNT_RATE,
        }
    }

    /// Multiplier for the given zero-based round.
    pub fn decay(&self, round: u64) -> f64 {
        self.discount_rate.powf(round as f64)
    }

    /// Undiscounted (score_a, score_b) for one pair of moves.
    pub fn base(&self, a: Move, b: Move) -> (f64, f64) {
        match (a, b) {
            (Move::Cooperate, Move::Cooperate) => (self.reward, self.reward),
            (Move::Cooperate, Move::Defect) => (self.sucker, self.temptation),
            (Move::Defect, Move::Cooperate) => (self.temptation, self.sucker),
            (Move::Defect, Move::Defect) => (self.punishment, self.punishment),
        }
    }

    /// Discounted (score_a, score_b) for one round.
    pub fn evaluate(&self, a: Move, b: Move, round: u64) -> (f64, f64) {
        let decay = self.decay(round);
        let (score_a, score_b) = self.base(a, b);
        (score_a * decay, score_b * decay)
    }

    /// Check the dilemma ordering T > R > P > S and a discount in (0, 1].
    pub fn validate(&self) -> ArenaResult<()> {
        let values = [self.reward, self.sucker, self.temptation, self.punishment];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ArenaError::InvalidPayoffs(
                "payoffs must be finite and non-negative".to_string(),
            ));
        }
        if !(self.temptation > self.reward
            && self.reward > self.punishment
            && self.punishment > self.sucker)
        {
            return Err(ArenaError::InvalidPayoffs(format!(
                "expected temptation > reward > punishment > sucker, got T={} R={} P={} S={}",
                self.temptation, self.reward, self.punishment, self.sucker
            )));
        }
        if !(self.discount_rate > 0.0 && self.discount_rate <= 1.0) {
            return Err(ArenaError::InvalidPayoffs(format!(
                "discount rate must be in (0, 1], got {}",
                self.discount_rate
            )));
        }
        Ok(())
    }
}

impl Default for Payoffs {
    fn default() -> Self {
        Self::standard()
    }
}

/// Standard decay `0.999^round`.
pub fn decay(round: u64) -> f64 {
    Payoffs::standard().decay(round)
}

/// Standard discounted payoff for one round.
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move, round: u64) -> (f64, f64) {
    Payoffs::standard().evaluate(a, b, round)
}

/// Total of a constant per-round payoff over `rounds` discounted rounds.
///
/// Geometric series `payoff * (1 - d^n) / (1 - d)`, or `payoff * n` when undiscounted.
pub fn closed_form_total(payoff: f64, rounds: usize, discount_rate: f64) -> f64 {
    if discount_rate == 1.0 {
        return payoff * rounds as f64;
    }
    payoff * (1.0 - discount_rate.powf(rounds as f64)) / (1.0 - discount_rate)
}
