//! Round-robin tournament over a strategy catalog

use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::{ArenaError, ArenaResult};
use crate::game::{run_match, MatchResult, Mode, Rules};
use crate::pairing::{pair_count, pair_index, round_robin_pairs, unrank_pair};
use crate::strategy::Strategy;

/// Upper-triangular table of match results, one row and column per catalog entry
///
/// Only cells `(i, j)` with `i < j` hold a result; the diagonal and the lower
/// triangle are never computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultMatrix {
    catalog: Vec<Strategy>,
    /// Row-major over the upper triangle, see [`crate::pairing`]
    results: Vec<MatchResult>,
}

/// One strategy's score summed over every match it played
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub strategy: Strategy,
    pub matches: usize,
    pub total_score: f64,
}

impl ResultMatrix {
    pub fn catalog(&self) -> &[Strategy] {
        &self.catalog
    }

    /// Result for `(i, j)`, `None` on or below the diagonal
    pub fn get(&self, i: usize, j: usize) -> Option<&MatchResult> {
        pair_index(i, j, self.catalog.len()).and_then(|rank| self.results.get(rank))
    }

    /// `((i, j), result)` in row-major order
    pub fn pairs(&self) -> impl Iterator<Item = ((usize, usize), &MatchResult)> + '_ {
        let n = self.catalog.len();
        self.results
            .iter()
            .enumerate()
            .filter_map(move |(rank, result)| unrank_pair(rank, n).map(|pair| (pair, result)))
    }

    pub fn computed_pairs(&self) -> usize {
        self.results.len()
    }

    /// Per-strategy totals, best first. Ties keep catalog order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .catalog
            .iter()
            .map(|&strategy| Standing { strategy, matches: 0, total_score: 0.0 })
            .collect();
        for ((i, j), result) in self.pairs() {
            standings[i].matches += 1;
            standings[i].total_score += result.total_score_a;
            standings[j].matches += 1;
            standings[j].total_score += result.total_score_b;
        }
        standings.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        standings
    }
}

/// Play every unordered pair of `catalog` once, sequentially
///
/// Pairs are visited row by row in catalog order and all draw from `rng`
/// in that order. The earlier strategy of a pair plays as player A.
pub fn run_tournament<R: Rng + ?Sized>(
    rules: &Rules,
    iterations: usize,
    catalog: &[Strategy],
    mode: Mode,
    rng: &mut R,
) -> ResultMatrix {
    let mut results = Vec::with_capacity(pair_count(catalog.len()));
    for (i, j) in round_robin_pairs(catalog.len()) {
        log::info!("Running game {} vs. {}...", catalog[i], catalog[j]);
        results.push(run_match(rules, iterations, catalog[i], catalog[j], mode, &mut *rng));
    }

    ResultMatrix { catalog: catalog.to_vec(), results }
}

/// Same as [`run_tournament`] but matches run on the rayon pool
///
/// The match at row-major rank `k` (see [`pair_index`]) draws from
/// `for_match(seed, k)`, so results are reproducible and independent of scheduling.
#[cfg(feature = "parallel")]
pub fn run_tournament_parallel(
    rules: &Rules,
    iterations: usize,
    catalog: &[Strategy],
    mode: Mode,
    seed: u64,
) -> ResultMatrix {
    use rayon::prelude::*;

    let results = round_robin_pairs(catalog.len())
        .into_par_iter()
        .enumerate()
        .map(|(rank, (i, j))| {
            log::info!("Running game {} vs. {}...", catalog[i], catalog[j]);
            let mut rng = crate::random::for_match(seed, rank);
            run_match(rules, iterations, catalog[i], catalog[j], mode, &mut rng)
        })
        .collect();

    ResultMatrix { catalog: catalog.to_vec(), results }
}

/// Reject catalogs that would produce no pairs, or that list a strategy twice
/// (the repeat would play itself).
pub fn check_catalog(catalog: &[Strategy]) -> ArenaResult<()> {
    if catalog.len() < 2 {
        return Err(ArenaError::EmptyCatalog { need: 2, got: catalog.len() });
    }
    for (k, strategy) in catalog.iter().enumerate() {
        if catalog[..k].contains(strategy) {
            return Err(ArenaError::DuplicateStrategy(*strategy));
        }
    }
    Ok(())
}
