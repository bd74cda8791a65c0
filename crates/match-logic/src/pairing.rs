//! Round-robin pairing over an ordered catalog
//!
//! Pairs are ranked row-major: (0,1), (0,2), ..., (0,n-1), (1,2), ...
//! The rank doubles as the match index for per-match random streams.

/// Number of unordered pairs without self-play: `C(n,2)`
pub fn pair_count(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    n * (n - 1) / 2
}

/// All pairs `(i, j)` with `i < j`, in row-major order
pub fn round_robin_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect()
}

/// Row-major rank of pair `(i, j)`; `None` unless `i < j < n`
pub fn pair_index(i: usize, j: usize, n: usize) -> Option<usize> {
    if i >= j || j >= n {
        return None;
    }
    // Rows before i hold (n-1) + (n-2) + ... + (n-i) pairs
    let before = i * (2 * n - i - 1) / 2;
    Some(before + (j - i - 1))
}

/// Inverse of [`pair_index`]
pub fn unrank_pair(rank: usize, n: usize) -> Option<(usize, usize)> {
    if rank >= pair_count(n) {
        return None;
    }
    let mut remaining = rank;
    for i in 0..n {
        let row = n - i - 1;
        if remaining < row {
            return Some((i, i + 1 + remaining));
        }
        remaining -= row;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalogs() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert!(round_robin_pairs(0).is_empty());
        assert!(round_robin_pairs(1).is_empty());
    }

    #[test]
    fn test_two_players() {
        assert_eq!(round_robin_pairs(2), vec![(0, 1)]);
    }

    #[test]
    fn test_full_catalog_has_21_pairs() {
        let pairs = round_robin_pairs(7);
        assert_eq!(pairs.len(), 21);
        assert_eq!(pair_count(7), 21);
        assert_eq!(pairs[0], (0, 1));
        assert_eq!(pairs[5], (0, 6));
        assert_eq!(pairs[6], (1, 2));
        assert_eq!(pairs[20], (5, 6));
    }

    #[test]
    fn test_no_self_or_reversed_pairs() {
        for (a, b) in round_robin_pairs(12) {
            assert!(a < b, "Pairing not ordered: {} >= {}", a, b);
        }
    }

    #[test]
    fn test_no_duplicate_pairings() {
        let pairs = round_robin_pairs(15);
        let mut sorted = pairs.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), pairs.len());
    }

    #[test]
    fn test_pair_index_matches_enumeration() {
        for n in 0..12 {
            for (rank, (i, j)) in round_robin_pairs(n).into_iter().enumerate() {
                assert_eq!(pair_index(i, j, n), Some(rank));
                assert_eq!(unrank_pair(rank, n), Some((i, j)));
            }
            assert_eq!(unrank_pair(pair_count(n), n), None);
        }
    }

    #[test]
    fn test_pair_index_rejects_lower_triangle() {
        assert_eq!(pair_index(3, 3, 7), None);
        assert_eq!(pair_index(4, 2, 7), None);
        assert_eq!(pair_index(2, 7, 7), None);
    }
}
