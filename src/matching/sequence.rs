//! Gestalt (Ratcliff/Obershelp) sequence similarity.
//!
//! The ratio is `2 * M / T`, where `T` is the combined length of both strings
//! in characters and `M` the number of characters in the matching blocks:
//! the longest common substring, then recursively the longest common
//! substrings to its left and right.
//!
//! Characters that make up more than 1% of a second sequence of 200+
//! characters are "popular" and cannot seed a match, though matches may still
//! extend over them. This keeps the result identical to the classic
//! `SequenceMatcher` algorithm, so the ratio is not symmetric in general.

use std::collections::{HashMap, HashSet};

/// Minimum length of the second sequence before popular characters are pruned.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Compares two sequences of characters.
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each (non-popular) character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    /// Prepares a comparison of `a` against `b`.
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > ntest)
                .map(|(c, _)| *c)
                .collect();
            b2j.retain(|c, _| !popular.contains(c));
        }

        Self { a, b, b2j }
    }

    /// Similarity in `[0, 1]`; 1.0 when both sequences are empty.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|&(_, _, k)| k).sum();
        2.0 * matches as f64 / total as f64
    }

    /// Non-overlapping matching blocks `(i, j, size)` ordered by position.
    pub fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks.sort_unstable();
        blocks
    }

    /// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long matches the one starting earliest in `a`, then
    /// earliest in `b`, wins.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters never seed a match but may extend one.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

/// Similarity ratio of `a` against `b`.
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_empty() {
        assert!(approx(ratio("hello", "hello"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("", "abc"), 0.0));
    }

    #[test]
    fn test_known_ratios() {
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        assert!(approx(ratio("abxcd", "abcd"), 8.0 / 9.0));
        assert!(approx(ratio("abx", "abc"), 2.0 * 2.0 / 6.0));
        assert!(approx(ratio("zzz", "hi"), 0.0));
    }

    #[test]
    fn test_matching_blocks_recurse_both_sides() {
        let matcher = SequenceMatcher::new("qabxcd", "abycdf");
        assert_eq!(matcher.matching_blocks(), vec![(1, 0, 2), (4, 3, 2)]);
    }

    #[test]
    fn test_unicode_counts_characters() {
        assert!(approx(ratio("كيو", "كيو"), 1.0));
        assert!(approx(ratio("café", "cafe"), 6.0 / 8.0));
    }

    #[test]
    fn test_popular_characters_do_not_seed_matches() {
        let long = "ab".repeat(100);
        let shifted = format!("b{}", "ab".repeat(99));

        // Every character of the 200-char second sequence is popular.
        assert!(approx(ratio(&shifted, &long), 0.0));
        // Same strings the other way round: no pruning on a 199-char sequence.
        assert!(ratio(&long, &shifted) > 0.99);
    }
}
