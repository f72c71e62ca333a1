//! Two-pass fuzzy matching of a query against known questions.

use super::sequence::ratio;

/// Minimum ratio for the best-match pass.
pub const CLOSE_MATCH_CUTOFF: f64 = 0.6;

/// Ratio the linear fallback pass must exceed.
pub const FALLBACK_THRESHOLD: f64 = 0.75;

/// Returns the candidate that best matches `query`, if any.
///
/// 1. Best match: the candidate with the highest ratio (candidate against
///    query) of at least [`CLOSE_MATCH_CUTOFF`]. Equal ratios go to the
///    lexicographically greatest candidate.
/// 2. Fallback: the first candidate, in order, whose ratio (query against
///    candidate) exceeds [`FALLBACK_THRESHOLD`].
///
/// `None` means the query is unknown, not that something failed.
pub fn smart_match<'a, S: AsRef<str>>(query: &str, candidates: &'a [S]) -> Option<&'a str> {
    if let Some(best) = close_match(query, candidates, CLOSE_MATCH_CUTOFF) {
        tracing::trace!(query, matched = best, "Best-match pass hit");
        return Some(best);
    }

    let fallback = candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| ratio(query, candidate) > FALLBACK_THRESHOLD);

    if let Some(candidate) = fallback {
        tracing::trace!(query, matched = candidate, "Fallback pass hit");
    }
    fallback
}

/// The single closest candidate with a ratio of at least `cutoff`.
pub fn close_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    cutoff: f64,
) -> Option<&'a str> {
    let mut best: Option<(f64, &'a str)> = None;

    for candidate in candidates.iter().map(AsRef::as_ref) {
        let score = ratio(candidate, query);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_candidate)) => {
                score > best_score || (score == best_score && candidate > best_candidate)
            }
        };
        if better {
            best = Some((score, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}
