//! Fuzzy matching of user questions against known questions.

mod matcher;
mod sequence;

pub use matcher::{close_match, smart_match, CLOSE_MATCH_CUTOFF, FALLBACK_THRESHOLD};
pub use sequence::{ratio, SequenceMatcher};
