//! Knowledge - what Retro has been taught and what it derived.
//!
//! ## Components
//!
//! - **KnowledgeBase**: the five sections (`meta`, `personal`, `tft`,
//!   `archive`, `generated`) and lookups over them
//! - **KnowledgeStore**: loads and atomically saves the JSON knowledge file
//! - **Expander**: merges near-duplicate personal answers into `generated`
//! - **Patch**: archives and replaces the TFT section on a new game patch

mod answer;
mod base;
mod expander;
mod patch;
mod store;

pub use answer::Answer;
pub use base::{Category, KnowledgeBase, KnowledgeStats, Reply, ReplySource, Section};
pub use expander::{expand, ExpansionReport, EXPANSION_THRESHOLD};
pub use patch::{read_patch_entries, PatchReport};
pub use store::KnowledgeStore;
