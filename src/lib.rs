//! # Retro
//!
//! A small question-answering assistant that learns from its user.
//!
//! Retro classifies each question, looks it up with two-pass fuzzy matching
//! over what it has been taught, asks to be taught when it does not know, and
//! merges near-duplicate answers into new knowledge at the end of a session.
//!
//! ## Modules
//!
//! - [`knowledge`] - Knowledge base, JSON store, expansion and TFT patches
//! - [`matching`] - Sequence similarity and the two-pass matcher
//! - [`intent`] - Question classification heuristics
//! - [`services`] - Voice output, math solving, QR codes
//! - [`session`] - The interactive teach-and-answer loop
//! - [`cli`] - Command line interface
//! - [`types`] - Configuration and errors

#[cfg(feature = "cli")]
pub mod cli;
pub mod intent;
pub mod knowledge;
pub mod matching;
pub mod services;
pub mod session;
pub mod types;

pub use types::config::Config;
pub use types::errors::{RetroError, RetroResult};
