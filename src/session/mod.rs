//! Interactive sessions.
//!
//! A [`Session`] owns the knowledge store for its whole lifetime and is
//! driven by an [`Operator`] supplying lines and yes/no answers.

mod interaction;
mod operator;

pub use interaction::{Session, SessionSummary, Turn, FAREWELL, GREETING, UNKNOWN};
pub use operator::{LineOperator, Operator};
