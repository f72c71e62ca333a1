//! Intent detection: question classification and request keywords.

mod classifier;

pub use classifier::{Classifier, QuestionKind};
