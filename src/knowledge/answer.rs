//! Answers stored in the knowledge base.

use serde::{Deserialize, Serialize};

/// An answer to a taught question.
///
/// Knowledge files carry either a bare string or an object with a `short`
/// answer and optional `details`; both shapes load and save unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// A single answer text.
    Plain(String),
    /// A short answer with an optional longer explanation.
    Detailed {
        short: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl Answer {
    /// Creates a plain answer.
    pub fn plain(text: impl Into<String>) -> Self {
        Answer::Plain(text.into())
    }

    /// Creates a detailed answer.
    pub fn detailed(short: impl Into<String>, details: Option<String>) -> Self {
        Answer::Detailed {
            short: short.into(),
            details,
        }
    }

    /// The canonical text of the answer: the plain string or the `short` field.
    pub fn short_text(&self) -> &str {
        match self {
            Answer::Plain(text) => text,
            Answer::Detailed { short, .. } => short,
        }
    }

    /// The answer to give when the user asked for more detail.
    ///
    /// Falls back to `short` when no details were recorded.
    pub fn detail_text(&self) -> &str {
        match self {
            Answer::Plain(text) => text,
            Answer::Detailed { short, details } => details.as_deref().unwrap_or(short),
        }
    }

    /// Picks the short or detailed text.
    pub fn select(&self, wants_details: bool) -> &str {
        if wants_details {
            self.detail_text()
        } else {
            self.short_text()
        }
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Answer::Plain(text.to_string())
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Answer::Plain(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer_ignores_detail_flag() {
        let answer = Answer::plain("Paris");
        assert_eq!(answer.select(false), "Paris");
        assert_eq!(answer.select(true), "Paris");
    }

    #[test]
    fn test_detailed_falls_back_to_short() {
        let answer = Answer::detailed("Fast 8 comp", None);
        assert_eq!(answer.detail_text(), "Fast 8 comp");

        let answer = Answer::detailed("Fast 8 comp", Some("Carry: Yunara".to_string()));
        assert_eq!(answer.select(true), "Carry: Yunara");
        assert_eq!(answer.select(false), "Fast 8 comp");
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let plain: Answer = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(plain, Answer::plain("hello"));

        let detailed: Answer = serde_json::from_str(r#"{"short": "s"}"#).unwrap();
        assert_eq!(detailed, Answer::detailed("s", None));

        let detailed: Answer =
            serde_json::from_str(r#"{"short": "s", "details": "d"}"#).unwrap();
        assert_eq!(detailed, Answer::detailed("s", Some("d".to_string())));
    }

    #[test]
    fn test_detailed_without_details_omits_field() {
        let json = serde_json::to_string(&Answer::detailed("s", None)).unwrap();
        assert_eq!(json, r#"{"short":"s"}"#);
    }
}
