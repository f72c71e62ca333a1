//! Keyword and pattern heuristics over user input.

use crate::knowledge::Category;

/// Keywords that route a question to the TFT section.
const TFT_KEYWORDS: &[&str] = &["tft", "trait", "item", "comp", "augment", "build"];

/// Keywords asking for the detailed form of an answer.
const DETAIL_KEYWORDS: &[&str] = &["explain", "details", "more", "how"];

/// Keywords asking for a QR code.
const QR_KEYWORDS: &[&str] = &["qr", "qrcode", "كيو"];

/// Characters that make a text a math question.
const MATH_SYMBOLS: &[char] = &['+', '-', '*', '/', '^', '(', ')'];

/// What kind of question the user asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// An arithmetic expression or equation.
    Math,
    /// A TFT question.
    Tft,
    /// Anything else.
    Personal,
}

impl QuestionKind {
    /// The knowledge category answering this kind of question.
    pub fn category(self) -> Option<Category> {
        match self {
            QuestionKind::Math => None,
            QuestionKind::Tft => Some(Category::Tft),
            QuestionKind::Personal => Some(Category::Personal),
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionKind::Math => write!(f, "math"),
            QuestionKind::Tft => write!(f, "tft"),
            QuestionKind::Personal => write!(f, "personal"),
        }
    }
}

/// Input classification heuristics.
pub struct Classifier;

impl Classifier {
    /// Classifies a question. The first rule that applies wins:
    /// math, then TFT keywords, then personal.
    pub fn classify(text: &str) -> QuestionKind {
        if Self::is_math_question(text) {
            return QuestionKind::Math;
        }

        let lower = text.to_lowercase();
        if TFT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return QuestionKind::Tft;
        }

        QuestionKind::Personal
    }

    /// An `=` together with at least one digit.
    pub fn is_equation(text: &str) -> bool {
        text.contains('=') && text.chars().any(|c| c.is_ascii_digit())
    }

    /// Any digit or arithmetic symbol. Equations are math questions too.
    pub fn is_math_question(text: &str) -> bool {
        Self::is_equation(text)
            || text
                .chars()
                .any(|c| c.is_ascii_digit() || MATH_SYMBOLS.contains(&c))
    }

    /// Whether the user asked for the detailed answer.
    pub fn wants_details(text: &str) -> bool {
        let lower = text.to_lowercase();
        DETAIL_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// Whether the user asked for a QR code.
    pub fn is_qr_request(text: &str) -> bool {
        let lower = text.to_lowercase();
        QR_KEYWORDS.iter().any(|k| lower.contains(k))
    }
}
