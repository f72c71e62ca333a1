//! The in-memory knowledge base.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::matching::smart_match;
use crate::{RetroError, RetroResult};

use super::answer::Answer;

/// Question → answer mapping, kept in insertion order.
pub type Section = IndexMap<String, Answer>;

/// A category of taught knowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// General questions about anything.
    Personal,
    /// Teamfight Tactics questions (comps, items, traits).
    Tft,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Personal => write!(f, "personal"),
            Category::Tft => write!(f, "tft"),
        }
    }
}

/// Everything Retro knows.
///
/// Every section defaults to empty, so files written by older versions (or
/// by hand) with sections missing still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Free-form versioning metadata (`patch`, `last_update`, ...).
    #[serde(default)]
    pub meta: IndexMap<String, serde_json::Value>,

    /// Answers taught for general questions.
    #[serde(default)]
    pub personal: Section,

    /// Answers for the TFT domain.
    #[serde(default)]
    pub tft: Section,

    /// Snapshots of previous `tft` sections, keyed by patch label.
    #[serde(default)]
    pub archive: IndexMap<String, Section>,

    /// Answers synthesized from near-duplicate personal entries.
    #[serde(default)]
    pub generated: IndexMap<String, String>,
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// A directly taught answer.
    Taught(Category),
    /// A synthesized answer from the `generated` section.
    Generated,
}

/// A resolved answer for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The stored question the query matched.
    pub key: String,
    /// The answer text to give.
    pub text: String,
    pub source: ReplySource,
}

/// Entry counts per section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeStats {
    pub personal: usize,
    pub tft: usize,
    pub generated: usize,
    pub archived_patches: usize,
    pub patch: Option<String>,
}

impl KnowledgeBase {
    /// Creates an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the section of a category.
    pub fn section(&self, category: Category) -> &Section {
        match category {
            Category::Personal => &self.personal,
            Category::Tft => &self.tft,
        }
    }

    fn section_mut(&mut self, category: Category) -> &mut Section {
        match category {
            Category::Personal => &mut self.personal,
            Category::Tft => &mut self.tft,
        }
    }

    /// Inserts or overwrites `question → answer` in a category.
    ///
    /// Does not persist anything; the caller decides when to save.
    pub fn put(
        &mut self,
        category: Category,
        question: impl Into<String>,
        answer: impl Into<Answer>,
    ) -> RetroResult<()> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(RetroError::EmptyQuestion);
        }

        let replaced = self
            .section_mut(category)
            .insert(question.clone(), answer.into())
            .is_some();

        tracing::debug!(%category, question = %question, replaced, "Knowledge entry stored");
        Ok(())
    }

    /// Finds the answer for a query in a category.
    ///
    /// Candidates are the category's questions followed by the generated
    /// questions. A matched key present in `generated` is answered from there.
    pub fn lookup(&self, category: Category, query: &str, wants_details: bool) -> Option<Reply> {
        let section = self.section(category);
        let keys: Vec<&str> = section
            .keys()
            .chain(self.generated.keys())
            .map(String::as_str)
            .collect();

        let key = smart_match(query, &keys)?;

        if let Some(text) = self.generated.get(key) {
            return Some(Reply {
                key: key.to_string(),
                text: text.clone(),
                source: ReplySource::Generated,
            });
        }

        section.get(key).map(|answer| Reply {
            key: key.to_string(),
            text: answer.select(wants_details).to_string(),
            source: ReplySource::Taught(category),
        })
    }

    /// The current patch label, if any.
    pub fn patch(&self) -> Option<String> {
        self.meta.get("patch").and_then(meta_label)
    }

    /// Entry counts per section.
    pub fn stats(&self) -> KnowledgeStats {
        KnowledgeStats {
            personal: self.personal.len(),
            tft: self.tft.len(),
            generated: self.generated.len(),
            archived_patches: self.archive.len(),
            patch: self.patch(),
        }
    }
}

/// Reads a metadata scalar as a label. Numbers are accepted since hand-edited
/// files may store a patch like `16.3` unquoted.
pub(crate) fn meta_label(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.put(Category::Personal, "what is your name", "I'm Retro.")
            .unwrap();
        kb.put(
            Category::Tft,
            "demacia garen lux comp",
            Answer::detailed(
                "Demacia Lux & Garen is a stable climbing comp.",
                Some("Lux items: Blue Buff, JG.".to_string()),
            ),
        )
        .unwrap();
        kb
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Personal.to_string(), "personal");
        assert_eq!(Category::Tft.to_string(), "tft");
    }

    #[test]
    fn test_put_rejects_empty_question() {
        let mut kb = KnowledgeBase::new();
        let err = kb.put(Category::Personal, "   ", "x").unwrap_err();
        assert!(matches!(err, RetroError::EmptyQuestion));
        assert!(kb.personal.is_empty());
    }

    #[test]
    fn test_put_overwrites() {
        let mut kb = sample();
        kb.put(Category::Personal, "what is your name", "Retro!")
            .unwrap();

        assert_eq!(kb.personal.len(), 1);
        assert_eq!(kb.personal["what is your name"], Answer::plain("Retro!"));
    }

    #[test]
    fn test_lookup_fuzzy_hit() {
        let kb = sample();
        let reply = kb
            .lookup(Category::Personal, "what is your nam", false)
            .unwrap();

        assert_eq!(reply.key, "what is your name");
        assert_eq!(reply.text, "I'm Retro.");
        assert_eq!(reply.source, ReplySource::Taught(Category::Personal));
    }

    #[test]
    fn test_lookup_selects_detail_level() {
        let kb = sample();

        let short = kb.lookup(Category::Tft, "demacia garen lux comp", false).unwrap();
        assert_eq!(short.text, "Demacia Lux & Garen is a stable climbing comp.");

        let details = kb.lookup(Category::Tft, "demacia garen lux comp", true).unwrap();
        assert_eq!(details.text, "Lux items: Blue Buff, JG.");
    }

    #[test]
    fn test_lookup_prefers_generated_answer() {
        let mut kb = sample();
        kb.generated.insert(
            "what is your name".to_string(),
            "I'm Retro. Nice to meet you.".to_string(),
        );

        let reply = kb
            .lookup(Category::Personal, "what is your name", false)
            .unwrap();
        assert_eq!(reply.source, ReplySource::Generated);
        assert_eq!(reply.text, "I'm Retro. Nice to meet you.");
    }

    #[test]
    fn test_lookup_miss() {
        let kb = sample();
        assert!(kb.lookup(Category::Personal, "zzzzzz", false).is_none());
    }

    #[test]
    fn test_stats_and_numeric_patch() {
        let mut kb = sample();
        kb.meta.insert("patch".to_string(), serde_json::json!(16.3));

        let stats = kb.stats();
        assert_eq!(stats.personal, 1);
        assert_eq!(stats.tft, 1);
        assert_eq!(stats.generated, 0);
        assert_eq!(stats.patch.as_deref(), Some("16.3"));
    }
}
