//! TFT patch updates.
//!
//! Installing a new patch archives the current `tft` section under the
//! previous patch label, then stamps `meta` and replaces `tft`.

use std::path::Path;

use chrono::NaiveDate;

use crate::{RetroError, RetroResult};

use super::base::{meta_label, KnowledgeBase, Section};

/// Result of a patch update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// The label the previous `tft` section was archived under, if any.
    pub archived_as: Option<String>,
    /// Number of entries in the new `tft` section.
    pub entries: usize,
}

impl KnowledgeBase {
    /// Replaces the `tft` section with the data of a new patch.
    pub fn apply_patch(&mut self, label: &str, entries: Section, today: NaiveDate) -> PatchReport {
        let previous = self.meta.get("patch").and_then(meta_label);

        if let Some(old) = &previous {
            self.archive.insert(old.clone(), self.tft.clone());
        }

        self.meta
            .insert("patch".to_string(), serde_json::Value::String(label.to_string()));
        self.meta.insert(
            "last_update".to_string(),
            serde_json::Value::String(today.format("%Y-%m-%d").to_string()),
        );

        let count = entries.len();
        self.tft = entries;

        tracing::info!(
            patch = label,
            archived_as = previous.as_deref().unwrap_or("-"),
            entries = count,
            "TFT patch applied"
        );

        PatchReport {
            archived_as: previous,
            entries: count,
        }
    }
}

/// Reads the entries of a patch from a JSON object of question → answer.
pub fn read_patch_entries(path: &Path) -> RetroResult<Section> {
    let content = std::fs::read_to_string(path)?;
    let entries: Section = serde_json::from_str(&content)?;
    if entries.keys().any(|q| q.trim().is_empty()) {
        return Err(RetroError::EmptyQuestion);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{Answer, Category};
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn patch_entries() -> Section {
        let mut entries = Section::new();
        entries.insert(
            "ionia yunara wukong comp".to_string(),
            Answer::detailed(
                "Ionia Yunara & Wukong is a top tier Fast 8 comp.",
                Some("Carry: Yunara. Items: Guinsoo, IE, LW.".to_string()),
            ),
        );
        entries
    }

    #[test]
    fn test_first_patch_archives_nothing() {
        let mut kb = KnowledgeBase::new();
        kb.put(Category::Tft, "old comp", "old answer").unwrap();

        let report = kb.apply_patch("16.3", patch_entries(), date());

        assert_eq!(report.archived_as, None);
        assert!(kb.archive.is_empty());
        assert_eq!(kb.tft.len(), 1);
        assert_eq!(kb.meta["patch"], serde_json::json!("16.3"));
        assert_eq!(kb.meta["last_update"], serde_json::json!("2026-10-16"));
    }

    #[test]
    fn test_patch_archives_previous_tft() {
        let mut kb = KnowledgeBase::new();
        kb.meta
            .insert("patch".to_string(), serde_json::json!("16.2"));
        kb.put(Category::Tft, "old comp", "old answer").unwrap();

        let report = kb.apply_patch("16.3", patch_entries(), date());

        assert_eq!(report.archived_as.as_deref(), Some("16.2"));
        assert_eq!(kb.archive["16.2"]["old comp"], Answer::plain("old answer"));
        assert!(kb.tft.contains_key("ionia yunara wukong comp"));
        assert!(!kb.tft.contains_key("old comp"));
    }

    #[test]
    fn test_read_patch_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patch.json");
        std::fs::write(
            &path,
            r#"{"demacia garen lux comp": {"short": "Stable climbing comp."}}"#,
        )
        .unwrap();

        let entries = read_patch_entries(&path).unwrap();
        assert_eq!(
            entries["demacia garen lux comp"],
            Answer::detailed("Stable climbing comp.", None)
        );
    }
}
