//! Durable storage of the knowledge base as a single JSON file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::config::KnowledgeConfig;
use crate::{RetroError, RetroResult};

use super::answer::Answer;
use super::base::{Category, KnowledgeBase};

/// Owns the knowledge base and its file.
///
/// There is exactly one store per session; nothing here is synchronized.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    path: PathBuf,
    knowledge: KnowledgeBase,
}

impl KnowledgeStore {
    /// Wraps an in-memory knowledge base that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>, knowledge: KnowledgeBase) -> Self {
        Self {
            path: path.into(),
            knowledge,
        }
    }

    /// Loads the knowledge base from `path`.
    ///
    /// Missing sections are defaulted to empty. A missing, unreadable or
    /// malformed file is a [`RetroError::Storage`].
    pub fn load(path: impl Into<PathBuf>) -> RetroResult<Self> {
        let path = path.into();

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RetroError::storage(&path, "file not found"),
            _ => RetroError::storage(&path, e),
        })?;

        let knowledge: KnowledgeBase = serde_json::from_str(&content)
            .map_err(|e| RetroError::storage(&path, format!("invalid knowledge file: {}", e)))?;

        tracing::info!(
            path = %path.display(),
            personal = knowledge.personal.len(),
            tft = knowledge.tft.len(),
            generated = knowledge.generated.len(),
            "Knowledge loaded"
        );

        Ok(Self { path, knowledge })
    }

    /// Loads the knowledge base, or starts empty if the file does not exist.
    ///
    /// Files that exist but cannot be read or parsed are still an error.
    pub fn load_or_init(path: impl Into<PathBuf>) -> RetroResult<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(path = %path.display(), "Knowledge file not found, starting empty");
        Ok(Self::new(path, KnowledgeBase::new()))
    }

    /// Opens the store configured in `retro.toml`.
    pub fn from_config(config: &KnowledgeConfig) -> RetroResult<Self> {
        if config.create_if_missing {
            Self::load_or_init(&config.path)
        } else {
            Self::load(&config.path)
        }
    }

    /// Writes the whole knowledge base back to its file.
    ///
    /// The content goes to a temporary sibling first and is renamed over the
    /// target, so readers never observe a partially written file and a failed
    /// save leaves the previous file untouched.
    pub fn save(&self) -> RetroResult<()> {
        let bytes = to_pretty_json(&self.knowledge)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RetroError::storage(&self.path, e))?;
        }

        let temp_path = temp_path_for(&self.path);
        if let Err(e) = write_synced(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(RetroError::storage(&self.path, e));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            RetroError::storage(&self.path, e)
        })?;

        tracing::info!(path = %self.path.display(), bytes = bytes.len(), "Knowledge saved");
        Ok(())
    }

    /// Inserts or overwrites an answer. Does not save.
    pub fn put(
        &mut self,
        category: Category,
        question: impl Into<String>,
        answer: impl Into<Answer>,
    ) -> RetroResult<()> {
        self.knowledge.put(category, question, answer)
    }

    /// Path of the knowledge file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The knowledge base.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Mutable access to the knowledge base.
    pub fn knowledge_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge
    }

    /// Consumes the store, returning the knowledge base.
    pub fn into_knowledge(self) -> KnowledgeBase {
        self.knowledge
    }
}

/// Serializes with four-space indentation, keeping non-ASCII text verbatim.
fn to_pretty_json<T: Serialize>(value: &T) -> RetroResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("knowledge.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
