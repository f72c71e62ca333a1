//! Knowledge expansion: synthesizes answers for near-duplicate questions.
//!
//! Every personal entry becomes a document (`question answer`). Documents are
//! embedded as TF-IDF vectors and compared pairwise with cosine similarity.
//! For each pair `i < j` above [`EXPANSION_THRESHOLD`], the answers are merged
//! into `generated[question_i]`.
//!
//! Only the lower-indexed question of a pair receives the merged entry.
//! Lookups for `question_j` keep resolving through `personal`.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use super::base::KnowledgeBase;

/// Cosine similarity above which two entries are considered duplicates.
pub const EXPANSION_THRESHOLD: f64 = 0.8;

/// Summary of an expansion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Number of documents in the corpus.
    pub documents: usize,
    /// Number of unordered pairs compared.
    pub pairs_compared: usize,
    /// Number of `generated` writes (a question may be written more than once).
    pub entries_written: usize,
}

/// Runs expansion over the personal section, writing into `generated`.
///
/// Existing generated entries are overwritten by key, never merged, so running
/// twice on the same input yields the same result. Corpora with fewer than two
/// entries, or without a single usable term, are left alone.
pub fn expand(knowledge: &mut KnowledgeBase) -> ExpansionReport {
    let entries: Vec<(String, String)> = knowledge
        .personal
        .iter()
        .map(|(question, answer)| (question.clone(), answer.short_text().to_string()))
        .collect();

    let mut report = ExpansionReport {
        documents: entries.len(),
        ..Default::default()
    };

    if entries.len() < 2 {
        tracing::debug!(documents = entries.len(), "Not enough entries to expand");
        return report;
    }

    let corpus: Vec<String> = entries
        .iter()
        .map(|(question, answer)| format!("{} {}", question, answer))
        .collect();

    let Some(vectors) = TfidfVectorizer::fit_transform(&corpus) else {
        tracing::debug!("Empty vocabulary, skipping expansion");
        return report;
    };

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            report.pairs_compared += 1;

            let similarity = cosine_similarity(&vectors[i], &vectors[j]);
            if similarity > EXPANSION_THRESHOLD {
                let (question_i, answer_i) = &entries[i];
                let (question_j, answer_j) = &entries[j];

                tracing::debug!(
                    question = %question_i,
                    duplicate = %question_j,
                    similarity,
                    "Merging near-duplicate answers"
                );

                knowledge
                    .generated
                    .insert(question_i.clone(), format!("{} {}", answer_i, answer_j));
                report.entries_written += 1;
            }
        }
    }

    tracing::info!(
        documents = report.documents,
        pairs = report.pairs_compared,
        written = report.entries_written,
        "Knowledge expanded"
    );

    report
}

/// TF-IDF vectorizer with smoothed idf and L2-normalized rows.
struct TfidfVectorizer;

impl TfidfVectorizer {
    /// Returns one dense vector per document, or `None` if no document
    /// contains a single term.
    fn fit_transform(corpus: &[String]) -> Option<Vec<Vec<f64>>> {
        let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| tokenize(doc)).collect();

        let mut vocabulary: BTreeMap<&str, usize> = BTreeMap::new();
        for token in tokenized.iter().flatten() {
            vocabulary.entry(token.as_str()).or_insert(0);
        }
        if vocabulary.is_empty() {
            return None;
        }
        for (index, slot) in vocabulary.values_mut().enumerate() {
            *slot = index;
        }

        let mut document_frequency = vec![0usize; vocabulary.len()];
        let counts: Vec<HashMap<usize, usize>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf: HashMap<usize, usize> = HashMap::new();
                for token in tokens {
                    *tf.entry(vocabulary[token.as_str()]).or_insert(0) += 1;
                }
                for term in tf.keys() {
                    document_frequency[*term] += 1;
                }
                tf
            })
            .collect();

        let n = corpus.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .iter()
            .map(|tf| {
                let mut row = vec![0.0; vocabulary.len()];
                for (&term, &count) in tf {
                    row[term] = count as f64 * idf[term];
                }
                normalize(&mut row);
                row
            })
            .collect();

        Some(vectors)
    }
}

/// Word characters are letters, numbers and `_`. Combining marks split words.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}_]{2,}").expect("token pattern is valid"));

/// Lower-cased runs of two or more word characters.
fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity of two L2-normalized vectors.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
