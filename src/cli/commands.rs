//! Implementation of Retro's CLI commands.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::intent::Classifier;
use crate::knowledge::{self, read_patch_entries, Answer, Category, KnowledgeBase, KnowledgeStore};
use crate::services::{speech_from_config, ArithmeticSolver, MathSolver, QrGenerator, SvgQrGenerator};
use crate::session::{LineOperator, Session};
use crate::types::config::Config;
use crate::RetroResult;

use super::interactive::{show_stats_summary, TerminalOperator};

/// Initializes configuration and an empty knowledge file in the specified directory.
pub fn init(path: Option<PathBuf>) -> RetroResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    // Create directory if it doesn't exist
    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join("retro.toml");
    let config = Config::default_config();

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
    } else {
        config.save(&config_path)?;
        println!("Configuration created at: {}", config_path.display());
    }

    let knowledge_path = target_dir.join(&config.knowledge.path);
    if knowledge_path.exists() {
        println!("Knowledge file already exists at: {}", knowledge_path.display());
    } else {
        KnowledgeStore::new(&knowledge_path, KnowledgeBase::new()).save()?;
        println!("Knowledge file created at: {}", knowledge_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Start chatting: retro chat");
    println!("  2. Teach directly: retro teach \"what is your name\" \"I'm Retro.\"");

    Ok(())
}

/// Runs an interactive session.
pub async fn chat(config: &Config) -> RetroResult<()> {
    let store = KnowledgeStore::from_config(&config.knowledge)?;

    let mut session = Session::new(
        store,
        speech_from_config(&config.voice),
        Box::new(ArithmeticSolver),
        Box::new(SvgQrGenerator::from_config(&config.qr)),
    );

    let summary = if std::io::stdin().is_terminal() {
        session.run(&mut TerminalOperator::new()).await?
    } else {
        let stdin = std::io::stdin();
        let mut operator = LineOperator::new(stdin.lock(), std::io::stdout());
        session.run(&mut operator).await?
    };

    tracing::info!(
        turns = summary.turns,
        answered = summary.answered,
        taught = summary.taught,
        generated = summary.expansion.entries_written,
        "Session finished"
    );

    Ok(())
}

/// Answers one question.
pub fn ask(question: &str, config: &Config) -> RetroResult<()> {
    let raw = question.trim();

    if Classifier::is_math_question(raw) {
        for step in ArithmeticSolver.solve(raw) {
            println!("{}", step);
        }
        return Ok(());
    }

    let store = KnowledgeStore::from_config(&config.knowledge)?;
    let query = raw.to_lowercase();
    let category = Classifier::classify(&query)
        .category()
        .unwrap_or(Category::Personal);

    match store
        .knowledge()
        .lookup(category, &query, Classifier::wants_details(&query))
    {
        Some(reply) => println!("{}", reply.text),
        None => println!("I don't know that yet."),
    }

    Ok(())
}

/// Stores an answer and saves.
pub fn teach(
    question: &str,
    answer: &str,
    details: Option<String>,
    category: Category,
    config: &Config,
) -> RetroResult<()> {
    let mut store = KnowledgeStore::from_config(&config.knowledge)?;

    let answer = match details {
        Some(details) => Answer::detailed(answer, Some(details)),
        None => Answer::plain(answer),
    };

    let question = question.trim().to_lowercase();
    store.put(category, question.as_str(), answer)?;
    store.save()?;

    println!("Learned ({}): {}", category, question);
    Ok(())
}

/// Runs knowledge expansion and saves.
pub fn expand(config: &Config) -> RetroResult<()> {
    let mut store = KnowledgeStore::from_config(&config.knowledge)?;

    let report = knowledge::expand(store.knowledge_mut());
    store.save()?;

    println!("Documents: {}", report.documents);
    println!("Pairs compared: {}", report.pairs_compared);
    println!("Generated entries written: {}", report.entries_written);
    Ok(())
}

/// Installs a new TFT patch and saves.
pub fn update_tft(patch: &str, input: &Path, config: &Config) -> RetroResult<()> {
    let entries = read_patch_entries(input)?;
    let mut store = KnowledgeStore::from_config(&config.knowledge)?;

    let today = chrono::Local::now().date_naive();
    let report = store.knowledge_mut().apply_patch(patch, entries, today);
    store.save()?;

    if let Some(old) = &report.archived_as {
        println!("Previous TFT data archived as patch {}", old);
    }
    println!("TFT updated safely to patch {} ({} entries)", patch, report.entries);
    Ok(())
}

/// Prints the steps solving a math problem.
pub fn solve(expression: &str) {
    for step in ArithmeticSolver.solve(expression) {
        println!("{}", step);
    }
}

/// Writes a QR code image.
pub fn qr(data: &str, output: Option<PathBuf>, config: &Config) -> RetroResult<()> {
    let mut qr_config = config.qr.clone();
    if let Some(output) = output {
        qr_config.output = output;
    }

    let path = SvgQrGenerator::from_config(&qr_config).generate(data)?;
    println!("QR code created successfully as {}", path.display());
    Ok(())
}

/// Shows entry counts per section.
pub fn stats(config: &Config) -> RetroResult<()> {
    let store = KnowledgeStore::from_config(&config.knowledge)?;
    println!("Knowledge file: {}", store.path().display());
    show_stats_summary(&store.knowledge().stats());
    Ok(())
}

/// Shows version.
pub fn version() {
    println!("retro {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("A question-answering assistant that learns from you");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default_config();
        config.knowledge.path = dir.join("knowledge.json");
        config
    }

    #[test]
    fn test_version() {
        // Only checks that it does not panic
        version();
    }

    #[test]
    fn test_init_creates_files() {
        let dir = tempdir().unwrap();
        init(Some(dir.path().to_path_buf())).unwrap();

        assert!(dir.path().join("retro.toml").exists());
        assert!(dir.path().join("retroai").join("knowledge.json").exists());

        // Running twice keeps existing files
        init(Some(dir.path().to_path_buf())).unwrap();
    }

    #[test]
    fn test_teach_stores_lowercased_question() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        KnowledgeStore::new(&config.knowledge.path, KnowledgeBase::new())
            .save()
            .unwrap();

        teach("What Is Your Name", "I'm Retro.", None, Category::Personal, &config).unwrap();

        let store = KnowledgeStore::load(&config.knowledge.path).unwrap();
        assert_eq!(
            store.knowledge().personal["what is your name"],
            Answer::plain("I'm Retro.")
        );
    }

    #[test]
    fn test_teach_detailed_tft_answer() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        KnowledgeStore::new(&config.knowledge.path, KnowledgeBase::new())
            .save()
            .unwrap();

        teach("best comp", "Ionia", Some("Fast 8".to_string()), Category::Tft, &config).unwrap();

        let store = KnowledgeStore::load(&config.knowledge.path).unwrap();
        assert_eq!(
            store.knowledge().tft["best comp"],
            Answer::detailed("Ionia", Some("Fast 8".to_string()))
        );
    }

    #[test]
    fn test_ask_without_knowledge_file_fails() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());

        let err = ask("what is your name", &config).unwrap_err();
        assert!(err.is_storage());
    }
}
