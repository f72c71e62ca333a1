//! Scripted sessions against a temporary knowledge file.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use retro::knowledge::{Category, KnowledgeBase, KnowledgeStore};
use retro::services::{ArithmeticSolver, QrGenerator, SpeechOutput};
use retro::session::{
    LineOperator, Operator, Session, SessionSummary, FAREWELL, GREETING, UNKNOWN,
};
use retro::{RetroError, RetroResult};

/// Remembers everything said.
#[derive(Clone, Default)]
struct RecordingSpeech {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeech {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechOutput for RecordingSpeech {
    async fn speak(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

/// Records encoded payloads instead of writing images.
#[derive(Clone, Default)]
struct FakeQr {
    payloads: Arc<Mutex<Vec<String>>>,
}

impl QrGenerator for FakeQr {
    fn generate(&self, data: &str) -> RetroResult<PathBuf> {
        if data.is_empty() {
            return Err(RetroError::Qr("nothing to encode".to_string()));
        }
        self.payloads.lock().unwrap().push(data.to_string());
        Ok(PathBuf::from("qrcode.svg"))
    }
}

fn seeded_store(dir: &TempDir) -> KnowledgeStore {
    let path = dir.path().join("knowledge.json");
    let mut kb = KnowledgeBase::new();
    kb.put(Category::Personal, "what is your name", "I'm Retro.")
        .unwrap();
    kb.put(
        Category::Tft,
        "best comp",
        retro::knowledge::Answer::detailed(
            "Ionia Yunara is strong.",
            Some("Carry: Yunara. Playstyle: Fast 8.".to_string()),
        ),
    )
    .unwrap();
    let store = KnowledgeStore::new(path, kb);
    store.save().unwrap();
    store
}

/// Plays scripted lines, then fails to read.
struct BrokenInput {
    lines: Vec<&'static str>,
}

impl Operator for BrokenInput {
    fn read_line(&mut self, _prompt: &str) -> RetroResult<Option<String>> {
        if self.lines.is_empty() {
            return Err(RetroError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "terminal went away",
            )));
        }
        Ok(Some(self.lines.remove(0).to_string()))
    }

    fn confirm(&mut self, _prompt: &str) -> RetroResult<bool> {
        Ok(self.read_line("confirm")?.as_deref() == Some("yes"))
    }
}

async fn run_script(
    store: KnowledgeStore,
    script: &str,
) -> (RetroResult<SessionSummary>, Vec<String>, Session, FakeQr) {
    let speech = RecordingSpeech::default();
    let qr = FakeQr::default();
    let mut session = Session::new(
        store,
        Box::new(speech.clone()),
        Box::new(ArithmeticSolver),
        Box::new(qr.clone()),
    );

    let mut operator = LineOperator::new(Cursor::new(script.to_string()), std::io::sink());
    let result = session.run(&mut operator).await;

    (result, speech.lines(), session, qr)
}

fn reload(path: &Path) -> KnowledgeBase {
    KnowledgeStore::load(path).unwrap().into_knowledge()
}

#[tokio::test]
async fn test_known_question_is_answered() {
    let dir = TempDir::new().unwrap();
    let (result, lines, _, _) = run_script(seeded_store(&dir), "What is your name\nexit\n").await;

    let summary = result.unwrap();
    assert_eq!(summary.answered, 1);
    assert_eq!(summary.turns, 2);
    assert_eq!(
        lines,
        vec![GREETING.to_string(), "I'm Retro.".to_string(), FAREWELL.to_string()]
    );
}

#[tokio::test]
async fn test_close_question_is_answered() {
    let dir = TempDir::new().unwrap();
    let (_, lines, _, _) = run_script(seeded_store(&dir), "what's your name\nexit\n").await;

    assert_eq!(lines[1], "I'm Retro.");
}

#[tokio::test]
async fn test_tft_question_with_details() {
    let dir = TempDir::new().unwrap();
    let (_, lines, _, _) = run_script(
        seeded_store(&dir),
        "best comp\nexplain best comp\nexit\n",
    )
    .await;

    assert_eq!(lines[1], "Ionia Yunara is strong.");
    assert_eq!(lines[2], "Carry: Yunara. Playstyle: Fast 8.");
}

#[tokio::test]
async fn test_teach_flow_saves_answer() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let path = store.path().to_path_buf();

    let (result, lines, session, _) = run_script(
        store,
        "where do you live\nyes\nIn a JSON file.\nyes\nexit\n",
    )
    .await;

    assert_eq!(result.unwrap().taught, 1);
    assert!(lines.contains(&UNKNOWN.to_string()));
    assert!(lines.contains(&"Got it. I learned something new.".to_string()));
    assert_eq!(
        session.store().knowledge().personal["where do you live"],
        retro::knowledge::Answer::plain("In a JSON file.")
    );

    let kb = reload(&path);
    assert_eq!(
        kb.personal["where do you live"],
        retro::knowledge::Answer::plain("In a JSON file.")
    );
}

#[tokio::test]
async fn test_taught_answer_is_used_later_in_session() {
    let dir = TempDir::new().unwrap();
    let (_, lines, _, _) = run_script(
        seeded_store(&dir),
        "where do you live\nyes\nIn a JSON file.\nyes\nwhere do you live\nexit\n",
    )
    .await;

    assert_eq!(lines.iter().filter(|l| *l == "In a JSON file.").count(), 1);
    assert_eq!(lines[lines.len() - 2], "In a JSON file.");
}

#[tokio::test]
async fn test_declined_teach_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let path = store.path().to_path_buf();

    let (result, lines, _, _) = run_script(store, "where do you live\nno\nexit\n").await;

    assert_eq!(result.unwrap().taught, 0);
    assert!(lines.contains(&"Alright.".to_string()));
    assert!(!reload(&path).personal.contains_key("where do you live"));
}

#[tokio::test]
async fn test_unconfirmed_answer_is_dropped() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let path = store.path().to_path_buf();

    let (_, lines, _, _) = run_script(
        store,
        "where do you live\nyes\nIn a JSON file.\nno\nexit\n",
    )
    .await;

    assert!(lines.contains(&"Okay, I won't save it.".to_string()));
    assert!(!reload(&path).personal.contains_key("where do you live"));
}

#[tokio::test]
async fn test_math_question_speaks_steps() {
    let dir = TempDir::new().unwrap();
    let (result, lines, _, _) = run_script(seeded_store(&dir), "2 + 2\nexit\n").await;

    assert_eq!(result.unwrap().math, 1);
    assert_eq!(lines[1], "The expression is 2 + 2");
    assert_eq!(lines[2], "Final answer is 4");
}

#[tokio::test]
async fn test_qr_request_encodes_next_line() {
    let dir = TempDir::new().unwrap();
    let (_, lines, _, qr) = run_script(
        seeded_store(&dir),
        "make a qr code\nhttps://example.com\nexit\n",
    )
    .await;

    assert_eq!(
        qr.payloads.lock().unwrap().clone(),
        vec!["https://example.com".to_string()]
    );
    assert!(lines.contains(&"give me the link for QR code".to_string()));
    assert!(lines.contains(&"QR code created successfully as qrcode.svg".to_string()));
}

#[tokio::test]
async fn test_end_of_input_behaves_like_exit() {
    let dir = TempDir::new().unwrap();
    let (result, lines, _, _) = run_script(seeded_store(&dir), "what is your name\n").await;

    assert!(result.is_ok());
    assert_eq!(lines.last().map(String::as_str), Some(FAREWELL));
}

#[tokio::test]
async fn test_exit_expands_and_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("knowledge.json");
    let mut kb = KnowledgeBase::new();
    kb.put(
        Category::Personal,
        "what is your favorite color",
        "my favorite color is blue",
    )
    .unwrap();
    kb.put(
        Category::Personal,
        "what is your favourite color",
        "my favorite color is blue",
    )
    .unwrap();
    let store = KnowledgeStore::new(&path, kb);

    let (result, _, _, _) = run_script(store, "exit\n").await;

    assert_eq!(result.unwrap().expansion.entries_written, 1);
    let kb = reload(&path);
    assert!(kb.generated.contains_key("what is your favorite color"));
}

#[tokio::test]
async fn test_input_failure_still_expands_and_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("knowledge.json");
    let mut kb = KnowledgeBase::new();
    kb.put(
        Category::Personal,
        "what is your favorite color",
        "my favorite color is blue",
    )
    .unwrap();
    kb.put(
        Category::Personal,
        "what is your favourite color",
        "my favorite color is blue",
    )
    .unwrap();

    let speech = RecordingSpeech::default();
    let mut session = Session::new(
        KnowledgeStore::new(&path, kb),
        Box::new(speech.clone()),
        Box::new(ArithmeticSolver),
        Box::new(FakeQr::default()),
    );
    let mut operator = BrokenInput {
        lines: vec!["where do you live", "yes", "In a JSON file.", "yes"],
    };

    let err = session.run(&mut operator).await.unwrap_err();
    assert!(matches!(err, RetroError::Io(_)));

    let kb = reload(&path);
    assert!(kb.generated.contains_key("what is your favorite color"));
    assert!(kb.personal.contains_key("where do you live"));
    assert_eq!(speech.lines().last().map(String::as_str), Some(FAREWELL));
}
