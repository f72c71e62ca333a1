//! The interactive question/answer loop.
//!
//! Each turn is routed in order: `exit`, QR requests, math, then knowledge
//! lookup. Unknown questions start the teach flow, which asks the operator
//! for an answer, confirms it and saves the knowledge base. Leaving the
//! session runs knowledge expansion once and saves.

use crate::intent::Classifier;
use crate::knowledge::{self, Category, ExpansionReport, KnowledgeStore};
use crate::services::{MathSolver, QrGenerator, SpeechOutput};
use crate::RetroResult;

use super::operator::Operator;

pub const GREETING: &str =
    "Hello! I'm Retro. I learn, infer, and grow smarter over time. Type exit to quit.";
pub const FAREWELL: &str = "Goodbye! My knowledge has expanded.";
pub const UNKNOWN: &str = "I don't know that yet. Do you want to teach me?";

/// What happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Turns handled, including the final `exit`.
    pub turns: usize,
    /// Questions answered from knowledge.
    pub answered: usize,
    /// New answers taught and stored.
    pub taught: usize,
    /// Math questions handled.
    pub math: usize,
    /// Expansion run at the end of the session.
    pub expansion: ExpansionReport,
}

/// Outcome of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Continue,
    Exit,
}

/// A single-user session over a knowledge store.
pub struct Session {
    store: KnowledgeStore,
    speech: Box<dyn SpeechOutput>,
    solver: Box<dyn MathSolver>,
    qr: Box<dyn QrGenerator>,
    summary: SessionSummary,
}

impl Session {
    /// Creates a session owning `store`.
    pub fn new(
        store: KnowledgeStore,
        speech: Box<dyn SpeechOutput>,
        solver: Box<dyn MathSolver>,
        qr: Box<dyn QrGenerator>,
    ) -> Self {
        Self {
            store,
            speech,
            solver,
            qr,
            summary: SessionSummary::default(),
        }
    }

    /// Runs turns until the operator types `exit` or input ends, then
    /// expands and saves the knowledge base.
    ///
    /// The knowledge base is expanded and saved even when a turn fails; the
    /// turn's error is returned afterwards.
    pub async fn run<O: Operator>(&mut self, operator: &mut O) -> RetroResult<SessionSummary> {
        self.speech.speak(GREETING).await;

        let conversation = self.converse(operator).await;
        if let Err(e) = &conversation {
            tracing::error!(error = %e, "Session interrupted");
        }

        let finished = self.finish().await;
        conversation?;
        finished?;
        Ok(self.summary.clone())
    }

    async fn converse<O: Operator>(&mut self, operator: &mut O) -> RetroResult<()> {
        while let Some(line) = operator.read_line("You")? {
            if self.handle_turn(&line, operator).await? == Turn::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Handles one line of input.
    pub async fn handle_turn<O: Operator>(
        &mut self,
        raw: &str,
        operator: &mut O,
    ) -> RetroResult<Turn> {
        let raw = raw.trim();
        let input = raw.to_lowercase();
        if input.is_empty() {
            return Ok(Turn::Continue);
        }

        self.summary.turns += 1;

        if input == "exit" {
            return Ok(Turn::Exit);
        }

        if Classifier::is_qr_request(&input) {
            self.make_qr(operator).await?;
            return Ok(Turn::Continue);
        }

        if Classifier::is_math_question(raw) {
            self.summary.math += 1;
            for step in self.solver.solve(raw) {
                self.speech.speak(&step).await;
            }
            return Ok(Turn::Continue);
        }

        let kind = Classifier::classify(&input);
        let category = kind.category().unwrap_or(Category::Personal);
        let reply = self
            .store
            .knowledge()
            .lookup(category, &input, Classifier::wants_details(&input));

        match reply {
            Some(reply) => {
                tracing::debug!(query = %input, matched = %reply.key, source = ?reply.source, "Answered");
                self.summary.answered += 1;
                self.speech.speak(&reply.text).await;
            }
            None => {
                tracing::debug!(query = %input, %category, "No match");
                self.teach(category, &input, operator).await?;
            }
        }

        Ok(Turn::Continue)
    }

    async fn make_qr<O: Operator>(&mut self, operator: &mut O) -> RetroResult<()> {
        self.speech.speak("give me the link for QR code").await;

        let Some(data) = operator.read_line("QR")? else {
            return Ok(());
        };

        match self.qr.generate(&data) {
            Ok(path) => {
                let message = format!("QR code created successfully as {}", path.display());
                self.speech.speak(&message).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "QR generation failed");
                self.speech
                    .speak(&format!("I couldn't create the QR code: {}", e))
                    .await;
            }
        }
        Ok(())
    }

    async fn teach<O: Operator>(
        &mut self,
        category: Category,
        question: &str,
        operator: &mut O,
    ) -> RetroResult<()> {
        self.speech.speak(UNKNOWN).await;
        if !operator.confirm("Teach me?")? {
            self.speech.speak("Alright.").await;
            return Ok(());
        }

        let answer = operator
            .read_line("Type the answer")?
            .filter(|a| !a.trim().is_empty());
        let Some(answer) = answer else {
            self.speech.speak("Okay, I won't save it.").await;
            return Ok(());
        };

        self.speech
            .speak("Are you sure this information is correct?")
            .await;
        if !operator.confirm("Confirm")? {
            self.speech.speak("Okay, I won't save it.").await;
            return Ok(());
        }

        self.store.put(category, question, answer)?;
        self.summary.taught += 1;

        match self.store.save() {
            Ok(()) => self.speech.speak("Got it. I learned something new.").await,
            Err(e) => {
                // Kept in memory; the end-of-session save retries.
                tracing::error!(error = %e, "Failed to save taught answer");
                self.speech
                    .speak(&format!("I learned it, but saving failed: {}", e))
                    .await;
            }
        }
        Ok(())
    }

    async fn finish(&mut self) -> RetroResult<()> {
        self.summary.expansion = knowledge::expand(self.store.knowledge_mut());

        if let Err(e) = self.store.save() {
            tracing::error!(error = %e, "Failed to save knowledge at session end");
            self.speech
                .speak(&format!("I couldn't save my knowledge: {}", e))
                .await;
            return Err(e);
        }

        self.speech.speak(FAREWELL).await;
        Ok(())
    }

    /// The session's knowledge store.
    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Consumes the session, returning its store.
    pub fn into_store(self) -> KnowledgeStore {
        self.store
    }
}
