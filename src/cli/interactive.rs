//! Terminal interaction for Retro.
//!
//! Prompts go through dialoguer when stdin is a terminal.

use std::io::ErrorKind;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::knowledge::KnowledgeStats;
use crate::session::Operator;
use crate::RetroResult;

/// Operator backed by terminal prompts.
pub struct TerminalOperator {
    theme: ColorfulTheme,
}

impl TerminalOperator {
    /// Creates a terminal operator.
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for TerminalOperator {
    fn read_line(&mut self, prompt: &str) -> RetroResult<Option<String>> {
        let line = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();

        match line {
            Ok(line) => Ok(Some(line.trim().to_string())),
            // Ctrl-D / Ctrl-C end the session like `exit`
            Err(dialoguer::Error::IO(e))
                if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::Interrupted) =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> RetroResult<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(answer)
    }
}

/// Shows a summary of the knowledge base.
pub fn show_stats_summary(stats: &KnowledgeStats) {
    println!("\n📊 Knowledge Summary\n");
    println!("┌─────────────────────────────────────────┐");
    println!("│ Sections                                │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Personal: {:<29} │", stats.personal);
    println!("│ TFT: {:<34} │", stats.tft);
    println!("│ Generated: {:<28} │", stats.generated);
    println!("│ Archived patches: {:<21} │", stats.archived_patches);
    println!("├─────────────────────────────────────────┤");
    println!(
        "│ Patch: {:<32} │",
        stats.patch.as_deref().unwrap_or("none")
    );
    println!("└─────────────────────────────────────────┘");
    println!();
}
