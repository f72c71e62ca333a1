//! Retro command line interface.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::knowledge::Category;

/// Retro - a question-answering assistant that learns from you.
#[derive(Parser, Debug)]
#[command(name = "retro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "retro.toml")]
    pub config: PathBuf,

    /// Verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode.
    #[arg(short, long)]
    pub quiet: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates a configuration and an empty knowledge file.
    Init {
        /// Target directory (default: current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Starts an interactive session.
    Chat,

    /// Answers a single question without teaching.
    Ask {
        /// The question.
        question: String,
    },

    /// Teaches an answer without starting a session.
    Teach {
        /// The question.
        question: String,

        /// The (short) answer.
        answer: String,

        /// Longer explanation given when the user asks for details.
        #[arg(short, long)]
        details: Option<String>,

        /// Category to store the answer in.
        #[arg(long, value_enum, default_value_t = Category::Personal)]
        category: Category,
    },

    /// Merges near-duplicate answers into generated knowledge.
    Expand,

    /// Installs the TFT data of a new game patch.
    UpdateTft {
        /// Patch label (e.g. 16.3).
        #[arg(short, long)]
        patch: String,

        /// JSON file mapping questions to answers.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Solves an arithmetic expression or equation.
    Solve {
        /// Expression or equation, e.g. "2*x + 3 = 7".
        expression: String,
    },

    /// Encodes text as a QR code image.
    Qr {
        /// Text or link to encode.
        data: String,

        /// Output SVG file (default from configuration).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shows what Retro knows.
    Stats,

    /// Shows version.
    Version,
}
