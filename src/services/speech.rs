//! Voice output.
//!
//! Speaking is fire-and-forget: the text is always echoed to the console and,
//! when voice is enabled, handed to an external text-to-speech command.
//! Playback failures are logged and never reach the caller.

use std::process::Stdio;

use async_trait::async_trait;

use crate::types::config::VoiceConfig;

/// Something that can say a line to the user.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Says `text`. Returns once the line has been delivered.
    async fn speak(&self, text: &str);
}

/// Prints lines as `AI: <text>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSpeech;

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    async fn speak(&self, text: &str) {
        println!("AI: {}", text);
    }
}

/// Prints lines and plays them through a text-to-speech command.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    command: String,
    args: Vec<String>,
}

impl CommandSpeech {
    /// Creates a speaker for `command`, passing `args` before the text.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Creates a speaker from the `[voice]` configuration.
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Returns the text-to-speech command.
    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl SpeechOutput for CommandSpeech {
    async fn speak(&self, text: &str) {
        println!("AI: {}", text);

        let status = tokio::process::Command::new(&self.command)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => {
                tracing::warn!(command = %self.command, %status, "Text-to-speech command failed");
            }
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "Text-to-speech unavailable");
            }
        }
    }
}

/// Builds the speaker described by the configuration.
pub fn speech_from_config(config: &VoiceConfig) -> Box<dyn SpeechOutput> {
    if config.enabled {
        Box::new(CommandSpeech::from_config(config))
    } else {
        Box::new(ConsoleSpeech)
    }
}
