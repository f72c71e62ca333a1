//! Services Retro talks to: voice output, math solving and QR codes.
//!
//! Each service sits behind a trait so sessions can be driven with
//! alternative implementations (tests use recording fakes).

mod math;
mod qr;
mod speech;

pub use math::{ArithmeticSolver, MathError, MathSolver, APOLOGY};
pub use qr::{QrGenerator, SvgQrGenerator};
pub use speech::{speech_from_config, CommandSpeech, ConsoleSpeech, SpeechOutput};
