//! echoverse-core: EchoVerse core library
//!
//! Configuration, tone framing, speech backend selection and the session
//! orchestrator that turns submitted text into an audiobook MP3.

pub mod config;
pub mod conversion;
pub mod error;
pub mod session;
pub mod synth;
pub mod tone;

pub use config::{Config, Credentials, OutputConfig, SynthesisConfig};
pub use conversion::{
    AUDIO_FILE_NAME, AUDIO_MIME_TYPE, Backend, ConversionRequest, ConversionResult, Submission,
    UploadedFile,
};
pub use error::{BackendError, Error, Result};
pub use session::{Orchestrator, Outcome, Session, SessionState};
pub use synth::{SpeechBackend, SpeechSynthesizer, SynthesizedAudio};
pub use tone::Tone;
