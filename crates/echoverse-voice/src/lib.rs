//! echoverse-voice: speech backends for EchoVerse
//!
//! This crate provides the HTTP text-to-speech providers behind
//! [`echoverse_core::SpeechBackend`].
//!
//! ## Backends
//!
//! - **Premium**: IBM Watson Text to Speech (named voices, API key)
//! - **Fallback**: Google Translate speech endpoint (free, no voice choice)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use echoverse_core::{Config, ConversionRequest, Orchestrator, Tone};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let synthesizer = echoverse_voice::build_synthesizer(&config)?;
//!     let orchestrator = Orchestrator::new(Arc::new(config.tts.clone()), synthesizer);
//!
//!     let request = ConversionRequest::new("Hello, world!", Tone::Inspiring);
//!     let result = orchestrator.run_conversion(request).await?;
//!
//!     std::fs::write(result.file_name(), &result.audio_bytes)?;
//!     Ok(())
//! }
//! ```

pub mod chunk;
pub mod error;
pub mod google;
pub mod watson;

use std::sync::Arc;

use echoverse_core::{Config, SpeechSynthesizer};
use tracing::{info, warn};

pub use error::{Result, VoiceError};
pub use google::GoogleTranslateTts;
pub use watson::{WATSON_VOICES, WatsonTts};

/// Build the synthesizer for `config`.
///
/// The free backend is always installed. Watson is installed only when the
/// TTS credentials are configured; if the client cannot be built the free
/// backend is used instead.
pub fn build_synthesizer(config: &Config) -> Result<SpeechSynthesizer> {
    let fallback = GoogleTranslateTts::new(&config.synthesis)?;
    let synthesizer = SpeechSynthesizer::new(Arc::new(fallback));

    if let Err(e) = config.tts.validate() {
        info!("Watson TTS not configured ({}), using free voice", e);
        return Ok(synthesizer);
    }

    match WatsonTts::new(&config.tts, &config.synthesis) {
        Ok(watson) => {
            info!("Watson TTS connected at {}", config.tts.base_url());
            Ok(synthesizer.with_premium(Arc::new(watson)))
        }
        Err(e) => {
            warn!("Error initializing Watson TTS: {}", e);
            Ok(synthesizer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoverse_core::{Backend, Credentials};

    #[test]
    fn test_unconfigured_builds_fallback_only() {
        let synthesizer = build_synthesizer(&Config::default()).unwrap();
        assert!(!synthesizer.has_premium());
    }

    #[test]
    fn test_configured_builds_premium() {
        let config = Config {
            tts: Credentials::tts("key", "https://tts.example.com"),
            ..Default::default()
        };

        let synthesizer = build_synthesizer(&config).unwrap();
        assert!(synthesizer.has_premium());
        assert_eq!(synthesizer.backend_for(&config.tts), Backend::Premium);
    }

    #[test]
    fn test_watson_voices() {
        assert_eq!(WATSON_VOICES.len(), 3);
        assert!(WATSON_VOICES.contains(&"en-US_LisaV3Voice"));
    }
}
