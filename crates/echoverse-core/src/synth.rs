//! Speech synthesis
//!
//! `SpeechSynthesizer` picks one backend per request: the premium backend when
//! the TTS credentials are configured and a premium client was built at
//! startup, the free fallback otherwise. A failing backend fails the request;
//! there is no escalation to the other backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::conversion::Backend;
use crate::error::BackendError;
use crate::{Error, Result};

/// A text-to-speech provider returning MP3 audio.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Synthesize `text`. Backends without voice selection ignore `voice`.
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> std::result::Result<Vec<u8>, BackendError>;
}

/// Audio produced by a synthesizer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub backend: Backend,
}

/// Backend selection over a premium and a fallback provider
#[derive(Clone)]
pub struct SpeechSynthesizer {
    premium: Option<Arc<dyn SpeechBackend>>,
    fallback: Arc<dyn SpeechBackend>,
}

impl SpeechSynthesizer {
    /// Create a synthesizer that only has the free backend.
    pub fn new(fallback: Arc<dyn SpeechBackend>) -> Self {
        Self {
            premium: None,
            fallback,
        }
    }

    /// Install the premium backend
    pub fn with_premium(mut self, premium: Arc<dyn SpeechBackend>) -> Self {
        self.premium = Some(premium);
        self
    }

    pub fn has_premium(&self) -> bool {
        self.premium.is_some()
    }

    /// Backend that a request with `credentials` would use.
    pub fn backend_for(&self, credentials: &Credentials) -> Backend {
        if self.premium.is_some() && credentials.is_configured() {
            Backend::Premium
        } else {
            Backend::Fallback
        }
    }

    /// Synthesize `text` into MP3 audio.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        credentials: &Credentials,
    ) -> Result<SynthesizedAudio> {
        if text.trim().is_empty() {
            return Err(Error::no_input());
        }

        let backend = self.backend_for(credentials);
        let (provider, voice) = match (backend, &self.premium) {
            (Backend::Premium, Some(premium)) => (premium, voice),
            _ => (&self.fallback, None),
        };

        info!(
            "Synthesizing {} chars with {} backend ({})",
            text.chars().count(),
            backend,
            provider.name()
        );
        debug!("Voice: {:?}", voice);

        let bytes = provider
            .synthesize(text, voice)
            .await
            .map_err(|source| Error::Synthesis { backend, source })?;

        if bytes.is_empty() {
            return Err(Error::Synthesis {
                backend,
                source: BackendError::InvalidResponse("empty audio".to_string()),
            });
        }

        info!("Synthesis complete: {} bytes", bytes.len());
        Ok(SynthesizedAudio { bytes, backend })
    }
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("premium", &self.premium.as_ref().map(|p| p.name().to_string()))
            .field("fallback", &self.fallback.name())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockBackend;
    use super::*;

    fn configured() -> Credentials {
        Credentials::tts("key", "https://tts.example.com")
    }

    #[test]
    fn test_backend_for() {
        let premium = MockBackend::returning("premium", b"p");
        let fallback = MockBackend::returning("fallback", b"f");

        let free_only = SpeechSynthesizer::new(fallback.clone());
        assert_eq!(free_only.backend_for(&configured()), Backend::Fallback);

        let both = SpeechSynthesizer::new(fallback).with_premium(premium);
        assert_eq!(both.backend_for(&configured()), Backend::Premium);
        assert_eq!(both.backend_for(&Credentials::default()), Backend::Fallback);
    }

    #[test]
    fn test_premium_used_when_configured() {
        let premium = MockBackend::returning("premium", b"premium-audio");
        let fallback = MockBackend::returning("fallback", b"free-audio");
        let synth = SpeechSynthesizer::new(fallback.clone()).with_premium(premium.clone());

        let audio = tokio_test::block_on(synth.synthesize(
            "Hello",
            Some("en-US_MichaelV3Voice"),
            &configured(),
        ))
        .unwrap();

        assert_eq!(audio.bytes, b"premium-audio");
        assert_eq!(audio.backend, Backend::Premium);
        assert_eq!(premium.voices(), vec![Some("en-US_MichaelV3Voice".to_string())]);
        assert_eq!(fallback.calls(), 0);
    }

    #[test]
    fn test_fallback_ignores_voice() {
        let premium = MockBackend::returning("premium", b"premium-audio");
        let fallback = MockBackend::returning("fallback", b"free-audio");
        let synth = SpeechSynthesizer::new(fallback.clone()).with_premium(premium.clone());

        let audio = tokio_test::block_on(synth.synthesize(
            "Hello",
            Some("en-US_MichaelV3Voice"),
            &Credentials::default(),
        ))
        .unwrap();

        assert_eq!(audio.bytes, b"free-audio");
        assert_eq!(audio.backend, Backend::Fallback);
        assert_eq!(fallback.voices(), vec![None]);
        assert_eq!(premium.calls(), 0);
    }

    #[test]
    fn test_premium_failure_is_terminal() {
        let premium = MockBackend::failing(
            "premium",
            BackendError::Transport("connection refused".to_string()),
        );
        let fallback = MockBackend::returning("fallback", b"free-audio");
        let synth = SpeechSynthesizer::new(fallback.clone()).with_premium(premium.clone());

        let err = tokio_test::block_on(synth.synthesize("Hello", None, &configured())).unwrap_err();

        assert!(matches!(
            err,
            Error::Synthesis {
                backend: Backend::Premium,
                source: BackendError::Transport(_)
            }
        ));
        assert_eq!(premium.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[test]
    fn test_empty_text_rejected_before_backend() {
        let fallback = MockBackend::returning("fallback", b"free-audio");
        let synth = SpeechSynthesizer::new(fallback.clone());

        let err = tokio_test::block_on(synth.synthesize(" \n\t", None, &configured())).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(fallback.calls(), 0);
    }

    #[test]
    fn test_empty_audio_is_error() {
        let fallback = MockBackend::returning("fallback", b"");
        let synth = SpeechSynthesizer::new(fallback);

        let err = tokio_test::block_on(synth.synthesize("Hello", None, &configured())).unwrap_err();
        assert!(matches!(
            err,
            Error::Synthesis {
                backend: Backend::Fallback,
                source: BackendError::InvalidResponse(_)
            }
        ));
    }
}
