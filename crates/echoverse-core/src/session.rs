//! Conversion sessions
//!
//! Every submission runs in a fresh [`Session`] that walks
//! `Idle -> Validating -> Transforming -> Synthesizing -> Done`, or ends in
//! `Failed` after validation or synthesis. Sessions are never reused.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::conversion::{ConversionRequest, ConversionResult, Submission};
use crate::synth::SpeechSynthesizer;
use crate::tone;
use crate::{Error, Result};

/// Pipeline state of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Validating,
    Transforming,
    Synthesizing,
    Done,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` may follow `self`.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Transforming)
                | (Validating, Failed)
                | (Transforming, Synthesizing)
                | (Synthesizing, Done)
                | (Synthesizing, Failed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Transforming => "transforming",
            Self::Synthesizing => "synthesizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// State tracker for a single submission
#[derive(Debug, Clone)]
pub struct Session {
    history: Vec<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: vec![SessionState::Idle],
        }
    }

    pub fn state(&self) -> SessionState {
        self.history
            .last()
            .copied()
            .unwrap_or(SessionState::Idle)
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Move to `next`, rejecting transitions the pipeline does not allow.
    pub fn transition(&mut self, next: SessionState) -> Result<()> {
        let from = self.state();
        if !from.can_transition_to(next) {
            return Err(Error::InvalidTransition { from, to: next });
        }

        debug!("Session {} -> {}", from, next);
        self.history.push(next);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// What the presentation layer gets back from a submission
#[derive(Debug)]
pub struct Outcome {
    /// States visited, `Idle` first
    pub states: Vec<SessionState>,
    pub result: Result<ConversionResult>,
}

impl Outcome {
    pub fn final_state(&self) -> SessionState {
        self.states.last().copied().unwrap_or(SessionState::Idle)
    }

    /// Message to show for a failed submission.
    pub fn user_message(&self) -> Option<String> {
        self.result.as_ref().err().map(Error::user_message)
    }
}

/// Runs submissions through validation, tone framing and speech synthesis.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    credentials: Arc<Credentials>,
    synthesizer: SpeechSynthesizer,
}

impl Orchestrator {
    pub fn new(credentials: Arc<Credentials>, synthesizer: SpeechSynthesizer) -> Self {
        Self {
            credentials,
            synthesizer,
        }
    }

    /// Whether conversions will use the premium backend.
    pub fn is_premium_available(&self) -> bool {
        self.synthesizer.has_premium() && self.credentials.is_configured()
    }

    /// Convert one request into audio.
    pub async fn run_conversion(&self, request: ConversionRequest) -> Result<ConversionResult> {
        let mut session = Session::new();
        session.transition(SessionState::Validating)?;
        self.run(&mut session, Ok(request)).await
    }

    /// Resolve a raw submission (file over pasted text) and convert it.
    ///
    /// Errors are returned inside the [`Outcome`] together with the states the
    /// session went through.
    pub async fn submit(&self, submission: Submission) -> Outcome {
        let mut session = Session::new();
        let result = match session.transition(SessionState::Validating) {
            Ok(()) => self.run(&mut session, submission.into_request()).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("Submission failed: {}", e);
        }

        Outcome {
            states: session.history().to_vec(),
            result,
        }
    }

    async fn run(
        &self,
        session: &mut Session,
        request: Result<ConversionRequest>,
    ) -> Result<ConversionResult> {
        let request = match request.and_then(validate) {
            Ok(request) => request,
            Err(e) => {
                session.transition(SessionState::Failed)?;
                return Err(e);
            }
        };

        session.transition(SessionState::Transforming)?;
        let transformed_text = tone::transform(&request.raw_text, request.tone);
        debug!("Applied {} tone", request.tone);

        session.transition(SessionState::Synthesizing)?;
        let audio = match self
            .synthesizer
            .synthesize(&transformed_text, request.voice_id.as_deref(), &self.credentials)
            .await
        {
            Ok(audio) => audio,
            Err(e) => {
                session.transition(SessionState::Failed)?;
                return Err(e);
            }
        };

        session.transition(SessionState::Done)?;
        info!(
            "Conversion done: {} bytes via {} backend",
            audio.bytes.len(),
            audio.backend
        );

        Ok(ConversionResult {
            original_text: request.raw_text,
            transformed_text,
            audio_bytes: audio.bytes,
            backend_used: audio.backend,
        })
    }
}

fn validate(request: ConversionRequest) -> Result<ConversionRequest> {
    if request.raw_text.trim().is_empty() {
        return Err(Error::no_input());
    }
    Ok(request)
}
