//! IBM Watson Text to Speech (premium backend)

use std::time::Duration;

use async_trait::async_trait;
use echoverse_core::{BackendError, Credentials, SpeechBackend, SynthesisConfig};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, VoiceError, status_error, transport_error};

/// Voices offered in the voice picker
pub const WATSON_VOICES: &[&str] = &[
    "en-US_LisaV3Voice",
    "en-US_MichaelV3Voice",
    "en-US_AllisonV3Voice",
];

const AUDIO_MP3: &str = "audio/mp3";

/// Error body returned by the Watson API
#[derive(Debug, Deserialize)]
struct WatsonErrorBody {
    error: String,
    #[serde(default)]
    code: Option<u16>,
}

/// Watson TTS client
pub struct WatsonTts {
    client: Client,
    api_key: String,
    base_url: String,
    default_voice: String,
    timeout: Duration,
}

impl WatsonTts {
    /// Create a Watson client from configured credentials.
    pub fn new(credentials: &Credentials, synthesis: &SynthesisConfig) -> Result<Self> {
        credentials
            .validate()
            .map_err(|e| VoiceError::ConfigError(format!("Watson TTS credentials: {}", e)))?;

        let timeout = Duration::from_secs(synthesis.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: credentials.api_key.trim().to_string(),
            base_url: credentials.base_url().to_string(),
            default_voice: synthesis.default_voice.clone(),
            timeout,
        })
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }
}

#[async_trait]
impl SpeechBackend for WatsonTts {
    fn name(&self) -> &str {
        "ibm-watson"
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> std::result::Result<Vec<u8>, BackendError> {
        let url = format!("{}/v1/synthesize", self.base_url);
        let voice = voice.unwrap_or(&self.default_voice);

        info!("Synthesizing speech: {} chars using Watson", text.chars().count());
        debug!("Voice: {}", voice);

        let response = self
            .client
            .post(&url)
            .query(&[("voice", voice)])
            .basic_auth("apikey", Some(&self.api_key))
            .header(ACCEPT, AUDIO_MP3)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<WatsonErrorBody>(&body) {
                Ok(err) => match err.code {
                    Some(code) => format!("{} (code {})", err.error, code),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(status_error(status, message));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        info!("Watson synthesis complete: {} bytes", audio.len());
        Ok(audio.to_vec())
    }
}
