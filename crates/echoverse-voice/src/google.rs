//! Google Translate speech endpoint (free fallback backend)
//!
//! No API key and no voice selection. Requests are limited to
//! [`MAX_CHUNK_CHARS`] characters, so longer text is fetched chunk by chunk
//! and the MP3 frames are concatenated.

use std::time::Duration;

use async_trait::async_trait;
use echoverse_core::{BackendError, SpeechBackend, SynthesisConfig};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::chunk::{MAX_CHUNK_CHARS, split_text};
use crate::error::{Result, status_error, transport_error};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; echoverse)";

/// Google Translate TTS client
pub struct GoogleTranslateTts {
    client: Client,
    base_url: String,
    language: String,
    timeout: Duration,
}

impl GoogleTranslateTts {
    pub fn new(synthesis: &SynthesisConfig) -> Result<Self> {
        let timeout = Duration::from_secs(synthesis.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: synthesis.fallback_base_url.trim_end_matches('/').to_string(),
            language: synthesis.fallback_language.clone(),
            timeout,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> std::result::Result<Vec<u8>, BackendError> {
        let url = format!("{}/translate_tts", self.base_url);
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        debug!("Fetching chunk {}/{} ({} chars)", idx, total, textlen);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        // A blocked client gets an HTML page instead of audio.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        if content_type.starts_with("text/") {
            return Err(BackendError::InvalidResponse(format!(
                "expected audio, got {}",
                content_type
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechBackend for GoogleTranslateTts {
    fn name(&self) -> &str {
        "google-translate"
    }

    async fn synthesize(
        &self,
        text: &str,
        _voice: Option<&str>,
    ) -> std::result::Result<Vec<u8>, BackendError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(BackendError::InvalidResponse(
                "no speakable text to send".to_string(),
            ));
        }

        info!(
            "Synthesizing speech: {} chars in {} chunk(s) using Google Translate",
            text.chars().count(),
            chunks.len()
        );

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        info!("Google Translate synthesis complete: {} bytes", audio.len());
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GoogleTranslateTts {
        let synthesis = SynthesisConfig {
            fallback_base_url: server.uri(),
            ..Default::default()
        };
        GoogleTranslateTts::new(&synthesis).unwrap()
    }

    fn mp3(body: &[u8]) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "audio/mpeg")
            .set_body_bytes(body.to_vec())
    }

    #[test]
    fn test_defaults() {
        let client = GoogleTranslateTts::new(&SynthesisConfig::default()).unwrap();
        assert_eq!(client.language(), "en");
        assert_eq!(client.base_url, "https://translate.google.com");
        assert_eq!(client.name(), "google-translate");
    }

    #[tokio::test]
    async fn test_single_chunk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("q", "Hello world"))
            .and(query_param("tl", "en"))
            .and(query_param("client", "tw-ob"))
            .and(query_param("total", "1"))
            .and(query_param("idx", "0"))
            .and(query_param("textlen", "11"))
            .respond_with(mp3(b"ID3-google"))
            .expect(1)
            .mount(&server)
            .await;

        let audio = client_for(&server)
            .synthesize("Hello world", Some("en-US_LisaV3Voice"))
            .await
            .unwrap();
        assert_eq!(audio, b"ID3-google");
    }

    #[tokio::test]
    async fn test_long_text_concatenates_chunks_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("idx", "0"))
            .and(query_param("total", "2"))
            .respond_with(mp3(b"first-"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("idx", "1"))
            .and(query_param("total", "2"))
            .respond_with(mp3(b"second"))
            .expect(1)
            .mount(&server)
            .await;

        let text = format!("{}. {}", "a".repeat(60), "b".repeat(60));
        let audio = client_for(&server).synthesize(&text, None).await.unwrap();
        assert_eq!(audio, b"first-second");
    }

    #[tokio::test]
    async fn test_chunk_failure_fails_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server).synthesize("Hello", None).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Api {
                status: 503,
                body: "unavailable".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_html_response_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=UTF-8")
                    .set_body_string("<html>captcha</html>"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).synthesize("Hello", None).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_punctuation_only_is_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(mp3(b"audio"))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).synthesize("?!...", None).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}
