//! Conversion request and result types

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tone::Tone;
use crate::{Error, Result};

/// Download name offered for the generated audio.
pub const AUDIO_FILE_NAME: &str = "audiobook.mp3";

/// MIME type offered for the generated audio.
pub const AUDIO_MIME_TYPE: &str = "audio/mp3";

/// Which speech backend produced the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Paid cloud provider with named voices
    Premium,
    /// Free provider without voice selection
    Fallback,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Premium => write!(f, "premium"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// One conversion, as handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub raw_text: String,
    pub tone: Tone,
    pub voice_id: Option<String>,
}

impl ConversionRequest {
    pub fn new(raw_text: impl Into<String>, tone: Tone) -> Self {
        Self {
            raw_text: raw_text.into(),
            tone,
            voice_id: None,
        }
    }

    /// Set voice
    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }
}

/// A `.txt` upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an upload from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Decode the upload as UTF-8 text. Only `.txt` files are accepted.
    pub fn decode(&self) -> Result<String> {
        let is_txt = Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if !is_txt {
            return Err(Error::Validation(format!(
                "only .txt uploads are supported: {}",
                self.name
            )));
        }

        String::from_utf8(self.bytes.clone()).map_err(|e| {
            Error::Validation(format!("{} is not valid UTF-8: {}", self.name, e))
        })
    }
}

/// Raw input collected by the presentation layer for one button press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Pasted or typed text
    pub text: Option<String>,
    /// Uploaded file; takes precedence over `text` when present
    pub file: Option<UploadedFile>,
    pub tone: Tone,
    pub voice_id: Option<String>,
}

impl Submission {
    pub fn from_text(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: Some(text.into()),
            tone,
            ..Default::default()
        }
    }

    pub fn from_file(file: UploadedFile, tone: Tone) -> Self {
        Self {
            file: Some(file),
            tone,
            ..Default::default()
        }
    }

    /// Set voice
    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    /// Pick the text to convert: the uploaded file if present, else the
    /// pasted text.
    pub fn into_request(self) -> Result<ConversionRequest> {
        let raw_text = match (&self.file, self.text) {
            (Some(file), _) => file.decode()?,
            (None, Some(text)) => text,
            (None, None) => return Err(Error::no_input()),
        };

        Ok(ConversionRequest {
            raw_text,
            tone: self.tone,
            voice_id: self.voice_id,
        })
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub original_text: String,
    pub transformed_text: String,
    /// MP3 audio
    pub audio_bytes: Vec<u8>,
    pub backend_used: Backend,
}

impl ConversionResult {
    pub fn file_name(&self) -> &'static str {
        AUDIO_FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        AUDIO_MIME_TYPE
    }

    /// Write the audio to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.audio_bytes)?;
        Ok(())
    }
}
