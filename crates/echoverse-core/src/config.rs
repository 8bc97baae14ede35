//! Configuration management
//!
//! Settings are resolved in this order (later wins):
//! 1. Defaults (placeholder credentials, free backend)
//! 2. `.streamlit/secrets.toml`
//! 3. `echoverse.toml`
//! 4. Environment variables
//!
//! `${VAR_NAME}` references inside a configuration file are expanded from the
//! environment before parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::Error;

/// Placeholder shipped in the sample secrets file for the TTS API key.
pub const TTS_API_KEY_PLACEHOLDER: &str = "your_tts_api_key_here";

/// Placeholders for the TTS service URL. Both spellings circulate in sample
/// secrets files.
pub const TTS_URL_PLACEHOLDERS: &[&str] = &["your_tts_url_here", "your_tts_service_url_here"];

pub const WATSONX_API_KEY_PLACEHOLDER: &str = "your_watsonx_api_key_here";
pub const WATSONX_URL_PLACEHOLDERS: &[&str] = &["your_watsonx_url_here"];

/// Default configuration file name in the working directory.
pub const CONFIG_FILE: &str = "echoverse.toml";

/// Secrets file used by existing deployments (flat uppercase keys).
pub const SECRETS_FILE: &str = ".streamlit/secrets.toml";

/// API credentials for a hosted service.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub service_url: String,
    key_placeholder: &'static str,
    url_placeholders: &'static [&'static str],
}

impl Credentials {
    /// Text-to-speech credentials.
    pub fn tts(api_key: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            service_url: service_url.into(),
            key_placeholder: TTS_API_KEY_PLACEHOLDER,
            url_placeholders: TTS_URL_PLACEHOLDERS,
        }
    }

    /// watsonx.ai credentials. Recognized for compatibility with existing
    /// secrets files; the conversion pipeline does not use them.
    pub fn watsonx(api_key: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            service_url: service_url.into(),
            key_placeholder: WATSONX_API_KEY_PLACEHOLDER,
            url_placeholders: WATSONX_URL_PLACEHOLDERS,
        }
    }

    /// Check the credentials and explain why they are unusable.
    pub fn validate(&self) -> crate::Result<()> {
        let key = self.api_key.trim();
        let url = self.service_url.trim();

        if key.is_empty() {
            return Err(Error::Config("API key is not set".to_string()));
        }
        if key == self.key_placeholder {
            return Err(Error::Config("API key is still the placeholder value".to_string()));
        }
        if url.is_empty() {
            return Err(Error::Config("service URL is not set".to_string()));
        }
        if self.url_placeholders.contains(&url) {
            return Err(Error::Config(
                "service URL is still the placeholder value".to_string(),
            ));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "service URL must start with http:// or https://: {}",
                url
            )));
        }

        Ok(())
    }

    /// True iff both fields are set and are not placeholders.
    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }

    /// Service URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.service_url.trim().trim_end_matches('/')
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::tts(TTS_API_KEY_PLACEHOLDER, TTS_URL_PLACEHOLDERS[0])
    }
}

/// Speech synthesis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Request timeout for either backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Voice used by the premium backend when the request names none
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Language code sent to the free backend
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,

    /// Base URL of the free backend
    #[serde(default = "default_fallback_base_url")]
    pub fallback_base_url: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            default_voice: default_voice(),
            fallback_language: default_fallback_language(),
            fallback_base_url: default_fallback_base_url(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_output_file(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_voice() -> String {
    "en-US_LisaV3Voice".to_string()
}

fn default_fallback_language() -> String {
    "en".to_string()
}

fn default_fallback_base_url() -> String {
    "https://translate.google.com".to_string()
}

fn default_output_file() -> String {
    "audiobook.mp3".to_string()
}

/// Main configuration for echoverse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Text-to-speech credentials (selects the premium backend)
    pub tts: Credentials,

    /// watsonx.ai credentials (recognized, unused by the pipeline)
    pub watsonx: Credentials,

    pub synthesis: SynthesisConfig,

    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tts: Credentials::default(),
            watsonx: Credentials::watsonx(WATSONX_API_KEY_PLACEHOLDER, WATSONX_URL_PLACEHOLDERS[0]),
            synthesis: SynthesisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Expand `${VAR_NAME}` references using `lookup`.
    ///
    /// Unknown variables expand to the empty string.
    fn expand_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if !var_name.is_empty() {
                    if let Some(env_value) = lookup(&var_name) {
                        result.push_str(&env_value);
                    }
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    fn expand_env_vars(value: &str) -> String {
        Self::expand_vars(value, |name| std::env::var(name).ok())
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// Both the sectioned layout (`[tts] api_key = ...`) and the flat
    /// secrets layout (`TTS_API_KEY = ...`) are accepted.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let mut cfg = Self::default();
        cfg.merge_toml(Self::read_toml(path)?);
        cfg.apply_env_overrides();

        debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// Parse configuration from TOML text without consulting the environment.
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let mut cfg = Self::default();
        cfg.merge_toml(Self::parse_toml(content)?);
        Ok(cfg)
    }

    /// Load configuration from the default locations in the working directory.
    pub fn load() -> crate::Result<Self> {
        Self::load_from_dir(".")
    }

    /// Load configuration from `dir`.
    ///
    /// `.streamlit/secrets.toml` is read first and `echoverse.toml` is layered
    /// on top of it; only the keys and sections a file sets replace earlier
    /// values. Environment variables are applied last.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> crate::Result<Self> {
        let mut cfg = Self::load_files(dir.as_ref())?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn load_files(dir: &Path) -> crate::Result<Self> {
        let mut cfg = Self::default();

        for name in [SECRETS_FILE, CONFIG_FILE] {
            let path = dir.join(name);
            if path.exists() {
                cfg.merge_toml(Self::read_toml(&path)?);
                debug!("Loaded configuration from {}", path.display());
            }
        }

        Ok(cfg)
    }

    /// Load configuration from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    fn read_toml(path: &Path) -> crate::Result<TomlConfig> {
        let toml_content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::parse_toml(&Self::expand_env_vars(&toml_content))
    }

    fn parse_toml(content: &str) -> crate::Result<TomlConfig> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply the values present in `toml` on top of the current settings.
    fn merge_toml(&mut self, toml: TomlConfig) {
        let tts = toml.tts.unwrap_or_default();
        if let Some(key) = tts.api_key.or(toml.tts_api_key) {
            self.tts.api_key = key;
        }
        if let Some(url) = tts.url.or(toml.tts_url) {
            self.tts.service_url = url;
        }

        let watsonx = toml.watsonx.unwrap_or_default();
        if let Some(key) = watsonx.api_key.or(toml.watsonx_api_key) {
            self.watsonx.api_key = key;
        }
        if let Some(url) = watsonx.url.or(toml.watsonx_url) {
            self.watsonx.service_url = url;
        }

        if let Some(synthesis) = toml.synthesis {
            self.synthesis = synthesis;
        }
        if let Some(output) = toml.output {
            self.output = output;
        }

        if self.synthesis.timeout_secs == 0 {
            warn!(
                "Ignoring synthesis.timeout_secs = 0, using {}s",
                default_timeout_secs()
            );
            self.synthesis.timeout_secs = default_timeout_secs();
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override settings from `lookup` (environment variables in production).
    ///
    /// Empty values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("TTS_API_KEY") {
            self.tts.api_key = key;
        }
        if let Some(url) = get("TTS_URL") {
            self.tts.service_url = url;
        }
        if let Some(key) = get("WATSONX_API_KEY") {
            self.watsonx.api_key = key;
        }
        if let Some(url) = get("WATSONX_URL") {
            self.watsonx.service_url = url;
        }

        if let Some(timeout) = get("ECHOVERSE_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.synthesis.timeout_secs = secs,
                _ => warn!("Ignoring invalid ECHOVERSE_TIMEOUT_SECS: {}", timeout),
            }
        }
        if let Some(voice) = get("ECHOVERSE_DEFAULT_VOICE") {
            self.synthesis.default_voice = voice;
        }
        if let Some(lang) = get("ECHOVERSE_FALLBACK_LANG") {
            self.synthesis.fallback_language = lang;
        }
        if let Some(output) = get("ECHOVERSE_OUTPUT") {
            self.output.file_name = output;
        }
    }
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    tts: Option<TomlCredentials>,
    watsonx: Option<TomlCredentials>,
    synthesis: Option<SynthesisConfig>,
    output: Option<OutputConfig>,

    // Flat secrets-file keys
    #[serde(rename = "TTS_API_KEY")]
    tts_api_key: Option<String>,
    #[serde(rename = "TTS_URL")]
    tts_url: Option<String>,
    #[serde(rename = "WATSONX_API_KEY")]
    watsonx_api_key: Option<String>,
    #[serde(rename = "WATSONX_URL")]
    watsonx_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlCredentials {
    api_key: Option<String>,
    url: Option<String>,
}
