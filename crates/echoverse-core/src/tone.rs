//! Tone-based text framing
//!
//! A tone appends a fixed narrative framing clause to the text before it is
//! spoken. `Neutral` and any unrecognised label leave the text unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const SUSPENSEFUL_SUFFIX: &str = "... with dramatic tension building throughout the narrative, \
     creating an atmosphere of anticipation and mystery.";

const INSPIRING_SUFFIX: &str = " - a powerful and uplifting message that inspires hope, \
     motivation, and positive change in the listener.";

/// Narration tone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Suspenseful,
    Inspiring,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Neutral, Tone::Suspenseful, Tone::Inspiring];

    /// Map an exact display label (`"Suspenseful"`, `"Inspiring"`) to a tone.
    /// Every other label is `Neutral`.
    ///
    /// Use [`str::parse`] for case-insensitive user input.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|tone| tone.to_string() == label)
            .unwrap_or_default()
    }

    /// Framing clause appended for this tone.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Suspenseful => Some(SUSPENSEFUL_SUFFIX),
            Self::Inspiring => Some(INSPIRING_SUFFIX),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "Neutral"),
            Self::Suspenseful => write!(f, "Suspenseful"),
            Self::Inspiring => write!(f, "Inspiring"),
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "suspenseful" => Ok(Self::Suspenseful),
            "inspiring" => Ok(Self::Inspiring),
            other => Err(format!("unknown tone: {}", other)),
        }
    }
}

/// Apply `tone` to `text`.
pub fn transform(text: &str, tone: Tone) -> String {
    match tone.suffix() {
        Some(suffix) => format!("{}{}", text, suffix),
        None => text.to_string(),
    }
}

/// Apply a tone given by label; unknown labels leave the text unchanged.
pub fn transform_label(text: &str, label: &str) -> String {
    transform(text, Tone::from_label(label))
}
