//! Speech recognizer contract and transcript events.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default recognition language.
pub const DEFAULT_SPEECH_LANGUAGE: &str = "pt-BR";

/// Callback receiving transcript events in recognition order.
pub type TranscriptCallback = Box<dyn FnMut(TranscriptEvent) + Send>;
/// Callback receiving recognizer failures.
pub type SpeechErrorCallback = Box<dyn FnMut(SpeechError) + Send>;

/// Recognizer session options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// BCP 47 language tag, e.g. `pt-BR`.
    pub language: String,
    /// Keep listening across pauses until stopped.
    pub continuous: bool,
    /// Deliver non-final hypotheses as they form.
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_SPEECH_LANGUAGE.to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

impl RecognitionConfig {
    /// Default options with a validated language tag.
    pub fn with_language(language: &str) -> Result<Self, SpeechError> {
        Ok(Self {
            language: parse_language_tag(language)?,
            ..Self::default()
        })
    }
}

/// Validates a language tag: ASCII alphanumeric subtags joined by `-`.
pub fn parse_language_tag(value: &str) -> Result<String, SpeechError> {
    let trimmed = value.trim();
    let valid = !trimmed.is_empty()
        && trimmed.split('-').all(|subtag| {
            !subtag.is_empty()
                && subtag.len() <= 8
                && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        });
    if !valid {
        return Err(SpeechError::InvalidLanguage(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

/// One recognized chunk of speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    pub text: String,
    /// `false` while the recognizer may still revise this segment.
    pub is_final: bool,
}

impl TranscriptSegment {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Snapshot of every segment recognized so far in the session.
///
/// Each event supersedes the previous one, so consumers replace their text
/// with [`TranscriptEvent::transcript`] instead of appending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptEvent {
    pub segments: Vec<TranscriptSegment>,
}

impl TranscriptEvent {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    /// Concatenated text of all segments.
    pub fn transcript(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect()
    }

    /// Whether every segment is final.
    pub fn is_final(&self) -> bool {
        self.segments.iter().all(|segment| segment.is_final)
    }
}

/// Speech capability errors. None of them are fatal to note authoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// The environment offers no recognizer.
    Unavailable,
    /// `start` was called while a session is already running.
    AlreadyRecording,
    InvalidLanguage(String),
    /// Recognizer reported a failure mid-stream.
    Recognition(String),
}

impl Display for SpeechError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "speech recognition is not supported here"),
            Self::AlreadyRecording => write!(f, "speech recognition is already running"),
            Self::InvalidLanguage(value) => write!(f, "invalid speech language tag: `{value}`"),
            Self::Recognition(message) => write!(f, "speech recognition failed: {message}"),
        }
    }
}

impl Error for SpeechError {}

/// Host-provided speech recognizer.
///
/// Sessions are restartable: `start` after `stop` opens a new session.
pub trait SpeechToText {
    /// Whether the environment provides a recognizer at all.
    fn is_available(&self) -> bool;

    /// Starts a session delivering events to `on_event` until [`stop`].
    ///
    /// Returns [`SpeechError::Unavailable`] when the capability is missing.
    ///
    /// [`stop`]: SpeechToText::stop
    fn start(
        &mut self,
        config: &RecognitionConfig,
        on_event: TranscriptCallback,
        on_error: SpeechErrorCallback,
    ) -> Result<(), SpeechError>;

    /// Stops the current session. No-op when idle.
    fn stop(&mut self);

    fn is_recording(&self) -> bool;
}
