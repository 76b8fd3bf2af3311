//! Note authoring draft.
//!
//! # Responsibility
//! - Hold the in-progress text of a note typed or dictated by the user.
//! - Bridge speech transcript callbacks into draft content.
//! - Hand finished content to the note store.
//!
//! # Invariants
//! - Transcript events replace draft content in arrival order.
//! - A missing or failing recognizer never loses typed content.
//! - The draft resets only after the store accepted the note.

use crate::model::note::Note;
use crate::repo::note_repo::NotePersistence;
use crate::service::note_store::{NoteStore, NoteStoreError};
use crate::speech::capability::{RecognitionConfig, SpeechError, SpeechToText, TranscriptEvent};
use crossbeam_channel::{unbounded, Receiver};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What the authoring surface is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    /// Nothing typed yet; the user picks typing or dictation.
    Onboarding,
    Editing,
    Recording,
}

/// Draft save failures.
#[derive(Debug)]
pub enum NoteDraftError {
    /// Recording must be stopped before saving.
    StillRecording,
    Store(NoteStoreError),
}

impl Display for NoteDraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StillRecording => write!(f, "stop recording before saving the note"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteDraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StillRecording => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<NoteStoreError> for NoteDraftError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

enum SpeechMessage {
    Transcript(TranscriptEvent),
    Failed(SpeechError),
}

/// Draft state for one note being authored.
pub struct NoteDraft {
    mode: DraftMode,
    content: String,
    inbox: Option<Receiver<SpeechMessage>>,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteDraft {
    pub fn new() -> Self {
        Self {
            mode: DraftMode::Onboarding,
            content: String::new(),
            inbox: None,
        }
    }

    pub fn mode(&self) -> DraftMode {
        self.mode
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_recording(&self) -> bool {
        self.mode == DraftMode::Recording
    }

    /// Switches from onboarding to typed editing.
    pub fn start_editor(&mut self) {
        if self.mode == DraftMode::Onboarding {
            self.mode = DraftMode::Editing;
        }
    }

    /// Replaces the typed content. Clearing it returns to onboarding.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        if self.mode == DraftMode::Recording {
            return;
        }
        self.mode = if self.content.is_empty() {
            DraftMode::Onboarding
        } else {
            DraftMode::Editing
        };
    }

    /// Starts dictation into this draft.
    ///
    /// # Errors
    /// - [`SpeechError::Unavailable`] when the environment has no recognizer;
    ///   the draft is left as it was so typing still works.
    /// - [`SpeechError::AlreadyRecording`] when dictation is already active.
    pub fn start_recording(
        &mut self,
        speech: &mut dyn SpeechToText,
        config: &RecognitionConfig,
    ) -> Result<(), SpeechError> {
        if self.is_recording() {
            return Err(SpeechError::AlreadyRecording);
        }
        if !speech.is_available() {
            warn!("event=draft_record module=draft status=error error_code=speech_unavailable");
            return Err(SpeechError::Unavailable);
        }

        let (event_tx, inbox) = unbounded();
        let error_tx = event_tx.clone();
        speech.start(
            config,
            Box::new(move |event: TranscriptEvent| {
                let _ = event_tx.send(SpeechMessage::Transcript(event));
            }),
            Box::new(move |err: SpeechError| {
                let _ = error_tx.send(SpeechMessage::Failed(err));
            }),
        )?;

        self.inbox = Some(inbox);
        self.mode = DraftMode::Recording;
        info!(
            "event=draft_record module=draft status=start language={}",
            config.language
        );
        Ok(())
    }

    /// Applies queued transcript events and returns recognizer errors.
    ///
    /// A recognizer error ends dictation and drops back to typed editing.
    pub fn pump(&mut self) -> Vec<SpeechError> {
        let Some(inbox) = self.inbox.as_ref() else {
            return Vec::new();
        };

        let mut errors = Vec::new();
        for message in inbox.try_iter() {
            match message {
                SpeechMessage::Transcript(event) => self.content = event.transcript(),
                SpeechMessage::Failed(err) => {
                    warn!("event=draft_record module=draft status=error error={err}");
                    errors.push(err);
                }
            }
        }

        if !errors.is_empty() {
            self.finish_recording();
        }
        errors
    }

    /// Stops dictation, keeping whatever was transcribed.
    pub fn stop_recording(&mut self, speech: &mut dyn SpeechToText) -> Vec<SpeechError> {
        speech.stop();
        let errors = self.pump();
        self.finish_recording();
        errors
    }

    /// Creates a note from the draft and resets it.
    ///
    /// Empty content is rejected by the store and the draft is kept. A
    /// persistence failure also keeps the draft so the user can retry.
    pub fn save<P: NotePersistence>(
        &mut self,
        store: &mut NoteStore<P>,
    ) -> Result<Note, NoteDraftError> {
        if self.is_recording() {
            return Err(NoteDraftError::StillRecording);
        }
        let note = store.create(self.content.clone())?;
        self.reset();
        Ok(note)
    }

    /// Abandons the draft, stopping dictation first when active.
    pub fn cancel(&mut self, speech: &mut dyn SpeechToText) {
        if self.is_recording() {
            speech.stop();
        }
        self.reset();
    }

    fn finish_recording(&mut self) {
        self.inbox = None;
        if self.mode == DraftMode::Recording {
            self.mode = DraftMode::Editing;
        }
    }

    fn reset(&mut self) {
        self.inbox = None;
        self.content.clear();
        self.mode = DraftMode::Onboarding;
    }
}
