//! Built-in speech providers: a missing-capability stand-in and a scripted
//! replay used by tests and by line-based dictation.

use super::capability::{
    RecognitionConfig, SpeechError, SpeechErrorCallback, SpeechToText, TranscriptCallback,
    TranscriptEvent, TranscriptSegment,
};
use log::{debug, warn};
use std::collections::VecDeque;

/// Provider for environments without a recognizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSpeech;

impl SpeechToText for UnsupportedSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn start(
        &mut self,
        _config: &RecognitionConfig,
        _on_event: TranscriptCallback,
        _on_error: SpeechErrorCallback,
    ) -> Result<(), SpeechError> {
        warn!("event=speech_start module=speech status=error error_code=unavailable");
        Err(SpeechError::Unavailable)
    }

    fn stop(&mut self) {}

    fn is_recording(&self) -> bool {
        false
    }
}

/// One step of a scripted recognition stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Event(TranscriptEvent),
    Error(SpeechError),
}

struct Session {
    continuous: bool,
    interim_results: bool,
    on_event: TranscriptCallback,
    on_error: SpeechErrorCallback,
}

/// Replays a prepared sequence of transcript events.
///
/// Steps are delivered one at a time through [`ScriptedSpeech::emit_next`]
/// while a session is active. A restarted session resumes with the steps
/// not yet delivered.
pub struct ScriptedSpeech {
    steps: VecDeque<ScriptStep>,
    session: Option<Session>,
}

impl ScriptedSpeech {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            session: None,
        }
    }

    /// Builds a stream where each line becomes one more final segment.
    ///
    /// Every event carries all segments so far, like a continuous browser
    /// recognizer. Segments after the first are prefixed with a space.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = Vec::new();
        let mut steps = Vec::new();
        for line in lines {
            let text = line.as_ref().trim();
            if text.is_empty() {
                continue;
            }
            let text = if segments.is_empty() {
                text.to_string()
            } else {
                format!(" {text}")
            };
            segments.push(TranscriptSegment::final_text(text));
            steps.push(ScriptStep::Event(TranscriptEvent::new(segments.clone())));
        }
        Self::new(steps)
    }

    /// Delivers the next step. Returns `false` when idle or exhausted.
    pub fn emit_next(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(step) = self.steps.pop_front() else {
            return false;
        };

        match step {
            ScriptStep::Event(event) => {
                let is_final = event.is_final();
                if !is_final && !session.interim_results {
                    return true;
                }
                (session.on_event)(event);
                if is_final && !session.continuous {
                    debug!("event=speech_stop module=speech status=ok reason=single_utterance");
                    self.session = None;
                }
            }
            ScriptStep::Error(err) => {
                (session.on_error)(err);
                self.session = None;
            }
        }
        true
    }

    /// Delivers steps until the session ends or the script runs out.
    pub fn drain(&mut self) -> usize {
        let mut delivered = 0;
        while self.emit_next() {
            delivered += 1;
        }
        delivered
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl SpeechToText for ScriptedSpeech {
    fn is_available(&self) -> bool {
        true
    }

    fn start(
        &mut self,
        config: &RecognitionConfig,
        on_event: TranscriptCallback,
        on_error: SpeechErrorCallback,
    ) -> Result<(), SpeechError> {
        if self.session.is_some() {
            return Err(SpeechError::AlreadyRecording);
        }
        debug!(
            "event=speech_start module=speech status=ok language={} continuous={} interim={}",
            config.language, config.continuous, config.interim_results
        );
        self.session = Some(Session {
            continuous: config.continuous,
            interim_results: config.interim_results,
            on_event,
            on_error,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if self.session.take().is_some() {
            debug!("event=speech_stop module=speech status=ok reason=requested");
        }
    }

    fn is_recording(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptStep, ScriptedSpeech, UnsupportedSpeech};
    use crate::speech::capability::{
        RecognitionConfig, SpeechError, SpeechToText, TranscriptEvent, TranscriptSegment,
    };
    use std::sync::{Arc, Mutex};

    fn collecting_start(
        provider: &mut dyn SpeechToText,
        config: &RecognitionConfig,
    ) -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<SpeechError>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let events_sink = Arc::clone(&events);
        let errors_sink = Arc::clone(&errors);
        provider
            .start(
                config,
                Box::new(move |event: TranscriptEvent| {
                    events_sink.lock().unwrap().push(event.transcript())
                }),
                Box::new(move |err: SpeechError| errors_sink.lock().unwrap().push(err)),
            )
            .unwrap();
        (events, errors)
    }

    #[test]
    fn unsupported_provider_reports_unavailable() {
        let mut provider = UnsupportedSpeech;
        assert!(!provider.is_available());
        let err = provider
            .start(
                &RecognitionConfig::default(),
                Box::new(|_| {}),
                Box::new(|_| {}),
            )
            .unwrap_err();
        assert_eq!(err, SpeechError::Unavailable);
    }

    #[test]
    fn from_lines_builds_cumulative_events() {
        let mut provider = ScriptedSpeech::from_lines(["buy milk", "", "and bread"]);
        let (events, _) = collecting_start(&mut provider, &RecognitionConfig::default());

        assert_eq!(provider.drain(), 2);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["buy milk".to_string(), "buy milk and bread".to_string()]
        );
    }

    #[test]
    fn nothing_is_delivered_before_start_or_after_stop() {
        let mut provider = ScriptedSpeech::from_lines(["one", "two"]);
        assert!(!provider.emit_next());

        let (events, _) = collecting_start(&mut provider, &RecognitionConfig::default());
        assert!(provider.emit_next());
        provider.stop();
        assert!(!provider.emit_next());
        assert_eq!(events.lock().unwrap().len(), 1);
        assert_eq!(provider.remaining(), 1);
    }

    #[test]
    fn second_start_while_recording_is_rejected() {
        let mut provider = ScriptedSpeech::new(Vec::new());
        let _ = collecting_start(&mut provider, &RecognitionConfig::default());
        let err = provider
            .start(
                &RecognitionConfig::default(),
                Box::new(|_| {}),
                Box::new(|_| {}),
            )
            .unwrap_err();
        assert_eq!(err, SpeechError::AlreadyRecording);
    }

    #[test]
    fn interim_events_are_skipped_when_disabled() {
        let mut provider = ScriptedSpeech::new([
            ScriptStep::Event(TranscriptEvent::new(vec![TranscriptSegment::interim("hel")])),
            ScriptStep::Event(TranscriptEvent::new(vec![TranscriptSegment::final_text(
                "hello",
            )])),
        ]);
        let config = RecognitionConfig {
            interim_results: false,
            ..RecognitionConfig::default()
        };
        let (events, _) = collecting_start(&mut provider, &config);

        provider.drain();
        assert_eq!(*events.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn single_utterance_session_ends_after_final_event() {
        let mut provider = ScriptedSpeech::from_lines(["first", "second"]);
        let config = RecognitionConfig {
            continuous: false,
            ..RecognitionConfig::default()
        };
        let (events, _) = collecting_start(&mut provider, &config);

        assert_eq!(provider.drain(), 1);
        assert!(!provider.is_recording());
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn error_step_ends_session() {
        let mut provider = ScriptedSpeech::new([
            ScriptStep::Error(SpeechError::Recognition("no-speech".to_string())),
            ScriptStep::Event(TranscriptEvent::default()),
        ]);
        let (_, errors) = collecting_start(&mut provider, &RecognitionConfig::default());

        assert_eq!(provider.drain(), 1);
        assert!(!provider.is_recording());
        assert_eq!(
            *errors.lock().unwrap(),
            vec![SpeechError::Recognition("no-speech".to_string())]
        );
    }
}
