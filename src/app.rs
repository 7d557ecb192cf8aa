use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::Rng;
use rand::rngs::SmallRng;

use crate::catalog::item::Word;
use crate::config::{Config, MIN_DELAY_MS};
use crate::engine::PracticeEngine;
use crate::engine::sentence_selector::SentencePresentation;
use crate::error::EngineError;
use crate::session::drill::DrillMode;
use crate::session::result::{FinalResults, SessionStats};
use crate::store::KeyValueStore;
use crate::store::schema::{PREFERENCES_KEY, Preferences};
use crate::timer::TimerQueue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    Word(Word),
    Sentence(SentencePresentation),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTask {
    Countdown { remaining_secs: u64 },
    Reveal,
    Advance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Countdown { remaining_secs: u64 },
    Revealed,
    Advanced(Prompt),
    SessionComplete(FinalResults),
}

pub struct App<R: Rng = SmallRng> {
    engine: PracticeEngine<R>,
    store: Box<dyn KeyValueStore>,
    config: Config,
    preferences: Preferences,
    timers: TimerQueue<AppTask>,
    current: Option<Prompt>,
    revealed: bool,
    awaiting_answer: bool,
    reveal_override: Option<u64>,
}

impl<R: Rng> App<R> {
    pub fn new(
        mut engine: PracticeEngine<R>,
        store: Box<dyn KeyValueStore>,
        config: Config,
    ) -> Self {
        let preferences = load_preferences(&*store);
        engine.restore_stats(&*store);
        Self {
            engine,
            store,
            config,
            preferences,
            timers: TimerQueue::new(),
            current: None,
            revealed: false,
            awaiting_answer: false,
            reveal_override: None,
        }
    }

    pub fn engine(&self) -> &PracticeEngine<R> {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn current(&self) -> Option<&Prompt> {
        self.current.as_ref()
    }

    pub fn mode(&self) -> Option<DrillMode> {
        self.engine.mode()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn english_first(&self) -> bool {
        self.preferences.is_language_toggled
    }

    pub fn reveal_delay_ms(&self) -> u64 {
        self.reveal_override
            .unwrap_or_else(|| self.preferences.reveal_delay_or(self.config.reveal_delay_ms))
    }

    pub fn reveal_secs(&self) -> u64 {
        self.reveal_delay_ms().div_ceil(1000).max(1)
    }

    pub fn session_stats(&self) -> SessionStats {
        self.engine.session_stats()
    }

    pub fn final_results(&self) -> Option<FinalResults> {
        self.engine.final_results()
    }

    pub fn start(
        &mut self,
        mode: DrillMode,
        now: Instant,
    ) -> Result<Option<&Prompt>, EngineError> {
        self.timers.cancel_all();
        self.current = None;
        self.awaiting_answer = false;
        match mode {
            DrillMode::Words => {
                self.engine.start_word_rotation();
                self.show_next_word(now);
            }
            DrillMode::Sentences => {
                self.engine
                    .start_sentence_session(self.config.sentence_session_size)?;
                self.show_next_sentence();
            }
        }
        Ok(self.current.as_ref())
    }

    pub fn show_next_word(&mut self, now: Instant) -> Option<&Word> {
        self.timers.cancel_all();
        self.revealed = false;
        self.current = self.engine.next_word().cloned().map(Prompt::Word);
        self.awaiting_answer = self.current.is_some();
        if self.awaiting_answer {
            self.schedule_countdown(now);
        }
        match &self.current {
            Some(Prompt::Word(word)) => Some(word),
            _ => None,
        }
    }

    // Sentences whose answer is missing from their options are passed over.
    pub fn show_next_sentence(&mut self) -> Option<&SentencePresentation> {
        self.timers.cancel_all();
        self.revealed = false;
        self.current = loop {
            match self.engine.next_sentence_presentation() {
                Ok(presentation) => break presentation.map(Prompt::Sentence),
                Err(e) => debug!("Passing over sentence: {e}"),
            }
        };
        self.awaiting_answer = self.current.is_some();
        match &self.current {
            Some(Prompt::Sentence(presentation)) => Some(presentation),
            _ => None,
        }
    }

    pub fn answer_word(&mut self, success: bool, now: Instant) -> bool {
        let Some(Prompt::Word(word)) = &self.current else {
            return false;
        };
        if !self.awaiting_answer {
            return false;
        }
        let id = word.id;
        self.timers.cancel_all();
        self.engine.record_word_attempt(id, success);
        self.save_stats();
        self.finish_item(now);
        true
    }

    pub fn choose_option(&mut self, index: usize, now: Instant) -> Option<bool> {
        let Some(Prompt::Sentence(presentation)) = &self.current else {
            return None;
        };
        if !self.awaiting_answer || index >= presentation.options.len() {
            return None;
        }
        let correct = presentation.is_correct(index);
        self.timers.cancel_all();
        self.engine.record_sentence_result(correct);
        self.finish_item(now);
        Some(correct)
    }

    pub fn skip(&mut self, now: Instant) -> bool {
        if !self.awaiting_answer {
            return false;
        }
        match &self.current {
            Some(Prompt::Word(word)) => {
                let id = word.id;
                self.engine.skip_word(id);
            }
            Some(Prompt::Sentence(_)) => self.engine.skip_sentence(),
            None => return false,
        }
        self.timers.cancel_all();
        self.finish_item(now);
        true
    }

    pub fn toggle_language(&mut self) -> bool {
        self.preferences.is_language_toggled = !self.preferences.is_language_toggled;
        self.save_preferences();
        self.preferences.is_language_toggled
    }

    /// Not persisted.
    pub fn override_reveal_delay(&mut self, delay_ms: u64) {
        self.reveal_override = Some(delay_ms.max(MIN_DELAY_MS));
    }

    /// Zero restores the configured default.
    pub fn set_reveal_delay(&mut self, delay_ms: u64) {
        self.preferences.reveal_delay = if delay_ms == 0 {
            0
        } else {
            delay_ms.max(MIN_DELAY_MS)
        };
        self.save_preferences();
    }

    /// Primary line, plus the secondary line once revealed.
    pub fn visible_prompt(&self) -> Option<(&str, Option<&str>)> {
        match self.current.as_ref()? {
            Prompt::Word(word) => {
                let (prompt, translation) = word.prompt_pair(self.english_first());
                Some((prompt, self.revealed.then_some(translation)))
            }
            Prompt::Sentence(p) => {
                let primary = if self.revealed {
                    &p.full_sentence
                } else {
                    &p.blanked_sentence
                };
                Some((primary, Some(&p.translation)))
            }
        }
    }

    pub fn tick(&mut self, now: Instant) -> Vec<AppEvent> {
        let mut events = Vec::new();
        for (_, task) in self.timers.poll(now) {
            match task {
                AppTask::Countdown { remaining_secs } => {
                    events.push(AppEvent::Countdown { remaining_secs });
                }
                AppTask::Reveal => {
                    self.revealed = true;
                    events.push(AppEvent::Revealed);
                }
                AppTask::Advance => {
                    events.extend(self.advance(now));
                    break;
                }
            }
        }
        events
    }

    fn advance(&mut self, now: Instant) -> Option<AppEvent> {
        match self.engine.mode()? {
            DrillMode::Words => self
                .show_next_word(now)
                .cloned()
                .map(|word| AppEvent::Advanced(Prompt::Word(word))),
            DrillMode::Sentences => match self.show_next_sentence().cloned() {
                Some(p) => Some(AppEvent::Advanced(Prompt::Sentence(p))),
                None => self.engine.final_results().map(AppEvent::SessionComplete),
            },
        }
    }

    fn schedule_countdown(&mut self, now: Instant) {
        let secs = self.reveal_secs();
        for elapsed in 1..secs {
            self.timers.schedule(
                AppTask::Countdown {
                    remaining_secs: secs - elapsed,
                },
                Duration::from_secs(elapsed),
                now,
            );
        }
        self.timers
            .schedule(AppTask::Reveal, Duration::from_secs(secs), now);
    }

    fn finish_item(&mut self, now: Instant) {
        self.awaiting_answer = false;
        self.revealed = true;
        self.timers.schedule(
            AppTask::Advance,
            Duration::from_millis(self.config.auto_advance_ms),
            now,
        );
    }

    fn save_stats(&mut self) {
        if let Err(e) = self.engine.persist_stats(&mut *self.store) {
            warn!("Failed to save word stats: {e:#}");
        }
    }

    fn save_preferences(&mut self) {
        let result = serde_json::to_string(&self.preferences)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(PREFERENCES_KEY, &json));
        if let Err(e) = result {
            warn!("Failed to save preferences: {e:#}");
        }
    }
}

fn load_preferences(store: &dyn KeyValueStore) -> Preferences {
    let Some(raw) = store.get(PREFERENCES_KEY) else {
        return Preferences::new(0);
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Discarding unreadable preferences: {e}");
        Preferences::new(0)
    })
}
