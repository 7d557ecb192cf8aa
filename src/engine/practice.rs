use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Catalog;
use crate::catalog::item::{ItemId, Word};
use crate::config::PriorityWeights;
use crate::engine::ledger::{ItemStats, StatsLedger};
use crate::engine::sentence_selector::{SentenceBatch, SentencePresentation};
use crate::engine::word_scheduler::WordScheduler;
use crate::error::EngineError;
use crate::session::drill::{DrillMode, DrillSession};
use crate::session::result::{FinalResults, SessionStats};
use crate::store::KeyValueStore;

/// Owns the catalog, the statistics ledger and the active drill session.
/// One instance per process (or per test); there is no global state.
pub struct PracticeEngine<R: Rng = SmallRng> {
    catalog: Catalog,
    ledger: StatsLedger,
    weights: PriorityWeights,
    session: Option<DrillSession>,
    rng: R,
}

impl PracticeEngine<SmallRng> {
    pub fn new(catalog: Catalog, weights: PriorityWeights) -> Self {
        Self::with_rng(catalog, weights, SmallRng::from_entropy())
    }

    pub fn seeded(catalog: Catalog, weights: PriorityWeights, seed: u64) -> Self {
        Self::with_rng(catalog, weights, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PracticeEngine<R> {
    pub fn with_rng(catalog: Catalog, weights: PriorityWeights, rng: R) -> Self {
        let ledger = StatsLedger::for_items(catalog.words().iter().map(|w| w.id));
        Self {
            catalog,
            ledger,
            weights,
            session: None,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &StatsLedger {
        &self.ledger
    }

    pub fn session(&self) -> Option<&DrillSession> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> Option<DrillMode> {
        self.session.as_ref().map(DrillSession::mode)
    }

    pub fn start_word_rotation(&mut self) {
        info!(
            "Started word rotation over {} words",
            self.catalog.words().len()
        );
        self.session = Some(DrillSession::rotating(WordScheduler::new(
            self.weights.clone(),
        )));
    }

    /// Replaces any active session. On failure no session is left active.
    pub fn start_sentence_session(&mut self, size: usize) -> Result<(), EngineError> {
        match SentenceBatch::start(self.catalog.sentences(), size, &mut self.rng) {
            Ok(batch) => {
                self.session = Some(DrillSession::fixed(batch));
                Ok(())
            }
            Err(e) => {
                self.session = None;
                Err(e)
            }
        }
    }

    pub fn next_word(&mut self) -> Option<&Word> {
        self.next_word_at(Utc::now())
    }

    /// `None` when no word rotation is active or the catalog has no words.
    pub fn next_word_at(&mut self, now: DateTime<Utc>) -> Option<&Word> {
        let Some(DrillSession::RotatingPriority { scheduler, .. }) = self.session.as_mut() else {
            return None;
        };
        let id = scheduler.select_next(self.catalog.words(), &self.ledger, now, &mut self.rng)?;
        self.catalog.word(id)
    }

    pub fn next_sentence_presentation(
        &mut self,
    ) -> Result<Option<SentencePresentation>, EngineError> {
        match self.session.as_mut() {
            Some(DrillSession::FixedBatch { batch, .. }) => batch.next(),
            _ => Ok(None),
        }
    }

    pub fn record_word_attempt(&mut self, id: ItemId, success: bool) -> bool {
        self.record_word_attempt_at(id, success, Utc::now())
    }

    /// Unknown ids are ignored and leave the session counters untouched.
    pub fn record_word_attempt_at(
        &mut self,
        id: ItemId,
        success: bool,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.ledger.record_attempt_at(id, success, now) {
            return false;
        }
        if let Some(DrillSession::RotatingPriority { tally, .. }) = self.session.as_mut() {
            tally.record(success);
        }
        true
    }

    pub fn skip_word(&mut self, id: ItemId) -> bool {
        if !self.catalog.contains_word(id) {
            return false;
        }
        match self.session.as_mut() {
            Some(DrillSession::RotatingPriority { scheduler, tally }) => {
                scheduler.skip(id);
                tally.record_skip();
                true
            }
            _ => false,
        }
    }

    pub fn record_sentence_result(&mut self, correct: bool) {
        if let Some(DrillSession::FixedBatch { tally, .. }) = self.session.as_mut() {
            tally.record(correct);
        }
    }

    pub fn skip_sentence(&mut self) {
        if let Some(DrillSession::FixedBatch { tally, .. }) = self.session.as_mut() {
            tally.record_skip();
        }
    }

    pub fn word_stats(&self, id: ItemId) -> ItemStats {
        self.ledger.get_stats(id)
    }

    /// Zeroed stats when no session is active.
    pub fn session_stats(&self) -> SessionStats {
        self.session
            .as_ref()
            .map(|s| s.stats(self.catalog.words().len()))
            .unwrap_or_default()
    }

    pub fn final_results(&self) -> Option<FinalResults> {
        self.session
            .as_ref()
            .and_then(|s| s.final_results(self.catalog.words().len()))
    }

    pub fn is_session_complete(&self) -> bool {
        self.session.as_ref().is_some_and(DrillSession::is_complete)
    }

    pub fn reset_session(&mut self) {
        self.session = None;
    }

    pub fn persist_stats(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        self.ledger.persist(store)
    }

    pub fn restore_stats(&mut self, store: &dyn KeyValueStore) -> usize {
        let merged = self.ledger.restore(store);
        if merged > 0 {
            info!("Restored saved stats for {merged} words");
        }
        merged
    }
}
