use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::debug;
use rand::Rng;

use crate::catalog::item::{ItemId, Word};
use crate::config::PriorityWeights;
use crate::engine::ledger::StatsLedger;
use crate::engine::priority::{compute_priority, pick_weighted, pool_size};

/// Open-ended priority rotation over the whole word list. Tracks which ids
/// were shown or skipped in the current rotation; both pools reset once every
/// word has been shown.
#[derive(Clone, Debug, Default)]
pub struct WordScheduler {
    shown: HashSet<ItemId>,
    skipped: HashSet<ItemId>,
    weights: PriorityWeights,
}

impl WordScheduler {
    pub fn new(weights: PriorityWeights) -> Self {
        Self {
            shown: HashSet::new(),
            skipped: HashSet::new(),
            weights,
        }
    }

    pub fn select_next<R: Rng + ?Sized>(
        &mut self,
        words: &[Word],
        ledger: &StatsLedger,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<ItemId> {
        if self.shown.len() >= words.len() {
            self.shown.clear();
            self.skipped.clear();
        }

        let mut candidates: Vec<ItemId> = words
            .iter()
            .map(|w| w.id)
            .filter(|id| !self.shown.contains(id))
            .collect();

        if candidates.is_empty() {
            candidates = words
                .iter()
                .map(|w| w.id)
                .filter(|id| self.skipped.contains(id))
                .collect();
            self.skipped.clear();
        }

        if candidates.is_empty() {
            return None;
        }

        let mut ranked: Vec<(ItemId, f64)> = candidates
            .into_iter()
            .map(|id| (id, compute_priority(&ledger.get_stats(id), now, &self.weights)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(pool_size(ranked.len(), self.weights.pool_fraction));

        let picked = pick_weighted(rng, &ranked)?;
        debug!(
            "Picked word {picked} from pool of {} (top priority {:.1})",
            ranked.len(),
            ranked[0].1
        );
        self.shown.insert(picked);
        Some(picked)
    }

    /// "Not yet": the word leaves `shown` so it stays in circulation this
    /// rotation.
    pub fn skip(&mut self, id: ItemId) {
        self.skipped.insert(id);
        self.shown.remove(&id);
    }

    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    pub fn was_shown(&self, id: ItemId) -> bool {
        self.shown.contains(&id)
    }

    pub fn is_skipped(&self, id: ItemId) -> bool {
        self.skipped.contains(&id)
    }
}
