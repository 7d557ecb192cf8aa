use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::item::ItemId;
use crate::store::KeyValueStore;
use crate::store::schema::{LedgerData, STATS_KEY};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub successes: u32,
    #[serde(default)]
    pub last_shown_at: Option<DateTime<Utc>>,
}

impl ItemStats {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    pub fn error_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            (self.attempts - self.successes) as f64 / self.attempts as f64
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatsLedger {
    stats: HashMap<ItemId, ItemStats>,
}

impl StatsLedger {
    pub fn for_items(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            stats: ids.into_iter().map(|id| (id, ItemStats::default())).collect(),
        }
    }

    pub fn record_attempt(&mut self, id: ItemId, success: bool) -> bool {
        self.record_attempt_at(id, success, Utc::now())
    }

    pub fn record_attempt_at(&mut self, id: ItemId, success: bool, now: DateTime<Utc>) -> bool {
        let Some(stat) = self.stats.get_mut(&id) else {
            return false;
        };
        stat.attempts = stat.attempts.saturating_add(1);
        if success {
            stat.successes = stat.successes.saturating_add(1);
        }
        stat.last_shown_at = Some(now);
        true
    }

    pub fn get_stats(&self, id: ItemId) -> ItemStats {
        self.stats.get(&id).cloned().unwrap_or_default()
    }

    pub fn stat(&self, id: ItemId) -> Option<&ItemStats> {
        self.stats.get(&id)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn to_data(&self) -> LedgerData {
        LedgerData {
            stats: self.stats.clone(),
            ..LedgerData::default()
        }
    }

    /// Ids no longer in the catalog are ignored.
    pub fn merge(&mut self, data: LedgerData) -> usize {
        let mut merged = 0;
        for (id, mut saved) in data.stats {
            if let Some(stat) = self.stats.get_mut(&id) {
                saved.successes = saved.successes.min(saved.attempts);
                *stat = saved;
                merged += 1;
            }
        }
        merged
    }

    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.to_data())?;
        store.set(STATS_KEY, &json)
    }

    pub fn restore(&mut self, store: &dyn KeyValueStore) -> usize {
        let Some(json) = store.get(STATS_KEY) else {
            return 0;
        };
        match serde_json::from_str::<LedgerData>(&json) {
            Ok(data) => self.merge(data),
            Err(e) => {
                warn!("Discarding unreadable saved word stats: {e}");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_initial_stats_are_zero() {
        let ledger = StatsLedger::for_items([1, 2]);
        assert_eq!(ledger.get_stats(1), ItemStats::default());
        assert_eq!(ledger.get_stats(99), ItemStats::default());
        assert_eq!(ledger.get_stats(1).success_rate(), 0.0);
    }

    #[test]
    fn test_record_attempt_updates_counters_and_recency() {
        let mut ledger = StatsLedger::for_items([1]);
        assert!(ledger.record_attempt_at(1, true, t0()));
        assert!(ledger.record_attempt_at(1, false, t0()));
        let stat = ledger.get_stats(1);
        assert_eq!(stat.attempts, 2);
        assert_eq!(stat.successes, 1);
        assert_eq!(stat.last_shown_at, Some(t0()));
        assert!((stat.success_rate() - 0.5).abs() < f64::EPSILON);
        assert!((stat.error_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut ledger = StatsLedger::for_items([1]);
        assert!(!ledger.record_attempt(42, true));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.stat(42).is_none());
    }

    #[test]
    fn test_success_rate_bounded_for_any_sequence() {
        let mut ledger = StatsLedger::for_items([1]);
        for i in 0..50 {
            ledger.record_attempt_at(1, i % 3 != 0, t0());
            let stat = ledger.get_stats(1);
            assert!(stat.successes <= stat.attempts);
            let rate = stat.success_rate();
            assert!((0.0..=1.0).contains(&rate));
        }
    }

    #[test]
    fn test_persist_then_restore_merges_known_ids() {
        let mut store = MemoryStore::new();
        let mut ledger = StatsLedger::for_items([1, 2, 3]);
        ledger.record_attempt_at(1, true, t0());
        ledger.record_attempt_at(3, false, t0());
        ledger.persist(&mut store).unwrap();

        // Catalog changed: id 3 removed, id 4 added.
        let mut restored = StatsLedger::for_items([1, 2, 4]);
        assert_eq!(restored.restore(&store), 2);
        assert_eq!(restored.get_stats(1).successes, 1);
        assert_eq!(restored.get_stats(2), ItemStats::default());
        assert_eq!(restored.get_stats(4), ItemStats::default());
        assert!(restored.stat(3).is_none());
    }

    #[test]
    fn test_corrupt_blob_is_cold_start() {
        let mut store = MemoryStore::new();
        store.set(STATS_KEY, "{not json").unwrap();
        let mut ledger = StatsLedger::for_items([1]);
        assert_eq!(ledger.restore(&store), 0);
        assert_eq!(ledger.get_stats(1), ItemStats::default());
    }

    #[test]
    fn test_restore_clamps_successes() {
        let mut store = MemoryStore::new();
        store
            .set(STATS_KEY, r#"{"stats":{"1":{"attempts":2,"successes":5}}}"#)
            .unwrap();
        let mut ledger = StatsLedger::for_items([1]);
        ledger.restore(&store);
        let stat = ledger.get_stats(1);
        assert_eq!(stat.attempts, 2);
        assert_eq!(stat.successes, 2);
    }
}
