use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::tally::SessionTally;

/// Point-in-time view of the active session for the stats panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_attempts: u32,
    pub successes: u32,
    pub failures: u32,
    pub skipped: u32,
    pub accuracy: u32,
    /// Batch length (sentences) or catalog size (words).
    pub items_in_session: usize,
    /// Items drawn so far (sentences) or shown this rotation (words).
    pub items_completed: usize,
}

impl SessionStats {
    pub fn from_tally(
        tally: &SessionTally,
        items_in_session: usize,
        items_completed: usize,
    ) -> Self {
        Self {
            total_attempts: tally.total_attempts,
            successes: tally.successes,
            failures: tally.failures,
            skipped: tally.skipped,
            accuracy: tally.accuracy(),
            items_in_session,
            items_completed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResults {
    pub total_items: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
    pub accuracy: u32,
    pub timestamp: DateTime<Utc>,
}

impl FinalResults {
    pub fn from_tally(tally: &SessionTally, total_items: usize) -> Self {
        Self {
            total_items,
            correct: tally.successes,
            incorrect: tally.failures,
            skipped: tally.skipped,
            accuracy: tally.accuracy(),
            timestamp: Utc::now(),
        }
    }
}
