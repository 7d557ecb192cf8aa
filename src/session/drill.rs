use crate::engine::sentence_selector::SentenceBatch;
use crate::engine::word_scheduler::WordScheduler;
use crate::session::result::{FinalResults, SessionStats};
use crate::session::tally::SessionTally;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillMode {
    Words,
    Sentences,
}

impl DrillMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DrillMode::Words => "words",
            DrillMode::Sentences => "sentences",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "words" => Some(DrillMode::Words),
            "sentences" => Some(DrillMode::Sentences),
            _ => None,
        }
    }
}

/// The active drill. Words rotate indefinitely by priority; sentences run
/// through one fixed batch. Both share the same tally.
#[derive(Clone, Debug)]
pub enum DrillSession {
    RotatingPriority {
        scheduler: WordScheduler,
        tally: SessionTally,
    },
    FixedBatch {
        batch: SentenceBatch,
        tally: SessionTally,
    },
}

impl DrillSession {
    pub fn rotating(scheduler: WordScheduler) -> Self {
        DrillSession::RotatingPriority {
            scheduler,
            tally: SessionTally::default(),
        }
    }

    pub fn fixed(batch: SentenceBatch) -> Self {
        DrillSession::FixedBatch {
            batch,
            tally: SessionTally::default(),
        }
    }

    pub fn mode(&self) -> DrillMode {
        match self {
            DrillSession::RotatingPriority { .. } => DrillMode::Words,
            DrillSession::FixedBatch { .. } => DrillMode::Sentences,
        }
    }

    pub fn tally(&self) -> &SessionTally {
        match self {
            DrillSession::RotatingPriority { tally, .. } | DrillSession::FixedBatch { tally, .. } => {
                tally
            }
        }
    }

    pub fn tally_mut(&mut self) -> &mut SessionTally {
        match self {
            DrillSession::RotatingPriority { tally, .. } | DrillSession::FixedBatch { tally, .. } => {
                tally
            }
        }
    }

    /// A rotation never completes; a batch completes when its cursor
    /// reaches the end.
    pub fn is_complete(&self) -> bool {
        match self {
            DrillSession::RotatingPriority { .. } => false,
            DrillSession::FixedBatch { batch, .. } => batch.is_complete(),
        }
    }

    /// `word_count` is the catalog size, used as the rotation length.
    pub fn stats(&self, word_count: usize) -> SessionStats {
        match self {
            DrillSession::RotatingPriority { scheduler, tally } => {
                SessionStats::from_tally(tally, word_count, scheduler.shown_count())
            }
            DrillSession::FixedBatch { batch, tally } => {
                SessionStats::from_tally(tally, batch.len(), batch.cursor())
            }
        }
    }

    /// Terminal results for a finished batch; a snapshot for a rotation.
    pub fn final_results(&self, word_count: usize) -> Option<FinalResults> {
        match self {
            DrillSession::RotatingPriority { tally, .. } => {
                Some(FinalResults::from_tally(tally, word_count))
            }
            DrillSession::FixedBatch { batch, tally } => batch
                .is_complete()
                .then(|| FinalResults::from_tally(tally, batch.len())),
        }
    }
}
