use serde::{Deserialize, Serialize};

/// Per-session counters shared by both drill modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    pub total_attempts: u32,
    pub successes: u32,
    pub failures: u32,
    pub skipped: u32,
}

impl SessionTally {
    pub fn record(&mut self, success: bool) {
        self.total_attempts += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    pub fn record_skip(&mut self) {
        self.total_attempts += 1;
        self.skipped += 1;
    }

    /// Answered items only; skips never enter the denominator.
    pub fn answered(&self) -> u32 {
        self.successes + self.failures
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.successes, self.failures)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `round(successes / (successes + failures) * 100)`, 0 with no answers.
pub fn accuracy_percent(successes: u32, failures: u32) -> u32 {
    let answered = successes + failures;
    if answered == 0 {
        return 0;
    }
    (successes as f64 / answered as f64 * 100.0).round() as u32
}
