use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::item::ItemId;
use crate::engine::ledger::ItemStats;

pub const SCHEMA_VERSION: u32 = 1;

pub const STATS_KEY: &str = "word_stats";
pub const PREFERENCES_KEY: &str = "preferences";

/// Persisted form of the statistics ledger. Every field defaults so older or
/// newer blobs still load; unknown fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerData {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub stats: HashMap<ItemId, ItemStats>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for LedgerData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stats: HashMap::new(),
        }
    }
}

/// Display preferences, stored in the same shape the browser drill used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub is_language_toggled: bool,
    /// Milliseconds before the translation is revealed. Zero means "use the
    /// configured default".
    #[serde(default)]
    pub reveal_delay: u64,
}

impl Preferences {
    pub fn new(reveal_delay: u64) -> Self {
        Self {
            is_language_toggled: false,
            reveal_delay,
        }
    }

    pub fn reveal_delay_or(&self, fallback: u64) -> u64 {
        if self.reveal_delay == 0 {
            fallback
        } else {
            self.reveal_delay
        }
    }
}
