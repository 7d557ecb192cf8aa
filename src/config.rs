use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Constants of the word priority formula. Defaults are the tuned values the
/// drill has always used; they are not derived from a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_unseen_bonus")]
    pub unseen_bonus: f64,
    #[serde(default = "default_error_weight")]
    pub error_weight: f64,
    #[serde(default = "default_success_weight")]
    pub success_weight: f64,
    #[serde(default = "default_recency_per_day")]
    pub recency_per_day: f64,
    #[serde(default = "default_recency_cap")]
    pub recency_cap: f64,
    #[serde(default = "default_floor")]
    pub floor: f64,
    /// Share of the ranked candidates eligible for the weighted draw.
    #[serde(default = "default_pool_fraction")]
    pub pool_fraction: f64,
}

fn default_base() -> f64 {
    10.0
}
fn default_unseen_bonus() -> f64 {
    50.0
}
fn default_error_weight() -> f64 {
    30.0
}
fn default_success_weight() -> f64 {
    20.0
}
fn default_recency_per_day() -> f64 {
    2.0
}
fn default_recency_cap() -> f64 {
    10.0
}
fn default_floor() -> f64 {
    1.0
}
fn default_pool_fraction() -> f64 {
    0.3
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            base: default_base(),
            unseen_bonus: default_unseen_bonus(),
            error_weight: default_error_weight(),
            success_weight: default_success_weight(),
            recency_per_day: default_recency_per_day(),
            recency_cap: default_recency_cap(),
            floor: default_floor(),
            pool_fraction: default_pool_fraction(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sentence_session_size")]
    pub sentence_session_size: usize,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,
    #[serde(default)]
    pub words_path: Option<String>,
    #[serde(default)]
    pub sentences_path: Option<String>,
    #[serde(default)]
    pub catalog_url: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub priority: PriorityWeights,
}

fn default_sentence_session_size() -> usize {
    20
}
fn default_reveal_delay_ms() -> u64 {
    5000
}
fn default_auto_advance_ms() -> u64 {
    1500
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexdrill")
        .to_string_lossy()
        .to_string()
}

pub const MIN_DELAY_MS: u64 = 100;

impl Default for Config {
    fn default() -> Self {
        Self {
            sentence_session_size: default_sentence_session_size(),
            reveal_delay_ms: default_reveal_delay_ms(),
            auto_advance_ms: default_auto_advance_ms(),
            words_path: None,
            sentences_path: None,
            catalog_url: None,
            data_dir: default_data_dir(),
            priority: PriorityWeights::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lexdrill")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.sentence_session_size = self.sentence_session_size.max(1);
        self.reveal_delay_ms = self.reveal_delay_ms.max(MIN_DELAY_MS);
        self.auto_advance_ms = self.auto_advance_ms.max(MIN_DELAY_MS);

        let p = &mut self.priority;
        if !(p.pool_fraction > 0.0 && p.pool_fraction <= 1.0) {
            p.pool_fraction = default_pool_fraction();
        }
        if !(p.floor > 0.0) {
            p.floor = default_floor();
        }
        if !(p.recency_cap >= 0.0) {
            p.recency_cap = default_recency_cap();
        }
    }
}
