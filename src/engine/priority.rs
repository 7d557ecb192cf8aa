use chrono::{DateTime, Utc};
use rand::Rng;

use crate::config::PriorityWeights;
use crate::engine::ledger::ItemStats;

const MS_PER_DAY: f64 = 86_400_000.0;

pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let ms = now.signed_duration_since(then).num_milliseconds() as f64;
    (ms / MS_PER_DAY).max(0.0)
}

/// Selection weight for a word. Unseen words dominate; error-prone and
/// long-unseen words rise; well-known words sink, never below `floor`.
pub fn compute_priority(stats: &ItemStats, now: DateTime<Utc>, w: &PriorityWeights) -> f64 {
    let mut priority = w.base;

    if stats.attempts == 0 {
        priority += w.unseen_bonus;
    } else {
        priority += stats.error_rate() * w.error_weight;
        priority -= stats.success_rate() * w.success_weight;

        if let Some(last) = stats.last_shown_at {
            priority += (days_since(last, now) * w.recency_per_day).min(w.recency_cap);
        }
    }

    if priority.is_nan() {
        return w.floor;
    }
    priority.max(w.floor)
}

/// Size of the eligible pool: `ceil(fraction * n)`, at least 1, at most n.
pub fn pool_size(candidates: usize, fraction: f64) -> usize {
    if candidates == 0 {
        return 0;
    }
    let size = (candidates as f64 * fraction).ceil() as usize;
    size.clamp(1, candidates)
}

/// Weighted draw over `(item, weight)` pairs. Returns the first item whose
/// cumulative weight reaches the roll; any numerical oddity falls back to the
/// first entry.
pub fn pick_weighted<T: Copy, R: Rng + ?Sized>(rng: &mut R, pool: &[(T, f64)]) -> Option<T> {
    let first = pool.first()?.0;

    let total: f64 = pool.iter().map(|(_, w)| w).sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(first);
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (item, weight) in pool {
        cumulative += weight;
        if cumulative >= roll {
            return Some(*item);
        }
    }

    Some(first)
}
