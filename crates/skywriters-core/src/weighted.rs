//! Weighted random selection.
//!
//! Used for entity-class spawn odds and the cloud colour palette. Given a
//! seeded RNG the selection is fully deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A value paired with its relative weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> WeightedEntry<T> {
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Sum of all weights. Negative weights count as zero.
pub fn total_weight<T>(entries: &[WeightedEntry<T>]) -> f64 {
    entries.iter().map(|e| e.weight.max(0.0)).sum()
}

/// Pick one entry with probability proportional to its weight.
///
/// Returns `None` when the list is empty or the total weight is not
/// positive; callers treat that as "no selection".
pub fn select_random_entry<'a, T, R: Rng + ?Sized>(
    entries: &'a [WeightedEntry<T>],
    rng: &mut R,
) -> Option<&'a WeightedEntry<T>> {
    let total = total_weight(entries);
    if entries.is_empty() || total <= 0.0 || !total.is_finite() {
        return None;
    }

    let roll = rng.gen_range(0.0..total);
    let mut running = 0.0;
    for entry in entries {
        let weight = entry.weight.max(0.0);
        running += weight;
        if running > roll {
            return Some(entry);
        }
    }

    // Accumulated rounding can leave `running` a hair below `roll`.
    entries.iter().rev().find(|e| e.weight > 0.0)
}

/// Pick one value with probability proportional to its weight.
pub fn select_random<'a, T, R: Rng + ?Sized>(
    entries: &'a [WeightedEntry<T>],
    rng: &mut R,
) -> Option<&'a T> {
    select_random_entry(entries, rng).map(|e| &e.value)
}
