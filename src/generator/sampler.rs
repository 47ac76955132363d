//! Capped weighted sampling
//!
//! One primitive serves both the duration menu (cap = ticks left in the
//! measure) and the hand run-length distribution (cap = notes left to label).

use rand::Rng;

use crate::measure::Duration;

/// Returned when no duration fits under the cap.
pub const FALLBACK_DURATION: Duration = Duration::Sixteenth;

/// Pick one value from `entries`, ignoring values larger than `cap`.
///
/// Entries with an explicit weight keep it; entries without one share
/// `1 - explicit_total` evenly. Weights are normalized over the surviving
/// candidates, a uniform `r` in `[0, 1)` is drawn, and each normalized
/// weight is subtracted in list order; the first candidate that drives the
/// running total to `<= 0` wins. Rounding leftovers go to the last
/// candidate. With no candidate under the cap, `fallback` is returned
/// without drawing.
pub fn pick_capped<V, R>(entries: &[(V, Option<f64>)], cap: u32, fallback: V, rng: &mut R) -> V
where
    V: Copy + Into<u32>,
    R: Rng + ?Sized,
{
    let candidates: Vec<(V, Option<f64>)> = entries
        .iter()
        .copied()
        .filter(|(value, _)| Into::<u32>::into(*value) <= cap)
        .collect();
    let Some(&(last, _)) = candidates.last() else {
        return fallback;
    };

    let explicit_total: f64 = candidates.iter().filter_map(|(_, w)| *w).sum();
    let implicit_count = candidates.iter().filter(|(_, w)| w.is_none()).count();
    let implicit_share = if implicit_count > 0 {
        (1.0 - explicit_total).max(0.0) / implicit_count as f64
    } else {
        0.0
    };
    let weights: Vec<f64> = candidates
        .iter()
        .map(|(_, w)| w.unwrap_or(implicit_share))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut remaining: f64 = rng.random();
    for ((value, _), weight) in candidates.iter().zip(&weights) {
        // all-zero weights degrade to a uniform pick
        let normalized = if total > 0.0 {
            weight / total
        } else {
            1.0 / candidates.len() as f64
        };
        remaining -= normalized;
        if remaining <= 0.0 {
            return *value;
        }
    }
    last
}

/// Pick a duration from the menu that fits in `cap` ticks.
pub fn sample_duration<R>(menu: &[(Duration, Option<f64>)], cap: u32, rng: &mut R) -> Duration
where
    R: Rng + ?Sized,
{
    pick_capped(menu, cap, FALLBACK_DURATION, rng)
}
