//! Measure filling and rest placement

use rand::Rng;

use super::sampler::{sample_duration, FALLBACK_DURATION};
use crate::measure::{Duration, Measure, Note};

/// Chance that a sampled triplet duration becomes a full three-note group.
pub const TUPLET_GROUP_PROBABILITY: f64 = 0.7;

/// Fill `target` ticks with notes drawn from the duration menu.
///
/// Every note is a hit with placeholder strokes (dominant, normal, no
/// ornament); later stages overwrite them. When a triplet duration `d` is
/// drawn, a three-note run of `d` is emitted with probability
/// [`TUPLET_GROUP_PROBABILITY`] if `3d` still fits; otherwise a lone
/// triplet-length note goes in.
///
/// Candidates that would leave a remainder no combination of menu values
/// (plus the 6-tick fallback) can fill are withheld from the sampler, so
/// the result always tiles `target` exactly.
pub fn fill_measure<R>(menu: &[(Duration, Option<f64>)], target: u32, rng: &mut R) -> Measure
where
    R: Rng + ?Sized,
{
    let tileable = tileable_lengths(menu, target);
    let fits = |len: u32| tileable.get(len as usize).copied().unwrap_or(false);

    let mut notes = Vec::new();
    let mut t = 0;
    while t < target {
        let remaining = target - t;
        let choices: Vec<(Duration, Option<f64>)> = menu
            .iter()
            .copied()
            .filter(|(d, _)| d.ticks() <= remaining && fits(remaining - d.ticks()))
            .collect();
        let d = sample_duration(&choices, remaining, rng);

        if d.is_triplet() {
            let run = 3 * d.ticks();
            let grouped = rng.random::<f64>() < TUPLET_GROUP_PROBABILITY;
            if grouped && remaining >= run && fits(remaining - run) {
                for k in 0..3 {
                    notes.push(Note::hit(t + k * d.ticks(), d));
                }
                t += run;
                continue;
            }
        }
        notes.push(Note::hit(t, d));
        t += d.ticks();
    }
    Measure::from_tiled(notes)
}

/// `result[n]` is true when `n` ticks can be filled from the menu durations
/// and the fallback.
fn tileable_lengths(menu: &[(Duration, Option<f64>)], target: u32) -> Vec<bool> {
    let mut steps: Vec<u32> = menu.iter().map(|(d, _)| d.ticks()).collect();
    steps.push(FALLBACK_DURATION.ticks());
    steps.sort_unstable();
    steps.dedup();

    let len = target as usize + 1;
    let mut reachable = vec![false; len];
    reachable[0] = true;
    for n in 1..len {
        reachable[n] = steps
            .iter()
            .any(|&s| s as usize <= n && reachable[n - s as usize]);
    }
    reachable
}

/// Turn each note into a rest with probability `rest_probability`.
///
/// Timing is unchanged.
pub fn assign_rests<R>(measure: &Measure, rest_probability: f64, rng: &mut R) -> Measure
where
    R: Rng + ?Sized,
{
    measure.map_strokes(|_, note| {
        if rng.random::<f64>() < rest_probability {
            None
        } else {
            note.stroke
        }
    })
}
