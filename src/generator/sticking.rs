//! Sticking: which hand plays each stroke
//!
//! Hands are laid down in runs whose lengths come from the difficulty's
//! run-length distribution, then optionally rebalanced so no hand plays too
//! long a stretch or too large a share of the measure.

use rand::Rng;

use super::sampler::pick_capped;
use crate::config::{BalancePolicy, DifficultyConfig};
use crate::measure::{Measure, Stroke};

/// Chance that a measure starts on the dominant hand.
pub const INITIAL_DOMINANT_PROBABILITY: f64 = 0.85;

/// Label every note with a hand, one run at a time.
///
/// Run lengths count note slots (rests included) and are capped by the slots
/// left; after each run the hand flips with the configured switch
/// probability. Rests consume their slot but carry no hand.
pub fn assign_hands<R>(measure: &Measure, config: &DifficultyConfig, rng: &mut R) -> Measure
where
    R: Rng + ?Sized,
{
    let total = measure.len();
    let weights = config.run_length_weights();
    let mut dominant = rng.random::<f64>() < INITIAL_DOMINANT_PROBABILITY;
    let mut hands: Vec<bool> = Vec::with_capacity(total);

    while hands.len() < total {
        let left = total - hands.len();
        let run = pick_capped(&weights, left as u32, 1, rng).clamp(1, left as u32) as usize;
        hands.extend(std::iter::repeat(dominant).take(run));
        if rng.random::<f64>() < config.switch_probability {
            dominant = !dominant;
        }
    }

    measure.map_strokes(|i, note| {
        note.stroke.map(|s| Stroke {
            is_dominant: hands[i],
            ..s
        })
    })
}

/// Apply the balancing policy to the sounded notes of a measure.
///
/// Clump control runs first, then ratio control. Only hands change.
pub fn balance_hands(measure: &Measure, policy: &BalancePolicy) -> Measure {
    if !policy.enabled {
        return measure.clone();
    }

    let slots: Vec<usize> = measure
        .iter()
        .enumerate()
        .filter(|(_, n)| !n.is_rest())
        .map(|(i, _)| i)
        .collect();
    let mut hands: Vec<bool> = slots
        .iter()
        .filter_map(|&i| measure[i].is_dominant())
        .collect();

    if let Some(max_clump) = policy.max_clump {
        limit_clumps(&mut hands, max_clump);
    }
    correct_ratio(&mut hands, policy);

    let mut by_slot = vec![None; measure.len()];
    for (&slot, &hand) in slots.iter().zip(&hands) {
        by_slot[slot] = Some(hand);
    }
    measure.map_strokes(|i, note| {
        note.stroke.map(|s| Stroke {
            is_dominant: by_slot[i].unwrap_or(s.is_dominant),
            ..s
        })
    })
}

/// Flip the stroke that would extend a same-hand run past `max_clump`.
fn limit_clumps(hands: &mut [bool], max_clump: usize) {
    let mut run = 0;
    for i in 0..hands.len() {
        if i > 0 && hands[i] == hands[i - 1] {
            run += 1;
        } else {
            run = 1;
        }
        if run > max_clump {
            hands[i] = !hands[i];
            run = 1;
        }
    }
}

/// Pull the dominant share back into `[min_ratio, max_ratio]`, flipping from
/// the end of the measure backwards. A flip that would break the clump limit
/// is skipped; if that leaves the share outside the band, the measure is
/// re-sticked with the fewest changes that reach it within the clump limit.
fn correct_ratio(hands: &mut [bool], policy: &BalancePolicy) {
    let total = hands.len();
    if total == 0 {
        return;
    }
    let ratio = |d: usize| d as f64 / total as f64;
    let in_band = |d: usize| {
        policy.min_ratio.map_or(true, |m| ratio(d) >= m)
            && policy.max_ratio.map_or(true, |m| ratio(d) <= m)
    };

    flip_towards_band(hands, policy);

    let dominant = hands.iter().filter(|&&h| h).count();
    if let Some(max_clump) = policy.max_clump.filter(|_| !in_band(dominant)) {
        if let Some(fixed) = closest_sticking(hands, max_clump, in_band) {
            hands.copy_from_slice(&fixed);
        }
    }
}

fn flip_towards_band(hands: &mut [bool], policy: &BalancePolicy) {
    let total = hands.len();
    let mut dominant = hands.iter().filter(|&&h| h).count();
    let ratio = |d: usize| d as f64 / total as f64;

    if let Some(min) = policy.min_ratio.filter(|&m| ratio(dominant) < m) {
        for i in (0..total).rev() {
            if ratio(dominant) >= min {
                break;
            }
            if !hands[i] && flip_within_clump(hands, i, policy.max_clump) {
                hands[i] = true;
                dominant += 1;
            }
        }
    } else if let Some(max) = policy.max_ratio.filter(|&m| ratio(dominant) > m) {
        for i in (0..total).rev() {
            if ratio(dominant) <= max {
                break;
            }
            if hands[i] && flip_within_clump(hands, i, policy.max_clump) {
                hands[i] = false;
                dominant -= 1;
            }
        }
    }
}

/// The sticking with runs no longer than `max_clump` whose dominant count
/// satisfies `accept`, preferring the count nearest the current one and then
/// the fewest changed strokes. `None` if no such sticking exists.
fn closest_sticking<F>(hands: &[bool], max_clump: usize, accept: F) -> Option<Vec<bool>>
where
    F: Fn(usize) -> bool,
{
    if max_clump == 0 {
        return None;
    }
    let n = hands.len();
    let width = max_clump + 1;
    // state = (dominant count, current hand, run length)
    let state = |d: usize, hand: bool, run: usize| (d * 2 + hand as usize) * width + run;
    let decode = |s: usize| (s / width / 2, (s / width) % 2 == 1, s % width);
    let flips = |i: usize, hand: bool| (hand != hands[i]) as usize;

    // layers[i][s] = (changes so far, previous state)
    let mut layers: Vec<Vec<Option<(usize, usize)>>> = Vec::with_capacity(n);
    let mut first = vec![None; (n + 1) * 2 * width];
    for hand in [false, true] {
        first[state(hand as usize, hand, 1)] = Some((flips(0, hand), 0));
    }
    layers.push(first);

    for i in 1..n {
        let prev = &layers[i - 1];
        let mut next = vec![None; prev.len()];
        for (s, entry) in prev.iter().enumerate() {
            let Some((cost, _)) = *entry else { continue };
            let (d, hand, run) = decode(s);
            for next_hand in [false, true] {
                let next_run = if next_hand == hand { run + 1 } else { 1 };
                if next_run > max_clump {
                    continue;
                }
                let t = state(d + next_hand as usize, next_hand, next_run);
                let next_cost = cost + flips(i, next_hand);
                if next[t].map_or(true, |(c, _)| next_cost < c) {
                    next[t] = Some((next_cost, s));
                }
            }
        }
        layers.push(next);
    }

    let current = hands.iter().filter(|&&h| h).count();
    let (_, mut s) = layers
        .last()?
        .iter()
        .enumerate()
        .filter_map(|(s, entry)| entry.map(|(cost, _)| (s, cost)))
        .filter(|&(s, _)| accept(decode(s).0))
        .map(|(s, cost)| ((decode(s).0.abs_diff(current), cost), s))
        .min()?;

    let mut result = vec![false; n];
    for i in (0..n).rev() {
        result[i] = decode(s).1;
        if let Some((_, prev)) = layers[i][s] {
            s = prev;
        }
    }
    Some(result)
}

/// Whether flipping `hands[i]` keeps the run it joins within `max_clump`.
fn flip_within_clump(hands: &[bool], i: usize, max_clump: Option<usize>) -> bool {
    let Some(max_clump) = max_clump else {
        return true;
    };
    let flipped = !hands[i];
    let left = hands[..i].iter().rev().take_while(|&&h| h == flipped).count();
    let right = hands[i + 1..].iter().take_while(|&&h| h == flipped).count();
    left + 1 + right <= max_clump
}

/// Longest run of same-hand consecutive strokes, ignoring rests.
pub fn longest_clump(measure: &Measure) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut previous = None;
    for hand in measure.iter().filter_map(|n| n.is_dominant()) {
        run = if previous == Some(hand) { run + 1 } else { 1 };
        longest = longest.max(run);
        previous = Some(hand);
    }
    longest
}

/// Fraction of strokes played by the dominant hand; `None` without strokes.
pub fn dominant_ratio(measure: &Measure) -> Option<f64> {
    let hands: Vec<bool> = measure.iter().filter_map(|n| n.is_dominant()).collect();
    if hands.is_empty() {
        return None;
    }
    Some(hands.iter().filter(|&&h| h).count() as f64 / hands.len() as f64)
}
