//! Beat assembly
//!
//! Runs the per-measure pipeline for every measure of a request:
//!
//! ```text
//! fill_measure -> assign_rests -> assign_hands -> assign_dynamics
//!              -> assign_ornaments -> balance_hands
//! ```
//!
//! Each stage takes the previous `Measure` by reference and returns a new
//! one; nothing is shared between measures except the random source.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::articulation::{assign_dynamics, assign_ornaments};
use super::rhythm::{assign_rests, fill_measure};
use super::sticking::{assign_hands, balance_hands};
use crate::config::{DifficultyConfig, DifficultyRegistry, DifficultyTag};
use crate::error::BeatError;
use crate::measure::{measure_length, GeneratedBeat, Measure};

/// A request for one exercise
///
/// Range checks (`beats` 1..=16, `measures` 1..=32) belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatRequest {
    pub beats: u32,
    pub measures: u32,
    pub difficulty: DifficultyTag,
}

/// Generate one measure of `grid_size` ticks.
pub fn generate_measure<R>(config: &DifficultyConfig, grid_size: u32, rng: &mut R) -> Measure
where
    R: Rng + ?Sized,
{
    let menu = config.duration_weights();
    let rhythm = fill_measure(&menu, grid_size, rng);
    let rhythm = assign_rests(&rhythm, config.rest_probability, rng);
    let sticking = assign_hands(&rhythm, config, rng);
    let dynamics = assign_dynamics(&sticking, config, rng);
    let ornaments = assign_ornaments(&dynamics, config, rng);
    balance_hands(&ornaments, &config.balancing)
}

/// Generate every measure of `request`.
///
/// # Errors
/// [`BeatError::UnknownDifficulty`] when the registry has no entry for the
/// requested difficulty.
pub fn generate_beat<R>(
    request: &BeatRequest,
    registry: &DifficultyRegistry,
    rng: &mut R,
) -> Result<GeneratedBeat, BeatError>
where
    R: Rng + ?Sized,
{
    let grid_size = measure_length(request.beats);
    let config = registry.get(request.difficulty)?;

    let measures = (0..request.measures)
        .map(|index| {
            let measure = generate_measure(config, grid_size, rng);
            tracing::debug!(
                index,
                notes = measure.len(),
                rests = measure.iter().filter(|n| n.is_rest()).count(),
                "generated measure"
            );
            measure
        })
        .collect();

    Ok(GeneratedBeat {
        measures,
        beats_per_measure: request.beats,
        difficulty: request.difficulty,
    })
}
