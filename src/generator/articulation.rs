//! Dynamics and ornaments
//!
//! Both are independent per-stroke draws against the difficulty's
//! thresholds. Rests are skipped and consume no randomness.

use rand::Rng;

use crate::config::DifficultyConfig;
use crate::measure::{Dynamic, Measure, Ornament, Stroke};

/// Dynamic for a uniform draw `r` in `[0, 1)`.
///
/// Ghost strokes are never drawn here; the level exists for hand-written
/// exercises.
pub fn dynamic_for(r: f64, normal_threshold: f64, accent_threshold: f64) -> Dynamic {
    if r < normal_threshold {
        Dynamic::Normal
    } else if r < accent_threshold {
        Dynamic::Accent
    } else {
        Dynamic::Rimshot
    }
}

/// Ornament for a uniform draw `r` in `[0, 1)`.
pub fn ornament_for(r: f64, flam_threshold: f64, drag_threshold: f64) -> Option<Ornament> {
    if r < flam_threshold {
        Some(Ornament::Flam)
    } else if r < flam_threshold + drag_threshold {
        Some(Ornament::Drag)
    } else {
        None
    }
}

pub fn assign_dynamics<R>(measure: &Measure, config: &DifficultyConfig, rng: &mut R) -> Measure
where
    R: Rng + ?Sized,
{
    let (normal, accent) = (config.normal_threshold(), config.accent_threshold());
    measure.map_strokes(|_, note| {
        note.stroke.map(|s| Stroke {
            dynamic: dynamic_for(rng.random(), normal, accent),
            ..s
        })
    })
}

pub fn assign_ornaments<R>(measure: &Measure, config: &DifficultyConfig, rng: &mut R) -> Measure
where
    R: Rng + ?Sized,
{
    let (flam, drag) = (config.flam_threshold, config.drag_threshold);
    measure.map_strokes(|_, note| {
        note.stroke.map(|s| Stroke {
            ornament: ornament_for(rng.random(), flam, drag),
            ..s
        })
    })
}
