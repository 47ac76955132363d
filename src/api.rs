//! # Public API
//!
//! This module contains the main entry points for the beatgen library.
//!
//! ## Functions
//!
//! - [`generate()`] - Generate an exercise with a caller-supplied random source
//! - [`generate_seeded()`] - Same, from a `u64` seed (repeatable output)
//! - [`generate_builtin()`] - Seeded generation against the bundled difficulty table
//! - [`layout_beat()`](crate::layout_beat) - Group every measure of a beat into display units
//! - [`export_musicxml()`] - Render a beat as MusicXML
//!
//! ## Typical Usage
//!
//! ```rust
//! use beatgen::{generate_builtin, layout_beat, BeatRequest, DifficultyTag};
//!
//! let request = BeatRequest { beats: 4, measures: 4, difficulty: DifficultyTag::Advanced };
//! let beat = generate_builtin(&request, 7)?;
//!
//! for units in layout_beat(&beat) {
//!     let ticks: u32 = units.iter().map(|u| u.span()).sum();
//!     assert_eq!(ticks, 96);
//! }
//! # Ok::<(), beatgen::BeatError>(())
//! ```

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::{
    generator::{generate_beat, BeatRequest},
    musicxml::to_musicxml,
    BeatError, DifficultyRegistry, GeneratedBeat,
};

/// Generate an exercise.
///
/// Every measure of the result tiles `request.beats * 24` ticks exactly.
///
/// # Errors
/// [`BeatError::UnknownDifficulty`] if `registry` has no entry for
/// `request.difficulty`.
pub fn generate<R>(
    request: &BeatRequest,
    registry: &DifficultyRegistry,
    rng: &mut R,
) -> Result<GeneratedBeat, BeatError>
where
    R: Rng + ?Sized,
{
    tracing::info!(
        beats = request.beats,
        measures = request.measures,
        difficulty = %request.difficulty,
        "generating exercise"
    );
    generate_beat(request, registry, rng)
}

/// Generate an exercise from a seed.
///
/// The same seed, request and registry always give the same beat.
///
/// # Example
/// ```rust
/// use beatgen::{generate_seeded, BeatRequest, DifficultyRegistry, DifficultyTag};
///
/// let registry = DifficultyRegistry::builtin()?;
/// let request = BeatRequest { beats: 3, measures: 2, difficulty: DifficultyTag::Beginner };
///
/// let a = generate_seeded(&request, &registry, 99)?;
/// let b = generate_seeded(&request, &registry, 99)?;
/// assert_eq!(a, b);
/// # Ok::<(), beatgen::BeatError>(())
/// ```
pub fn generate_seeded(
    request: &BeatRequest,
    registry: &DifficultyRegistry,
    seed: u64,
) -> Result<GeneratedBeat, BeatError> {
    let mut rng = Pcg64::seed_from_u64(seed);
    generate(request, registry, &mut rng)
}

/// Seeded generation against [`DifficultyRegistry::builtin()`].
pub fn generate_builtin(request: &BeatRequest, seed: u64) -> Result<GeneratedBeat, BeatError> {
    let registry = DifficultyRegistry::builtin()?;
    generate_seeded(request, &registry, seed)
}

/// Render `beat` as a MusicXML percussion part.
pub fn export_musicxml(beat: &GeneratedBeat) -> String {
    to_musicxml(beat)
}
