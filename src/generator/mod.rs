//! # Generator Module
//!
//! Procedural generation of drum-rhythm exercises on the 24-ticks-per-beat
//! grid.
//!
//! ## Sub-modules
//! - `sampler` - Capped weighted pick (durations and run lengths)
//! - `rhythm` - Fills a measure with durations, places rests
//! - `sticking` - Hand assignment and hand balancing
//! - `articulation` - Dynamics and ornaments
//! - `engine` - Runs the stages for every measure of a request
//!
//! ## Entry Point
//! [`generate_beat()`] - Build a [`GeneratedBeat`](crate::GeneratedBeat) for a
//! [`BeatRequest`]
//!
//! ## Example
//! ```rust
//! use beatgen::generator::{generate_beat, BeatRequest};
//! use beatgen::{DifficultyRegistry, DifficultyTag};
//! use rand::SeedableRng;
//!
//! let registry = DifficultyRegistry::builtin().unwrap();
//! let request = BeatRequest { beats: 4, measures: 2, difficulty: DifficultyTag::Intermediate };
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(42);
//!
//! let beat = generate_beat(&request, &registry, &mut rng).unwrap();
//! assert_eq!(beat.measures.len(), 2);
//! assert!(beat.measures.iter().all(|m| m.length() == 96));
//! ```
//!
//! ## Randomness
//! Every stage takes the random source as `&mut R` where `R: Rng + ?Sized`.
//! There is no global generator: seed a `rand_pcg::Pcg64` for repeatable
//! output, or pass `rand::rng()` for fresh exercises.

mod articulation;
mod engine;
mod rhythm;
mod sampler;
mod sticking;

#[cfg(test)]
mod tests;

pub use articulation::{assign_dynamics, assign_ornaments, dynamic_for, ornament_for};
pub use engine::{generate_beat, generate_measure, BeatRequest};
pub use rhythm::{assign_rests, fill_measure, TUPLET_GROUP_PROBABILITY};
pub use sampler::{pick_capped, sample_duration, FALLBACK_DURATION};
pub use sticking::{
    assign_hands, balance_hands, dominant_ratio, longest_clump, INITIAL_DOMINANT_PROBABILITY,
};
