//! # Error Types
//!
//! This module defines all error types for the beat generator.
//!
//! Generation and layout are total over well-formed inputs, so the only
//! failure a normal request can hit is an unknown difficulty. The other
//! variants come from the boundaries: building a `Measure` from untrusted
//! notes, and loading a difficulty registry.
//!
//! ## Error Types
//! - `UnknownDifficulty` - The requested tag has no configuration
//! - `InvalidMeasure` - Notes that do not tile a measure
//! - `InvalidDuration` - A tick count that is not a legal duration
//! - `ConfigError` - Malformed YAML registry or illegal values in it
//!
//! ## Usage
//! ```rust
//! use beatgen::{generate_seeded, BeatError, BeatRequest, DifficultyRegistry, DifficultyTag};
//!
//! let registry = DifficultyRegistry::builtin().unwrap();
//! let request = BeatRequest { beats: 4, measures: 2, difficulty: DifficultyTag::Beginner };
//! match generate_seeded(&request, &registry, 7) {
//!     Ok(beat) => println!("{} measures", beat.measures.len()),
//!     Err(BeatError::UnknownDifficulty(tag)) => eprintln!("no config for {}", tag),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeatError {
    /// The requested difficulty has no entry in the registry.
    ///
    /// # Example
    /// ```
    /// # use beatgen::BeatError;
    /// let err = BeatError::UnknownDifficulty("expert".to_string());
    /// assert_eq!(err.to_string(), "Unknown difficulty: expert");
    /// ```
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// A note sequence that does not tile its measure.
    ///
    /// `index` is the offending note (0-based), or the note count when the
    /// total length is wrong.
    ///
    /// # Example
    /// ```
    /// # use beatgen::BeatError;
    /// let err = BeatError::InvalidMeasure {
    ///     index: 2,
    ///     message: "expected start 24, got 30".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid measure at note 2: expected start 24, got 30");
    /// ```
    #[error("Invalid measure at note {index}: {message}")]
    InvalidMeasure { index: usize, message: String },

    /// A tick count outside the legal duration set.
    ///
    /// # Example
    /// ```
    /// # use beatgen::BeatError;
    /// assert_eq!(BeatError::InvalidDuration(10).to_string(), "Invalid duration: 10 ticks");
    /// ```
    #[error("Invalid duration: {0} ticks")]
    InvalidDuration(u32),

    /// Invalid difficulty configuration.
    ///
    /// Occurs when registry YAML cannot be parsed or contains values the
    /// generator cannot use.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
