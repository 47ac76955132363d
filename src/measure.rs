//! # Measure Types
//!
//! This module defines the value types shared by the generator and the
//! notation layout engine.
//!
//! ## Type Hierarchy
//! ```text
//! GeneratedBeat
//!   ├── beats_per_measure: u32
//!   ├── difficulty: DifficultyTag
//!   └── Vec<Measure>
//!         └── Vec<Note> (contiguous from tick 0)
//!               ├── start: u32 (ticks)
//!               ├── dur: Duration
//!               └── stroke: Option<Stroke> (None = rest)
//!                     ├── dynamic: Dynamic (normal, accent, rimshot, ghost)
//!                     ├── is_dominant: bool
//!                     └── ornament: Option<Ornament> (flam, drag)
//! ```
//!
//! ## Tick Grid
//! All timing is integer ticks, 24 per quarter note. The legal durations are
//! - straight: 6, 12, 24, 48, 96
//! - dotted: 18, 36, 72
//! - triplet: 8 (eighth-triplet), 16 (quarter-triplet)
//!
//! ## Tiling
//! A `Measure` can only be built from notes that start at 0 and follow each
//! other without gap or overlap. Everything downstream (hand assignment,
//! layout, export) relies on that and never re-checks it.

use std::convert::TryFrom;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::config::DifficultyTag;
use crate::error::BeatError;

/// Ticks in one beat (quarter note).
pub const TICKS_PER_BEAT: u32 = 24;

/// Length in ticks of a measure with `beats` quarter-note beats.
pub fn measure_length(beats: u32) -> u32 {
    beats * TICKS_PER_BEAT
}

/// True if `tick` falls on a beat.
pub fn is_downbeat(tick: u32) -> bool {
    tick % TICKS_PER_BEAT == 0
}

/// Note duration on the tick grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Duration {
    Sixteenth,      // 6
    EighthTriplet,  // 8
    Eighth,         // 12
    QuarterTriplet, // 16
    DottedEighth,   // 18
    Quarter,        // 24
    DottedQuarter,  // 36
    Half,           // 48
    DottedHalf,     // 72
    Whole,          // 96
}

impl Duration {
    pub const ALL: [Duration; 10] = [
        Duration::Sixteenth,
        Duration::EighthTriplet,
        Duration::Eighth,
        Duration::QuarterTriplet,
        Duration::DottedEighth,
        Duration::Quarter,
        Duration::DottedQuarter,
        Duration::Half,
        Duration::DottedHalf,
        Duration::Whole,
    ];

    pub fn ticks(self) -> u32 {
        match self {
            Duration::Sixteenth => 6,
            Duration::EighthTriplet => 8,
            Duration::Eighth => 12,
            Duration::QuarterTriplet => 16,
            Duration::DottedEighth => 18,
            Duration::Quarter => 24,
            Duration::DottedQuarter => 36,
            Duration::Half => 48,
            Duration::DottedHalf => 72,
            Duration::Whole => 96,
        }
    }

    /// Eighth- or quarter-triplet.
    pub fn is_triplet(self) -> bool {
        matches!(self, Duration::EighthTriplet | Duration::QuarterTriplet)
    }

    pub fn is_dotted(self) -> bool {
        matches!(
            self,
            Duration::DottedEighth | Duration::DottedQuarter | Duration::DottedHalf
        )
    }

    /// Value that three of this triplet duration add up to.
    pub fn triplet_group(self) -> Option<Duration> {
        match self {
            Duration::EighthTriplet => Some(Duration::Quarter),
            Duration::QuarterTriplet => Some(Duration::Half),
            _ => None,
        }
    }

    /// MusicXML type name of the written note value.
    ///
    /// Triplets and dotted values report their base value; the caller adds
    /// the time modification or dot.
    pub fn musicxml_type(self) -> &'static str {
        match self {
            Duration::Sixteenth => "16th",
            Duration::EighthTriplet | Duration::Eighth | Duration::DottedEighth => "eighth",
            Duration::QuarterTriplet | Duration::Quarter | Duration::DottedQuarter => "quarter",
            Duration::Half | Duration::DottedHalf => "half",
            Duration::Whole => "whole",
        }
    }
}

impl TryFrom<u32> for Duration {
    type Error = BeatError;

    fn try_from(ticks: u32) -> Result<Self, Self::Error> {
        Duration::ALL
            .iter()
            .copied()
            .find(|d| d.ticks() == ticks)
            .ok_or(BeatError::InvalidDuration(ticks))
    }
}

impl From<Duration> for u32 {
    fn from(d: Duration) -> u32 {
        d.ticks()
    }
}

/// Loudness/articulation class of a sounded note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dynamic {
    #[default]
    Normal,
    Accent,
    Rimshot,
    Ghost,
}

/// Secondary articulation played before the main stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ornament {
    Flam,
    Drag,
}

/// Performance data of a sounded note. Rests have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stroke {
    pub dynamic: Dynamic,
    pub is_dominant: bool,
    pub ornament: Option<Ornament>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            dynamic: Dynamic::Normal,
            is_dominant: true,
            ornament: None,
        }
    }
}

/// A note or rest on the tick grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNote", into = "RawNote")]
pub struct Note {
    pub start: u32,
    pub dur: Duration,
    pub stroke: Option<Stroke>,
}

impl Note {
    /// A sounded note with placeholder performance data.
    pub fn hit(start: u32, dur: Duration) -> Self {
        Self {
            start,
            dur,
            stroke: Some(Stroke::default()),
        }
    }

    pub fn rest(start: u32, dur: Duration) -> Self {
        Self {
            start,
            dur,
            stroke: None,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.stroke.is_none()
    }

    /// First tick after this note.
    pub fn end(&self) -> u32 {
        self.start + self.dur.ticks()
    }

    /// Hand of a sounded note; `None` for rests.
    pub fn is_dominant(&self) -> Option<bool> {
        self.stroke.map(|s| s.is_dominant)
    }
}

/// Flat JSON view of a note, matching the field names the rendering side
/// expects (`isRest`, `isDominant`, ...).
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawNote {
    start: u32,
    dur: u32,
    #[serde(default)]
    is_rest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dynamic: Option<Dynamic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_dominant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ornament: Option<Ornament>,
}

impl From<Note> for RawNote {
    fn from(note: Note) -> Self {
        let mut raw = RawNote {
            start: note.start,
            dur: note.dur.ticks(),
            is_rest: note.is_rest(),
            ..RawNote::default()
        };
        if let Some(stroke) = note.stroke {
            raw.dynamic = Some(stroke.dynamic);
            raw.is_dominant = Some(stroke.is_dominant);
            raw.ornament = stroke.ornament;
        }
        raw
    }
}

impl TryFrom<RawNote> for Note {
    type Error = BeatError;

    fn try_from(raw: RawNote) -> Result<Self, Self::Error> {
        let dur = Duration::try_from(raw.dur)?;
        let stroke = if raw.is_rest {
            None
        } else {
            Some(Stroke {
                dynamic: raw.dynamic.unwrap_or_default(),
                is_dominant: raw.is_dominant.unwrap_or(true),
                ornament: raw.ornament,
            })
        };
        Ok(Note {
            start: raw.start,
            dur,
            stroke,
        })
    }
}

/// An ordered run of notes that exactly tiles its length.
///
/// Construction goes through [`Measure::new`] or [`Measure::with_length`];
/// there is no way to hold a `Measure` with gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Note>", into = "Vec<Note>")]
pub struct Measure {
    notes: Vec<Note>,
}

impl Measure {
    /// Build a measure from notes that start at 0 and are contiguous.
    pub fn new(notes: Vec<Note>) -> Result<Self, BeatError> {
        validate_tiling(&notes)?;
        Ok(Self { notes })
    }

    /// Like [`Measure::new`], also requiring the notes to sum to `length` ticks.
    pub fn with_length(notes: Vec<Note>, length: u32) -> Result<Self, BeatError> {
        let measure = Self::new(notes)?;
        if measure.length() != length {
            return Err(BeatError::InvalidMeasure {
                index: measure.notes.len(),
                message: format!(
                    "measure spans {} ticks, expected {}",
                    measure.length(),
                    length
                ),
            });
        }
        Ok(measure)
    }

    /// Wrap notes the caller has laid out itself (the rhythm filler, or a
    /// stage that only rewrites strokes).
    pub(crate) fn from_tiled(notes: Vec<Note>) -> Self {
        debug_assert!(validate_tiling(&notes).is_ok());
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    /// Total span in ticks.
    pub fn length(&self) -> u32 {
        self.notes.last().map(Note::end).unwrap_or(0)
    }

    /// Copy of this measure with every note passed through `f`.
    ///
    /// `f` may only touch `stroke`; timing changes are discarded.
    pub(crate) fn map_strokes<F>(&self, mut f: F) -> Measure
    where
        F: FnMut(usize, &Note) -> Option<Stroke>,
    {
        let notes = self
            .notes
            .iter()
            .enumerate()
            .map(|(i, n)| Note {
                stroke: f(i, n),
                ..*n
            })
            .collect();
        Measure::from_tiled(notes)
    }
}

impl Deref for Measure {
    type Target = [Note];

    fn deref(&self) -> &Self::Target {
        &self.notes
    }
}

impl TryFrom<Vec<Note>> for Measure {
    type Error = BeatError;

    fn try_from(notes: Vec<Note>) -> Result<Self, Self::Error> {
        Measure::new(notes)
    }
}

impl From<Measure> for Vec<Note> {
    fn from(measure: Measure) -> Self {
        measure.notes
    }
}

/// Check that notes start at 0 and each begins where the previous ends.
fn validate_tiling(notes: &[Note]) -> Result<(), BeatError> {
    let mut expected = 0;
    for (i, note) in notes.iter().enumerate() {
        if note.start != expected {
            return Err(BeatError::InvalidMeasure {
                index: i,
                message: format!("expected start {}, got {}", expected, note.start),
            });
        }
        expected = note.end();
    }
    Ok(())
}

/// The result of one generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBeat {
    pub measures: Vec<Measure>,
    pub beats_per_measure: u32,
    pub difficulty: DifficultyTag,
}

impl GeneratedBeat {
    /// Length in ticks of every measure of this beat.
    pub fn measure_length(&self) -> u32 {
        measure_length(self.beats_per_measure)
    }
}
