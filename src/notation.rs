//! # Notation Layout
//!
//! Groups the notes of a measure into display units: single notes/rests,
//! beamed eighth pairs, and triplet groups.
//!
//! ## Rules
//! The measure is scanned left to right. At each position:
//!
//! 1. **Triplet** - three notes of the same triplet duration `d` (8 or 16),
//!    the first on a beat, each starting where the previous ends. The
//!    rest/hit pattern picks the result:
//!
//!    | pattern | result |
//!    |---|---|
//!    | rest rest rest | one rest of `3d` |
//!    | hit rest rest | one note of `3d` (keeps the hit's stroke) |
//!    | rest hit rest | `Ò` |
//!    | rest rest hit | `¤` |
//!    | hit hit rest | `Ó` |
//!    | hit rest hit | `Ñ` |
//!    | rest hit hit | `Õ` |
//!    | hit hit hit | `T` (eighth-triplet) / `t` (quarter-triplet) |
//!
//! 2. **Beam** - two sounded eighths, the first on a beat, the second
//!    starting 12 ticks later.
//!
//! 3. **Single** - anything else, unchanged.
//!
//! Only the first note of a candidate group is checked for beat alignment.
//!
//! ## Example
//! ```rust
//! use beatgen::{layout, DisplayUnit, Duration, Measure, Note};
//!
//! let measure = Measure::new(vec![
//!     Note::hit(0, Duration::Eighth),
//!     Note::hit(12, Duration::Eighth),
//! ]).unwrap();
//!
//! let units = layout(&measure);
//! assert!(matches!(units[0], DisplayUnit::Beamed { .. }));
//! ```

use serde::Serialize;

use crate::measure::{is_downbeat, Duration, GeneratedBeat, Measure, Note};

/// Symbol of a beamed eighth pair.
pub const BEAMED_SYMBOL: char = 'n';
pub const BEAMED_CLASS: &str = "isBeamedEighths";

pub const EIGHTH_TRIPLET_CLASS: &str = "isEighthTriplet";
pub const QUARTER_TRIPLET_CLASS: &str = "isQuarterTriplet";

/// Symbol and class of a triplet-length note that did not form a group.
pub const LOOSE_TRIPLET_SYMBOL: char = '3';
pub const LOOSE_TRIPLET_CLASS: &str = "isLooseTriplet";

/// One renderable group of notes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayUnit {
    Single {
        note: Note,
        /// Only set for a triplet-length note outside a group.
        #[serde(skip_serializing_if = "Option::is_none")]
        symbol: Option<char>,
        #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
        class_name: Option<&'static str>,
        start: u32,
    },
    Beamed {
        notes: [Note; 2],
        symbol: char,
        #[serde(rename = "className")]
        class_name: &'static str,
        start: u32,
    },
    Triplet {
        notes: [Note; 3],
        symbol: char,
        #[serde(rename = "className")]
        class_name: &'static str,
        start: u32,
    },
}

impl DisplayUnit {
    /// Wrap one note, tagging an ungrouped triplet-length note with
    /// [`LOOSE_TRIPLET_SYMBOL`] and [`LOOSE_TRIPLET_CLASS`].
    pub fn single(note: Note) -> Self {
        let loose = note.dur.is_triplet();
        DisplayUnit::Single {
            note,
            symbol: loose.then_some(LOOSE_TRIPLET_SYMBOL),
            class_name: loose.then_some(LOOSE_TRIPLET_CLASS),
            start: note.start,
        }
    }

    pub fn start(&self) -> u32 {
        match self {
            DisplayUnit::Single { start, .. }
            | DisplayUnit::Beamed { start, .. }
            | DisplayUnit::Triplet { start, .. } => *start,
        }
    }

    pub fn notes(&self) -> &[Note] {
        match self {
            DisplayUnit::Single { note, .. } => std::slice::from_ref(note),
            DisplayUnit::Beamed { notes, .. } => notes,
            DisplayUnit::Triplet { notes, .. } => notes,
        }
    }

    /// Ticks covered by this unit.
    pub fn span(&self) -> u32 {
        self.notes().iter().map(|n| n.dur.ticks()).sum()
    }

    /// Display symbol. Plain singles have none.
    pub fn symbol(&self) -> Option<char> {
        match self {
            DisplayUnit::Single { symbol, .. } => *symbol,
            DisplayUnit::Beamed { symbol, .. } | DisplayUnit::Triplet { symbol, .. } => {
                Some(*symbol)
            }
        }
    }

    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            DisplayUnit::Single { class_name, .. } => *class_name,
            DisplayUnit::Beamed { class_name, .. } | DisplayUnit::Triplet { class_name, .. } => {
                Some(*class_name)
            }
        }
    }
}

/// Group the notes of `measure` into display units.
pub fn layout(measure: &Measure) -> Vec<DisplayUnit> {
    let notes = measure.notes();
    let mut units = Vec::with_capacity(notes.len());
    let mut i = 0;

    while i < notes.len() {
        if let Some(unit) = triplet_at(notes, i) {
            units.push(unit);
            i += 3;
        } else if let Some(unit) = beam_at(notes, i) {
            units.push(unit);
            i += 2;
        } else {
            units.push(DisplayUnit::single(notes[i]));
            i += 1;
        }
    }
    units
}

/// Lay out every measure of a beat.
pub fn layout_beat(beat: &GeneratedBeat) -> Vec<Vec<DisplayUnit>> {
    beat.measures.iter().map(layout).collect()
}

fn triplet_at(notes: &[Note], i: usize) -> Option<DisplayUnit> {
    let [a, b, c] = notes.get(i..i + 3)? else {
        return None;
    };
    let d = a.dur;
    let group_dur = d.triplet_group()?;
    let consecutive = b.start == a.start + d.ticks() && c.start == b.start + d.ticks();
    if !is_downbeat(a.start) || b.dur != d || c.dur != d || !consecutive {
        return None;
    }

    let symbol = match (!a.is_rest(), !b.is_rest(), !c.is_rest()) {
        (false, false, false) => {
            return Some(DisplayUnit::single(Note::rest(a.start, group_dur)))
        }
        (true, false, false) => {
            return Some(DisplayUnit::single(Note {
                dur: group_dur,
                ..*a
            }))
        }
        (false, true, false) => 'Ò',
        (false, false, true) => '¤',
        (true, true, false) => 'Ó',
        (true, false, true) => 'Ñ',
        (false, true, true) => 'Õ',
        (true, true, true) if d == Duration::EighthTriplet => 'T',
        (true, true, true) => 't',
    };
    let class_name = if d == Duration::EighthTriplet {
        EIGHTH_TRIPLET_CLASS
    } else {
        QUARTER_TRIPLET_CLASS
    };
    Some(DisplayUnit::Triplet {
        notes: [*a, *b, *c],
        symbol,
        class_name,
        start: a.start,
    })
}

fn beam_at(notes: &[Note], i: usize) -> Option<DisplayUnit> {
    let [a, b] = notes.get(i..i + 2)? else {
        return None;
    };
    let beamable = |n: &Note| !n.is_rest() && n.dur == Duration::Eighth;
    if beamable(a) && is_downbeat(a.start) && beamable(b) && b.start == a.start + 12 {
        Some(DisplayUnit::Beamed {
            notes: [*a, *b],
            symbol: BEAMED_SYMBOL,
            class_name: BEAMED_CLASS,
            start: a.start,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{Dynamic, Ornament, Stroke};

    fn measure(notes: Vec<Note>) -> Measure {
        Measure::new(notes).unwrap()
    }

    fn kinds(units: &[DisplayUnit]) -> Vec<&'static str> {
        units
            .iter()
            .map(|u| match u {
                DisplayUnit::Single { .. } => "single",
                DisplayUnit::Beamed { .. } => "beamed",
                DisplayUnit::Triplet { .. } => "triplet",
            })
            .collect()
    }

    fn triplet(pattern: [bool; 3], d: Duration) -> Measure {
        let notes = pattern
            .iter()
            .enumerate()
            .map(|(k, &hit)| {
                let start = k as u32 * d.ticks();
                if hit {
                    Note::hit(start, d)
                } else {
                    Note::rest(start, d)
                }
            })
            .collect();
        measure(notes)
    }

    fn triplet_symbol(pattern: [bool; 3]) -> Option<char> {
        match layout(&triplet(pattern, Duration::EighthTriplet)).as_slice() {
            [DisplayUnit::Triplet { symbol, .. }] => Some(*symbol),
            _ => None,
        }
    }

    #[test]
    fn test_beamed_eighth_pair() {
        let m = measure(vec![Note::hit(0, Duration::Eighth), Note::hit(12, Duration::Eighth)]);
        let units = layout(&m);
        assert_eq!(
            units,
            vec![DisplayUnit::Beamed {
                notes: [m[0], m[1]],
                symbol: BEAMED_SYMBOL,
                class_name: BEAMED_CLASS,
                start: 0,
            }]
        );
    }

    #[test]
    fn test_non_adjacent_eighths_not_beamed() {
        let m = measure(vec![
            Note::hit(0, Duration::Eighth),
            Note::hit(12, Duration::Quarter),
            Note::hit(36, Duration::Eighth),
        ]);
        assert_eq!(kinds(&layout(&m)), vec!["single", "single", "single"]);
    }

    #[test]
    fn test_offbeat_eighth_pair_not_beamed() {
        let m = measure(vec![
            Note::hit(0, Duration::Eighth),
            Note::rest(12, Duration::Eighth),
            Note::hit(24, Duration::Eighth),
            Note::hit(36, Duration::Eighth),
            Note::hit(48, Duration::Quarter),
        ]);
        // the rest at 12 breaks the first pair
        assert_eq!(kinds(&layout(&m)), vec!["single", "single", "beamed", "single"]);

        let offbeat = measure(vec![
            Note::hit(0, Duration::DottedEighth),
            Note::hit(18, Duration::Sixteenth),
            Note::hit(24, Duration::Eighth),
            Note::hit(36, Duration::Eighth),
        ]);
        assert_eq!(kinds(&layout(&offbeat)), vec!["single", "single", "beamed"]);

        let shifted = measure(vec![
            Note::hit(0, Duration::Eighth),
            Note::hit(12, Duration::Eighth),
            Note::hit(24, Duration::Eighth),
        ]);
        assert_eq!(kinds(&layout(&shifted)), vec!["beamed", "single"]);
    }

    #[test]
    fn test_pair_starting_off_the_beat_not_beamed() {
        let m = measure(vec![
            Note::hit(0, Duration::Sixteenth),
            Note::hit(6, Duration::Sixteenth),
            Note::hit(12, Duration::Eighth),
            Note::hit(24, Duration::Eighth),
            Note::hit(36, Duration::Eighth),
        ]);
        let units = layout(&m);
        assert_eq!(kinds(&units), vec!["single", "single", "single", "beamed"]);
        assert_eq!(units[2].start(), 12);
        assert_eq!(units[3].start(), 24);
    }

    #[test]
    fn test_eighth_rests_not_beamed() {
        let m = measure(vec![Note::hit(0, Duration::Eighth), Note::rest(12, Duration::Eighth)]);
        assert_eq!(kinds(&layout(&m)), vec!["single", "single"]);
    }

    #[test]
    fn test_triplet_all_rest_collapses() {
        let units = layout(&triplet([false, false, false], Duration::EighthTriplet));
        assert_eq!(
            units,
            vec![DisplayUnit::single(Note::rest(0, Duration::Quarter))]
        );
    }

    #[test]
    fn test_triplet_lead_hit_collapses_keeping_stroke() {
        let stroke = Stroke {
            dynamic: Dynamic::Accent,
            is_dominant: false,
            ornament: Some(Ornament::Flam),
        };
        let m = measure(vec![
            Note {
                stroke: Some(stroke),
                ..Note::hit(0, Duration::QuarterTriplet)
            },
            Note::rest(16, Duration::QuarterTriplet),
            Note::rest(32, Duration::QuarterTriplet),
        ]);
        let units = layout(&m);
        assert_eq!(
            units,
            vec![DisplayUnit::single(Note {
                start: 0,
                dur: Duration::Half,
                stroke: Some(stroke),
            })]
        );
    }

    #[test]
    fn test_triplet_symbols() {
        assert_eq!(triplet_symbol([false, true, false]), Some('Ò'));
        assert_eq!(triplet_symbol([false, false, true]), Some('¤'));
        assert_eq!(triplet_symbol([true, true, false]), Some('Ó'));
        assert_eq!(triplet_symbol([true, false, true]), Some('Ñ'));
        assert_eq!(triplet_symbol([false, true, true]), Some('Õ'));
        assert_eq!(triplet_symbol([true, true, true]), Some('T'));
        assert_eq!(triplet_symbol([true, false, false]), None);
        assert_eq!(triplet_symbol([false, false, false]), None);
    }

    #[test]
    fn test_full_triplet_classes() {
        let eighth = layout(&triplet([true; 3], Duration::EighthTriplet));
        assert_eq!(eighth[0].symbol(), Some('T'));
        assert_eq!(eighth[0].class_name(), Some(EIGHTH_TRIPLET_CLASS));

        let quarter = layout(&triplet([true; 3], Duration::QuarterTriplet));
        assert_eq!(quarter[0].symbol(), Some('t'));
        assert_eq!(quarter[0].class_name(), Some(QUARTER_TRIPLET_CLASS));
        assert_eq!(quarter[0].span(), 48);
    }

    #[test]
    fn test_offbeat_triplet_not_grouped() {
        let m = measure(vec![
            Note::hit(0, Duration::Sixteenth),
            Note::hit(6, Duration::Sixteenth),
            Note::hit(12, Duration::EighthTriplet),
            Note::hit(20, Duration::EighthTriplet),
            Note::hit(28, Duration::EighthTriplet),
            Note::hit(36, Duration::Eighth),
        ]);
        let units = layout(&m);
        assert_eq!(units.len(), 6);
        assert_eq!(units[2].symbol(), Some(LOOSE_TRIPLET_SYMBOL));
        assert_eq!(units[2].class_name(), Some(LOOSE_TRIPLET_CLASS));
    }

    #[test]
    fn test_mixed_triplet_durations_not_grouped() {
        let m = measure(vec![
            Note::hit(0, Duration::EighthTriplet),
            Note::hit(8, Duration::QuarterTriplet),
            Note::hit(24, Duration::Quarter),
        ]);
        assert_eq!(kinds(&layout(&m)), vec!["single", "single", "single"]);
    }

    #[test]
    fn test_triplet_then_beam() {
        let m = measure(vec![
            Note::hit(0, Duration::EighthTriplet),
            Note::rest(8, Duration::EighthTriplet),
            Note::hit(16, Duration::EighthTriplet),
            Note::hit(24, Duration::Eighth),
            Note::hit(36, Duration::Eighth),
        ]);
        let units = layout(&m);
        assert_eq!(kinds(&units), vec!["triplet", "beamed"]);
        assert_eq!(units[0].symbol(), Some('Ñ'));
        assert_eq!(units[1].start(), 24);
    }

    #[test]
    fn test_empty_measure() {
        assert!(layout(&Measure::default()).is_empty());
    }

    #[test]
    fn test_single_json_shape() {
        let m = measure(vec![Note::hit(0, Duration::Eighth), Note::hit(12, Duration::Eighth)]);
        let json = serde_json::to_value(layout(&m)).unwrap();
        assert_eq!(json[0]["kind"], "beamed");
        assert_eq!(json[0]["className"], BEAMED_CLASS);
        assert_eq!(json[0]["notes"][1]["start"], 12);
    }

    #[test]
    fn test_loose_triplet_json_carries_fallback() {
        let m = measure(vec![
            Note::hit(0, Duration::Sixteenth),
            Note::hit(6, Duration::Sixteenth),
            Note::hit(12, Duration::EighthTriplet),
            Note::hit(20, Duration::QuarterTriplet),
            Note::hit(36, Duration::Eighth),
        ]);
        let json = serde_json::to_value(layout(&m)).unwrap();
        assert_eq!(json[2]["kind"], "single");
        assert_eq!(json[2]["symbol"], "3");
        assert_eq!(json[2]["className"], LOOSE_TRIPLET_CLASS);
        assert_eq!(json[3]["symbol"], "3");
        // plain singles carry neither field
        assert!(json[0].get("symbol").is_none());
        assert!(json[0].get("className").is_none());
        assert!(json[4].get("symbol").is_none());
    }
}
