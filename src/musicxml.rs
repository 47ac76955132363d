use crate::measure::{Duration, Dynamic, GeneratedBeat, Measure, Note, Ornament, Stroke};
use crate::notation::{layout, DisplayUnit};

/// Convert a GeneratedBeat to a MusicXML percussion part
pub fn to_musicxml(beat: &GeneratedBeat) -> String {
    let mut xml = String::new();

    // XML declaration and doctype
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');

    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    xml.push_str("  <work>\n");
    xml.push_str(&format!(
        "    <work-title>Snare exercise ({})</work-title>\n",
        beat.difficulty
    ));
    xml.push_str("  </work>\n");

    // Part list
    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name>Snare Drum</part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    xml.push_str("  <part id=\"P1\">\n");

    for (i, measure) in beat.measures.iter().enumerate() {
        xml.push_str(&measure_to_xml(
            measure,
            i + 1,
            beat.beats_per_measure,
            i == 0,
        ));
    }

    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    xml
}

fn measure_to_xml(measure: &Measure, number: usize, beats: u32, include_attributes: bool) -> String {
    let mut xml = String::new();

    xml.push_str(&format!("    <measure number=\"{}\">\n", number));

    if include_attributes {
        xml.push_str("      <attributes>\n");
        // one division per tick
        xml.push_str("        <divisions>24</divisions>\n");
        xml.push_str("        <time>\n");
        xml.push_str(&format!("          <beats>{}</beats>\n", beats));
        xml.push_str("          <beat-type>4</beat-type>\n");
        xml.push_str("        </time>\n");
        xml.push_str("        <clef>\n");
        xml.push_str("          <sign>percussion</sign>\n");
        xml.push_str("        </clef>\n");
        xml.push_str("      </attributes>\n");
    }

    for unit in layout(measure) {
        xml.push_str(&unit_to_xml(&unit));
    }

    xml.push_str("    </measure>\n");
    xml
}

/// Per-note markup that depends on the note's place in its display unit
#[derive(Debug, Default, Clone, Copy)]
struct Marks {
    beam: Option<&'static str>,
    tuplet: Option<&'static str>,
}

fn unit_to_xml(unit: &DisplayUnit) -> String {
    match unit {
        DisplayUnit::Single { note, .. } => note_to_xml(note, Marks::default()),
        DisplayUnit::Beamed { notes, .. } => {
            let mut xml = note_to_xml(&notes[0], Marks { beam: Some("begin"), ..Marks::default() });
            xml.push_str(&note_to_xml(&notes[1], Marks { beam: Some("end"), ..Marks::default() }));
            xml
        }
        DisplayUnit::Triplet { notes, .. } => {
            let beamed =
                notes.iter().all(|n| !n.is_rest()) && notes[0].dur == Duration::EighthTriplet;
            let positions = [("begin", "start"), ("continue", ""), ("end", "stop")];
            notes
                .iter()
                .zip(positions)
                .map(|(note, (beam, tuplet))| {
                    let marks = Marks {
                        beam: beamed.then_some(beam),
                        tuplet: (!tuplet.is_empty()).then_some(tuplet),
                    };
                    note_to_xml(note, marks)
                })
                .collect()
        }
    }
}

fn note_to_xml(note: &Note, marks: Marks) -> String {
    let mut xml = String::new();

    if let Some(ornament) = note.stroke.and_then(|s| s.ornament) {
        xml.push_str(&grace_notes_to_xml(ornament));
    }

    xml.push_str("      <note>\n");

    match note.stroke {
        Some(_) => xml.push_str(&unpitched_to_xml()),
        None => xml.push_str("        <rest/>\n"),
    }

    // Duration (in divisions - 24 per quarter note)
    xml.push_str(&format!("        <duration>{}</duration>\n", note.dur.ticks()));
    xml.push_str(&format!("        <type>{}</type>\n", note.dur.musicxml_type()));

    if note.dur.is_dotted() {
        xml.push_str("        <dot/>\n");
    }

    if note.dur.is_triplet() {
        xml.push_str("        <time-modification>\n");
        xml.push_str("          <actual-notes>3</actual-notes>\n");
        xml.push_str("          <normal-notes>2</normal-notes>\n");
        xml.push_str("        </time-modification>\n");
    }

    if let Some(stroke) = note.stroke {
        xml.push_str("        <stem>up</stem>\n");
        if stroke.dynamic == Dynamic::Ghost {
            xml.push_str("        <notehead parentheses=\"yes\">normal</notehead>\n");
        }
    }

    if let Some(beam) = marks.beam {
        xml.push_str(&format!("        <beam number=\"1\">{}</beam>\n", beam));
    }

    let notations = notations_to_xml(note.stroke, marks.tuplet);
    if !notations.is_empty() {
        xml.push_str("        <notations>\n");
        xml.push_str(&notations);
        xml.push_str("        </notations>\n");
    }

    if let Some(stroke) = note.stroke {
        let hand = if stroke.is_dominant { "R" } else { "L" };
        xml.push_str("        <lyric number=\"1\">\n");
        xml.push_str(&format!("          <text>{}</text>\n", hand));
        xml.push_str("        </lyric>\n");
    }

    xml.push_str("      </note>\n");
    xml
}

fn notations_to_xml(stroke: Option<Stroke>, tuplet: Option<&str>) -> String {
    let mut xml = String::new();

    if let Some(kind) = tuplet {
        xml.push_str(&format!("          <tuplet type=\"{}\"/>\n", kind));
    }

    let articulation = match stroke.map(|s| s.dynamic) {
        Some(Dynamic::Accent) => Some("<accent/>"),
        Some(Dynamic::Rimshot) => Some("<strong-accent/>"),
        _ => None,
    };
    if let Some(articulation) = articulation {
        xml.push_str("          <articulations>\n");
        xml.push_str(&format!("            {}\n", articulation));
        xml.push_str("          </articulations>\n");
    }

    xml
}

/// Snare on the middle line of the percussion staff
fn unpitched_to_xml() -> String {
    let mut xml = String::new();
    xml.push_str("        <unpitched>\n");
    xml.push_str("          <display-step>B</display-step>\n");
    xml.push_str("          <display-octave>4</display-octave>\n");
    xml.push_str("        </unpitched>\n");
    xml
}

/// Flam: one slashed grace eighth. Drag: two grace sixteenths.
fn grace_notes_to_xml(ornament: Ornament) -> String {
    let (count, value, slash) = match ornament {
        Ornament::Flam => (1, "eighth", " slash=\"yes\""),
        Ornament::Drag => (2, "16th", ""),
    };

    let mut xml = String::new();
    for i in 0..count {
        xml.push_str("      <note>\n");
        xml.push_str(&format!("        <grace{}/>\n", slash));
        xml.push_str(&unpitched_to_xml());
        xml.push_str(&format!("        <type>{}</type>\n", value));
        xml.push_str("        <stem>up</stem>\n");
        if count > 1 {
            let beam = if i == 0 { "begin" } else { "end" };
            xml.push_str(&format!("        <beam number=\"1\">{}</beam>\n", beam));
        }
        xml.push_str("      </note>\n");
    }
    xml
}
