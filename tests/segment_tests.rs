//! Transcript segmentation tests
//!
//! Covers marker detection, alias stripping and name consolidation on
//! texts shaped like scraped episode pages.

use tapegraph::config::NameTable;
use tapegraph::ingest::{locate_transcript, segment, split_into_scenes, strip_name_aliases};

const EPISODE: &str = "\
MAG012 - Dig Deeper
Statement of Edwin Burroughs.
Content warnings: burial.
[CLICK]

ARCHIVIST
Statement of Edwin Burroughs, regarding a tunnel.

[CLICK]
Transcript ends here.
Support the show.";

#[test]
fn test_preamble_and_trailer_are_removed() {
    let transcript = segment(EPISODE, &NameTable::new());
    assert!(transcript.text.starts_with("[CLICK]\n\nARCHIVIST"));
    assert!(!transcript.text.contains("Content warnings"));
    assert!(!transcript.text.contains("Support the show"));
    assert!(transcript.bounds.start_marker_found);
    assert!(transcript.bounds.end_marker_found);
}

#[test]
fn test_no_markers_returns_whole_text_as_one_scene() {
    let raw = "ARCHIVIST\nNo clicks here at all.\nMARTIN\nOdd.";
    let transcript = segment(raw, &NameTable::new());

    assert_eq!(transcript.text, raw);
    assert_eq!(transcript.bounds.start, 0);
    assert_eq!(transcript.bounds.end, raw.len());
    assert!(!transcript.bounds.markers_found());

    let split = split_into_scenes(&transcript);
    assert_eq!(split.delimiters_found, 0);
    assert_eq!(split.scenes.len(), 1);
    assert_eq!(split.scenes[0].text(), raw);
}

#[test]
fn test_tape_clicks_markers() {
    let raw = "Title\n[TAPE CLICKS ON]\nMARTIN\nHello?\n[TAPE CLICKS OFF]\nNotes";
    let bounds = locate_transcript(raw);
    assert_eq!(&raw[bounds.start..], "[TAPE CLICKS ON]\nMARTIN\nHello?\n[TAPE CLICKS OFF]\nNotes");
    assert_eq!(&raw[bounds.end..], "[TAPE CLICKS OFF]\nNotes");
}

#[test]
fn test_supplement_end_extends_transcript() {
    let raw = "Intro\n[CLICK]\n\nARCHIVIST\nEnd recording.\n\n[CLICK]\n\nARCHIVIST\nSupplemental.\nEnd supplement.\nCredits";
    let transcript = segment(raw, &NameTable::new());
    assert!(transcript.text.contains("Supplemental."));
    assert!(transcript.text.ends_with("Supplemental.\n"));
    assert!(!transcript.text.contains("Credits"));
}

#[test]
fn test_single_marker_keeps_rest_of_text() {
    let raw = "Intro\n[CLICK]\nARCHIVIST\nOnly one click.";
    let transcript = segment(raw, &NameTable::new());
    assert_eq!(transcript.text, "[CLICK]\nARCHIVIST\nOnly one click.");
    assert!(transcript.bounds.start_marker_found);
    assert!(!transcript.bounds.end_marker_found);
}

#[test]
fn test_alias_stripping_preserves_line_structure() {
    let text = "ELIAS (JONAH)\nYou have done well.\nARCHIVIST\nHave I?\nELIAS (JONAH) said so";
    let stripped = strip_name_aliases(text);
    assert_eq!(
        stripped,
        "ELIAS\nYou have done well.\nARCHIVIST\nHave I?\nELIAS (JONAH) said so"
    );
    assert_eq!(stripped.lines().count(), text.lines().count());
}

#[test]
fn test_consolidation_renames_cue_lines_only() {
    let names: NameTable = vec![("JOHN", "ARCHIVIST")].into_iter().collect();
    let raw = "[CLICK]\n\nJOHN\nJOHN is my name.\nJOHNNY\nHi.\n\n[CLICK]";
    let transcript = segment(raw, &names);
    assert_eq!(
        transcript.text,
        "[CLICK]\n\nARCHIVIST\nJOHN is my name.\nJOHNNY\nHi.\n\n"
    );
}

#[test]
fn test_alias_stripping_runs_before_consolidation() {
    let names = NameTable::new().with_alias("MAGNUS", "ELIAS");
    let raw = "[CLICK]\n\nMAGNUS (JONAH)\nIndeed.\n\n[CLICK]";
    let transcript = segment(raw, &names);
    assert!(transcript.text.contains("\nELIAS\nIndeed."));
}
