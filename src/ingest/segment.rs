//! Transcript segmentation.
//!
//! A scraped episode text carries a title, a summary and content notes ahead
//! of the transcript, and sometimes a supplement after it. The transcript
//! proper is bracketed by tape-recorder click markers, so the region between
//! the first click and the last click (or the end of a supplement) is kept.

use tracing::debug;

use crate::config::NameTable;
use crate::ingest::lines::aliased_cue_name;

/// Markers that open (and close) recorded sections
pub const CLICK_MARKERS: [&str; 2] = ["[CLICK", "[TAPE CLICKS"];

/// Marker closing a supplementary segment
pub const SUPPLEMENT_END_MARKER: &str = "End supplement";

/// Byte range of the transcript inside the raw episode text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptBounds {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// A click marker determined `start`
    pub start_marker_found: bool,
    /// A click or supplement marker determined `end`
    pub end_marker_found: bool,
}

impl TranscriptBounds {
    /// False when no marker was found and the whole text was kept
    pub fn markers_found(&self) -> bool {
        self.start_marker_found || self.end_marker_found
    }
}

/// Normalized transcript of one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub bounds: TranscriptBounds,
}

impl Transcript {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Find the transcript region of a raw episode text.
///
/// The start is the earliest first occurrence of any click marker (0 when
/// none occurs). The end is the latest last occurrence of any click or
/// supplement marker lying after the start; when there is none the text runs
/// to its end. A text with no markers at all is returned whole.
pub fn locate_transcript(raw: &str) -> TranscriptBounds {
    let start = CLICK_MARKERS.iter().filter_map(|m| raw.find(m)).min();

    let start_offset = start.unwrap_or(0);
    let end = CLICK_MARKERS
        .iter()
        .chain(std::iter::once(&SUPPLEMENT_END_MARKER))
        .filter_map(|m| raw.rfind(m))
        .filter(|&pos| pos > start_offset)
        .max();

    TranscriptBounds {
        start: start_offset,
        end: end.unwrap_or(raw.len()),
        start_marker_found: start.is_some(),
        end_marker_found: end.is_some(),
    }
}

/// Replace every `NAME (ALIAS)` label line with `NAME`.
///
/// Other lines, including their count and order, are untouched.
pub fn strip_name_aliases(text: &str) -> String {
    text.split('\n')
        .map(|line| aliased_cue_name(line).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract and normalize the transcript of one raw episode text.
///
/// Steps, in order: locate the marker-bounded region, drop parenthetical
/// aliases from speaker labels, then apply the consolidation table.
pub fn segment(raw: &str, names: &NameTable) -> Transcript {
    let bounds = locate_transcript(raw);
    debug!(
        start = bounds.start,
        end = bounds.end,
        markers = bounds.markers_found(),
        "located transcript"
    );

    // Markers are ASCII, so both offsets sit on char boundaries
    let region = &raw[bounds.start..bounds.end];
    let text = names.apply(&strip_name_aliases(region));

    Transcript { text, bounds }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_strips_preamble_and_trailer() {
        let raw = "MAG001 - Angler Fish\nSummary here\n[CLICK]\n\nARCHIVIST\nHello.\n\n[CLICK]\nNotes";
        let bounds = locate_transcript(raw);
        assert!(bounds.markers_found());
        assert_eq!(&raw[bounds.start..bounds.start + 7], "[CLICK]");
        assert_eq!(&raw[bounds.end..], "[CLICK]\nNotes");
    }

    #[test]
    fn test_locate_without_markers_keeps_everything() {
        let raw = "no markers at all";
        let bounds = locate_transcript(raw);
        assert_eq!(bounds.start, 0);
        assert_eq!(bounds.end, raw.len());
        assert!(!bounds.markers_found());
    }

    #[test]
    fn test_locate_prefers_latest_end_marker() {
        let raw = "x[TAPE CLICKS ON]\nA\nEnd supplement\nB\n[CLICK]\nC";
        let bounds = locate_transcript(raw);
        assert_eq!(bounds.start, 1);
        assert_eq!(&raw[bounds.end..], "[CLICK]\nC");
    }

    #[test]
    fn test_locate_single_marker_runs_to_end() {
        let raw = "intro\n[CLICK]\nARCHIVIST\nHello";
        let bounds = locate_transcript(raw);
        assert!(bounds.start_marker_found);
        assert!(!bounds.end_marker_found);
        assert_eq!(bounds.end, raw.len());
    }

    #[test]
    fn test_strip_name_aliases_preserves_line_count() {
        let text = "ELIAS (JONAH)\nHello.\nMARTIN\nHi (there)";
        let stripped = strip_name_aliases(text);
        assert_eq!(stripped, "ELIAS\nHello.\nMARTIN\nHi (there)");
        assert_eq!(stripped.lines().count(), text.lines().count());
    }

    #[test]
    fn test_segment_applies_consolidation_after_alias_strip() {
        let names = NameTable::new().with_alias("MAGNUS", "ELIAS");
        let transcript = segment("MAGNUS (GERTRUDE)\nHello.", &names);
        assert_eq!(transcript.text, "ELIAS\nHello.");
    }
}
