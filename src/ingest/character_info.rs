//! Per-scene character extraction.
//!
//! Walks a scene once, attributing dialogue word counts to the most recent
//! speaker cue and recording the line index of every cue. A speaker who
//! returns later in the same scene has the new span merged into their entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ingest::lines::{classify_line, LineKind};

/// What one character did in one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfo {
    /// Dialogue tokens attributed to the character
    pub word_count: usize,
    /// Line indices of the character's cues, ascending, no duplicates
    pub appearances: Vec<usize>,
}

/// Character name -> info, for one scene
pub type SceneCharacters = BTreeMap<String, CharacterInfo>;

/// Speaker currently holding the floor and what they have said so far.
struct OpenSpan<'a> {
    name: &'a str,
    word_count: usize,
    appearances: Vec<usize>,
}

impl<'a> OpenSpan<'a> {
    fn new(name: &'a str, line_index: usize) -> Self {
        OpenSpan {
            name,
            word_count: 0,
            appearances: vec![line_index],
        }
    }

    /// Merge this span into the scene map
    fn flush_into(self, characters: &mut SceneCharacters) {
        let entry = characters.entry(self.name.to_string()).or_default();
        entry.word_count += self.word_count;
        entry.appearances.extend(self.appearances);
    }
}

/// Extract per-character word counts and cue positions from a scene.
///
/// Dialogue before the first cue belongs to nobody and is dropped, as is
/// dialogue after a blank line until the next named cue. Stage directions
/// are skipped entirely. A cue repeating the current speaker adds
/// an appearance without closing the span.
pub fn extract(lines: &[&str]) -> SceneCharacters {
    let mut characters = SceneCharacters::new();
    let mut current: Option<OpenSpan<'_>> = None;

    for (index, &line) in lines.iter().enumerate() {
        match classify_line(line) {
            LineKind::Cue("") => {
                if let Some(span) = current.take() {
                    span.flush_into(&mut characters);
                }
            }
            LineKind::Cue(name) => {
                if let Some(span) = current.as_mut().filter(|span| span.name == name) {
                    span.appearances.push(index);
                    continue;
                }
                if let Some(span) = current.take() {
                    span.flush_into(&mut characters);
                }
                trace!(line = index, speaker = name, "speaker change");
                current = Some(OpenSpan::new(name, index));
            }
            LineKind::Action => {}
            LineKind::Dialogue { words } => {
                if let Some(span) = current.as_mut() {
                    span.word_count += words;
                }
            }
        }
    }

    if let Some(span) = current {
        span.flush_into(&mut characters);
    }

    characters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(word_count: usize, appearances: &[usize]) -> CharacterInfo {
        CharacterInfo {
            word_count,
            appearances: appearances.to_vec(),
        }
    }

    #[test]
    fn test_single_speaker_two_lines() {
        let chars = extract(&["A", "one two three", "four five six seven"]);
        assert_eq!(chars.len(), 1);
        assert_eq!(chars["A"], info(7, &[0]));
    }

    #[test]
    fn test_two_speakers() {
        let chars = extract(&["A", "hello there", "B", "hi"]);
        assert_eq!(chars["A"], info(2, &[0]));
        assert_eq!(chars["B"], info(1, &[2]));
    }

    #[test]
    fn test_returning_speaker_is_merged() {
        let chars = extract(&["A", "one", "B", "two words", "A", "three more words"]);
        assert_eq!(chars["A"], info(4, &[0, 4]));
        assert_eq!(chars["B"], info(2, &[2]));
    }

    #[test]
    fn test_repeated_cue_extends_span() {
        let chars = extract(&["A", "one", "A", "two"]);
        assert_eq!(chars["A"], info(2, &[0, 2]));
    }

    #[test]
    fn test_actions_and_orphan_dialogue_ignored() {
        let chars = extract(&["Nobody said this", "[CLICK]", "A", "[Sighs]", "fine"]);
        assert_eq!(chars.len(), 1);
        assert_eq!(chars["A"], info(1, &[2]));
    }

    #[test]
    fn test_empty_scene() {
        assert!(extract(&[]).is_empty());
        assert!(extract(&["", "just narration", "[Static]"]).is_empty());
    }

    #[test]
    fn test_blank_line_closes_span() {
        let chars = extract(&["ARCHIVIST", "one two", "", "three four five"]);
        assert_eq!(chars.len(), 1);
        assert_eq!(chars["ARCHIVIST"], info(2, &[0]));
    }

    #[test]
    fn test_bang_only_cue_is_a_speaker() {
        let chars = extract(&["A", "hi", "!!!", "yo there"]);
        assert_eq!(chars["A"], info(1, &[0]));
        assert_eq!(chars["!!!"], info(2, &[2]));
    }

    #[test]
    fn test_malformed_cue_counts_as_dialogue() {
        let chars = extract(&["A", "MR SMITH", "hello"]);
        assert_eq!(chars["A"], info(3, &[0]));
        assert!(!chars.contains_key("MR SMITH"));
    }
}
