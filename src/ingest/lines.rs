//! Line classification predicates.
//!
//! Transcripts follow a fixed formatting convention:
//! 1. the speaker label is an upper-case word on its own line (`ARCHIVIST`)
//! 2. stage directions are wrapped in one pair of square brackets
//!    (`[DOOR OPENS]`)
//! 3. anything else is dialogue spoken by the most recent speaker
//!
//! Each predicate is a pure function over a single line so it can be tested
//! on its own; [`classify_line`] combines them in precedence order.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Upper-case letters and `!` only; the empty line matches too
    static ref CUE_RE: Regex = Regex::new(r"^[A-Z!]*$").unwrap();

    /// One bracket pair around letters, digits, spaces and light punctuation
    static ref ACTION_RE: Regex =
        Regex::new(r#"^\[[A-Za-z0-9 _.,!?:;'"’\-]*\]$"#).unwrap();

    /// `NAME (ALIAS)` speaker label
    static ref ALIASED_CUE_RE: Regex = Regex::new(r"^([A-Z]*) \([A-Z]*\)$").unwrap();
}

/// What a single transcript line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Speaker label; the name is the trimmed line
    Cue(&'a str),
    /// Stage direction, ignored for attribution
    Action,
    /// Spoken text with its whitespace-delimited token count
    Dialogue { words: usize },
}

/// True if the trimmed line is a speaker label.
///
/// Labels with anything besides upper-case letters and `!` (digits, spaces,
/// lower case) are not cues; such lines fall through to dialogue. A blank
/// line is a cue with an empty name: it hands the floor to nobody.
pub fn is_character_cue(line: &str) -> bool {
    CUE_RE.is_match(line.trim())
}

/// True if the trimmed line is entirely one bracketed stage direction.
pub fn is_action_line(line: &str) -> bool {
    ACTION_RE.is_match(line.trim())
}

/// Whitespace-delimited token count
pub fn count_words(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Leading name of a `NAME (ALIAS)` label, if the line is exactly one.
///
/// Matched against the raw line: surrounding whitespace disqualifies it.
pub fn aliased_cue_name(line: &str) -> Option<&str> {
    ALIASED_CUE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Classify a line. Cues take precedence over actions, actions over dialogue.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if is_character_cue(line) {
        LineKind::Cue(line.trim())
    } else if is_action_line(line) {
        LineKind::Action
    } else {
        LineKind::Dialogue {
            words: count_words(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_accepts_upper_case_and_bang() {
        assert!(is_character_cue("ARCHIVIST"));
        assert!(is_character_cue("  MARTIN  "));
        assert!(is_character_cue("JONAH!"));
        assert!(is_character_cue("A"));
        assert!(is_character_cue("!!!"));
    }

    #[test]
    fn test_blank_line_is_empty_cue() {
        assert!(is_character_cue(""));
        assert!(is_character_cue("   "));
        assert_eq!(classify_line("  "), LineKind::Cue(""));
    }

    #[test]
    fn test_cue_rejects_partial_matches() {
        assert!(!is_character_cue("Archivist"));
        assert!(!is_character_cue("MR SMITH"));
        assert!(!is_character_cue("AGENT 47"));
        assert!(!is_character_cue("ELIAS (JONAH)"));
        assert!(!is_character_cue("[CLICK]"));
    }

    #[test]
    fn test_action_lines() {
        assert!(is_action_line("[CLICK]"));
        assert!(is_action_line("[TAPE CLICKS OFF.]"));
        assert!(is_action_line("[The door creaks, then slams!]"));
        assert!(is_action_line("[Sasha’s footsteps]"));
        assert!(is_action_line("  [Static]  "));
        assert!(is_action_line("[]"));
    }

    #[test]
    fn test_action_rejects_mixed_lines() {
        assert!(!is_action_line("[Sighs] Well, then."));
        assert!(!is_action_line("[Unclosed"));
        assert!(!is_action_line("[Nested [brackets]]"));
        assert!(!is_action_line("[Mug (chipped)]"));
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  hello   there  "), 2);
        assert_eq!(count_words("Statement of Nathan Watts, regarding"), 5);
    }

    #[test]
    fn test_aliased_cue_name() {
        assert_eq!(aliased_cue_name("ELIAS (JONAH)"), Some("ELIAS"));
        assert_eq!(aliased_cue_name("ELIAS (JONAH) "), None);
        assert_eq!(aliased_cue_name("Elias (Jonah)"), None);
        assert_eq!(aliased_cue_name("ELIAS"), None);
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify_line("MARTIN"), LineKind::Cue("MARTIN"));
        assert_eq!(classify_line("[CLICK]"), LineKind::Action);
        assert_eq!(
            classify_line("Tea, Jon?"),
            LineKind::Dialogue { words: 2 }
        );
        assert_eq!(classify_line(""), LineKind::Cue(""));
        assert_eq!(classify_line("[]"), LineKind::Action);
    }
}
