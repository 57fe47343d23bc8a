//! Scene splitting on tape-recorder clicks.
//!
//! A scene boundary is one of:
//! - `[CLICK]`, blank line, `[CLICK]`
//! - `[TAPE CLICKS OFF]`, blank line, `[TAPE CLICKS ON]`
//! - `[TAPE CLICKS OFF.]` (any single character before the bracket), blank
//!   line, then one interstitial line such as a cold-open note
//!
//! The alternation must match scraped transcripts byte for byte; keep it in
//! sync with the scraper's output rather than tidying it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ingest::segment::Transcript;

lazy_static! {
    static ref SCENE_DELIMITER_RE: Regex = Regex::new(concat!(
        r#"\[TAPE CLICKS OFF.\]\n\n[^\n][A-Za-z0-9 _.,!"'’\]]*"#,
        r"|\[CLICK\]\n\n\[CLICK\]",
        r"|\[TAPE CLICKS OFF\]\n\n\[TAPE CLICKS ON\]",
    ))
    .unwrap();
}

/// One scene: the lines between two click delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Position in the episode, from 0
    pub index: usize,
    pub lines: Vec<String>,
}

impl Scene {
    pub fn new(index: usize, text: &str) -> Self {
        Scene {
            index,
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Borrowed view of the lines, as the extractor consumes them
    pub fn line_refs(&self) -> Vec<&str> {
        self.lines.iter().map(String::as_str).collect()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Result of splitting one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSplit {
    pub scenes: Vec<Scene>,
    /// How many delimiters matched; 0 means the transcript is one scene
    pub delimiters_found: usize,
}

/// Split a transcript into scenes in order of appearance.
///
/// Adjacent delimiters produce empty scenes, which simply contribute nothing
/// downstream. A transcript with no delimiter yields exactly one scene equal
/// to the whole transcript.
pub fn split_into_scenes(transcript: &Transcript) -> SceneSplit {
    split_text(&transcript.text)
}

/// [`split_into_scenes`] over bare text
pub fn split_text(text: &str) -> SceneSplit {
    let delimiters_found = SCENE_DELIMITER_RE.find_iter(text).count();
    let scenes = SCENE_DELIMITER_RE
        .split(text)
        .enumerate()
        .map(|(index, chunk)| Scene::new(index, chunk))
        .collect();

    SceneSplit {
        scenes,
        delimiters_found,
    }
}
