//! Transcript ingestion: from raw episode text to per-scene character info.
//!
//! Data flows strictly forward:
//! raw text -> [`segment`] -> [`split_into_scenes`] -> [`extract`] per scene.

pub mod character_info;
pub mod lines;
pub mod scenes;
pub mod segment;

pub use character_info::{extract, CharacterInfo, SceneCharacters};
pub use lines::{classify_line, count_words, is_action_line, is_character_cue, LineKind};
pub use scenes::{split_into_scenes, split_text, Scene, SceneSplit};
pub use segment::{locate_transcript, segment, strip_name_aliases, Transcript, TranscriptBounds};
