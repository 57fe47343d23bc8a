//! Benchmark harness for performance testing
//!
//! Generates synthetic episode texts of varying size and cast so the
//! benchmarks do not depend on scraped transcripts.

use tapegraph::EpisodeTexts;

/// Speaker labels cycled through by the generators
pub const CAST: [&str; 8] = [
    "ARCHIVIST", "MARTIN", "TIM", "SASHA", "MELANIE", "BASIRA", "DAISY", "GEORGIE",
];

/// Build one scene with `turns` speaking turns drawn from the first `cast` names.
///
/// Speakers take turns in cast order, so output is deterministic and every
/// name appears once `turns >= cast`.
pub fn make_scene(turns: usize, cast: usize) -> String {
    let cast = cast.clamp(1, CAST.len());
    let mut scene = String::new();
    for turn in 0..turns {
        let speaker = CAST[turn % cast];
        scene.push_str(speaker);
        scene.push('\n');
        if turn % 7 == 0 {
            scene.push_str("[Door creaks open]\n");
        }
        scene.push_str("I do not think that this is a coincidence at all.\n\n");
    }
    scene
}

/// Build a full raw episode text with preamble, `scenes` scenes and a trailer
pub fn make_episode(number: u32, scenes: usize, turns: usize, cast: usize) -> String {
    let mut text = format!(
        "MAG{:03} - Synthetic Episode\nSummary of the episode.\nContent warnings.\n",
        number
    );
    text.push_str("[CLICK]\n\n");
    for i in 0..scenes {
        if i > 0 {
            text.push_str("[CLICK]\n\n[CLICK]\n\n");
        }
        text.push_str(&make_scene(turns, cast));
    }
    text.push_str("[CLICK]\nEnd of recording.\n");
    text
}

/// Store with episodes `1..=episodes`
pub fn make_corpus(episodes: u32, scenes: usize, turns: usize, cast: usize) -> EpisodeTexts {
    (1..=episodes)
        .map(|n| (n, make_episode(n, scenes, turns, cast)))
        .collect()
}

/// Ascending cue positions spaced `step` lines apart
pub fn make_cue_list(len: usize, offset: usize, step: usize) -> Vec<usize> {
    (0..len).map(|i| offset + i * step).collect()
}
