//! Scene-level closeness between two characters.

/// Closeness contribution of one character pair in one scene.
///
/// For every cue index `i` in `list_1`, counts the cue indices of `list_2`
/// within `proximity_threshold` lines of `i` (inclusive), sums the counts and
/// adds `base_score`. The sum counts pairs `(i, j)` with `|i - j| <= t`, so the
/// result does not depend on argument order.
///
/// Both lists must be ascending. A window `[left, right)` over `list_2`
/// slides forward once, so the cost is `O(len_1 + len_2)`.
pub fn closeness(
    list_1: &[usize],
    list_2: &[usize],
    proximity_threshold: usize,
    base_score: f64,
) -> f64 {
    let mut left = 0;
    let mut right = 0;
    let mut in_window = 0usize;
    let mut interactions = 0usize;

    for &line in list_1 {
        // Admit before dropping so the running count never underflows
        while right < list_2.len() && list_2[right] <= line.saturating_add(proximity_threshold) {
            right += 1;
            in_window += 1;
        }
        while left < right && list_2[left].saturating_add(proximity_threshold) < line {
            left += 1;
            in_window -= 1;
        }
        interactions += in_window;
    }

    interactions as f64 + base_score
}
