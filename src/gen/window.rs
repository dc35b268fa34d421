//! Window Partitioner: slices an ordered week list into non-overlapping
//! `k`-tuples, dropping a trailing short chunk. Builder and analyzer both call
//! this so their cadence windows never drift apart (spec.md §9).


/// Splits a week list of `week_count` entries into index ranges of exactly
/// `k` consecutive positions, in declared order. The last range is dropped
/// if it would have fewer than `k` weeks. `k == 0` yields no windows.
pub fn window_indices(week_count: usize, k: usize) -> Vec<std::ops::Range<usize>> {
    if k == 0 {
        return Vec::new();
    }
    (0..week_count)
        .step_by(k)
        .filter(|&start| start + k <= week_count)
        .map(|start| start..start + k)
        .collect()
}
