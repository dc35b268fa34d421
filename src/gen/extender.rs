//! Rotational Extender: given an 8-week assignment and its source catalog,
//! synthesizes weeks 9..24 by rotating group labels within detected "group
//! families" (spec.md §4.8). The rotation arithmetic follows the original
//! Python tool's `extend_to_24_weeks`/`detect_group_families` verbatim.


use std::collections::BTreeSet;

use crate::gen::catalog::{Catalog, Week};

/// Every observed eligibility set (`EvenEligibleGroups`/`OddEligibleGroups`)
/// with strict supersets of another discarded, deduplicated. Falls back to a
/// single family spanning every group if no eligibility set was observed.
pub fn detect_families(catalog: &Catalog) -> Vec<Vec<u32>> {
    let mut candidates: BTreeSet<BTreeSet<u32>> = BTreeSet::new();
    for slot in &catalog.slots {
        if !slot.even_groups.is_empty() {
            candidates.insert(slot.even_groups.clone());
        }
        if !slot.odd_groups.is_empty() {
            candidates.insert(slot.odd_groups.clone());
        }
    }

    let candidate_list: Vec<BTreeSet<u32>> = candidates.into_iter().collect();
    let mut families: Vec<BTreeSet<u32>> = candidate_list
        .iter()
        .filter(|candidate| {
            !candidate_list
                .iter()
                .any(|other| other != *candidate && other.len() < candidate.len() && other.is_subset(candidate))
        })
        .cloned()
        .collect();

    if families.is_empty() {
        let all: BTreeSet<u32> = catalog.groups().into_iter().collect();
        if !all.is_empty() {
            families.push(all);
        }
    }

    families.sort_by_key(|family| family.iter().next().copied().unwrap_or(0));
    families.into_iter().map(|f| f.into_iter().collect()).collect()
}

/// Rotates `group` by `shift` positions within whichever family contains it;
/// groups outside every family pass through unchanged.
fn rotate_group(group: u32, families: &[Vec<u32>], shift: usize) -> u32 {
    for family in families {
        if let Some(pos) = family.iter().position(|&g| g == group) {
            return family[(pos + shift) % family.len()];
        }
    }
    group
}

/// Produces weeks 9..24: the base assignment (first 8 weeks, or fewer)
/// copied unchanged, followed by its shift-1 and shift-2 rotations.
pub fn extend(assignment: &Catalog, original_catalog: &Catalog) -> Catalog {
    let families = detect_families(original_catalog);

    let base_week_count = assignment.weeks.len().min(8);
    let max_week = assignment.weeks.iter().map(|w| w.number).max().unwrap_or(0);

    let mut weeks = assignment.weeks.clone();
    for shift in 1..=2u32 {
        for idx in 0..base_week_count as u32 {
            weeks.push(Week {
                number: max_week + (shift - 1) * 8 + (idx + 1),
            });
        }
    }

    let mut extended = Catalog::new(assignment.slots.clone(), weeks);

    for slot_idx in 0..assignment.slots.len() {
        for week_idx in 0..assignment.weeks.len() {
            extended.set_cell(slot_idx, week_idx, assignment.cell(slot_idx, week_idx).group());
        }
    }

    for shift in 1..=2usize {
        for idx in 0..base_week_count {
            let target_week = assignment.weeks.len() + (shift - 1) * base_week_count + idx;
            for slot_idx in 0..assignment.slots.len() {
                if let Some(group) = assignment.cell(slot_idx, idx).group() {
                    extended.set_cell(slot_idx, target_week, Some(rotate_group(group, &families, shift)));
                }
            }
        }
    }

    extended
}
