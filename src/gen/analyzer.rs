//! Symmetric Analyzer: independently recomputes every constraint check the
//! Constraint Model Builder enforces, plus consecutive-colle detection,
//! parity/eligibility compatibility, and descriptive statistics (spec.md
//! §4.7). Never aborts: malformed cells become `InvalidAssignment` entries in
//! the report rather than an error return.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::gen::alternation::AlternationPolicy;
use crate::gen::catalog::{Catalog, Cell, Parity};
use crate::gen::window;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub resume: Resume,
    pub stats: Stats,
    pub contraintes: Contraintes,
    /// Cells that are neither empty nor a positive integer. Counted as empty
    /// for every numeric check above but surfaced separately here.
    pub invalid_assignments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Resume {
    pub total_erreurs: usize,
    pub globales_ok: bool,
    pub groupes_ok: bool,
    pub consecutives_ok: bool,
    pub compatibilites_profs_ok: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stats {
    pub groupes: BTreeMap<u32, BTreeMap<String, usize>>,
    pub matieres: BTreeMap<String, usize>,
    pub profs: BTreeMap<String, usize>,
    pub charge_hebdo: BTreeMap<u32, Vec<usize>>,
    pub globales: Globales,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Globales {
    pub total_assigned: usize,
    pub total_authorized: usize,
    pub utilization: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Contraintes {
    pub globales: Vec<String>,
    pub groupes: BTreeMap<u32, Vec<String>>,
    pub consecutives: Vec<String>,
    pub compatibilites_profs: Vec<String>,
}

/// A single (slot, week) assignment resolved to a valid group, with enough
/// context to report a violation.
#[derive(Debug, Clone, Copy)]
struct Assigned {
    slot: usize,
    week: usize,
    group: u32,
}

fn collect_assigned(catalog: &Catalog) -> (Vec<Assigned>, Vec<String>) {
    let mut assigned = Vec::new();
    let mut invalid = Vec::new();

    for (slot_idx, slot) in catalog.slots.iter().enumerate() {
        for (week_idx, week) in catalog.weeks.iter().enumerate() {
            match catalog.cell(slot_idx, week_idx) {
                Cell::Empty => {}
                Cell::Group(g) => assigned.push(Assigned {
                    slot: slot_idx,
                    week: week_idx,
                    group: *g,
                }),
                Cell::Invalid(raw) => invalid.push(format!(
                    "{} {} semaine {}: valeur invalide '{}'",
                    slot.subject, slot.day, week.number, raw
                )),
            }
        }
    }

    (assigned, invalid)
}

fn check_globales(catalog: &Catalog, assigned: &[Assigned]) -> Vec<String> {
    let mut violations = Vec::new();

    for week_idx in 0..catalog.weeks.len() {
        // Teachers with >=2 groups on the same (day, hour) in this week.
        let mut by_teacher_time: BTreeMap<(&str, &str, crate::time::HourRange), Vec<u32>> =
            BTreeMap::new();
        // Groups with >=2 colles on the same (day, hour) in this week.
        let mut by_group_time: BTreeMap<(u32, &str, crate::time::HourRange), Vec<&str>> =
            BTreeMap::new();

        for a in assigned.iter().filter(|a| a.week == week_idx) {
            let slot = &catalog.slots[a.slot];
            by_teacher_time
                .entry((slot.teacher.as_str(), slot.day.as_str(), slot.hour))
                .or_default()
                .push(a.group);
            by_group_time
                .entry((a.group, slot.day.as_str(), slot.hour))
                .or_default()
                .push(slot.teacher.as_str());
        }

        for ((teacher, _day, _hour), groups) in by_teacher_time {
            if groups.len() >= 2 {
                violations.push(format!("PROF {} → groupes {:?}", teacher, groups));
            }
        }
        for ((group, _day, _hour), teachers) in by_group_time {
            if teachers.len() >= 2 {
                violations.push(format!("GROUPE {} → profs {:?}", group, teachers));
            }
        }
    }

    violations
}

fn check_groupes(
    catalog: &Catalog,
    policy: &AlternationPolicy,
    assigned: &[Assigned],
) -> BTreeMap<u32, Vec<String>> {
    let mut report: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    for group in catalog.groups() {
        let mut violations = Vec::new();

        for (subject, rule) in policy.active_rules() {
            let windows = window::window_indices(catalog.weeks.len(), rule.frequency as usize);

            if windows.is_empty() {
                // No full window exists over the declared period; fall back
                // to a single "no more than one" check over the whole range.
                let count = assigned
                    .iter()
                    .filter(|a| a.group == group && catalog.slots[a.slot].subject == subject)
                    .count();
                if count > 1 {
                    violations.push(format!(
                        "{} groupe {}: {} colles sur la période (attendu au plus 1)",
                        subject, group, count
                    ));
                }
                continue;
            }

            for w in windows {
                let count = assigned
                    .iter()
                    .filter(|a| {
                        a.group == group
                            && w.contains(&a.week)
                            && catalog.slots[a.slot].subject == subject
                    })
                    .count();
                if count != 1 {
                    let weeks: Vec<u32> = w.clone().map(|idx| catalog.weeks[idx].number).collect();
                    violations.push(format!(
                        "{} groupe {} semaines {:?}: {} colles (attendu 1)",
                        subject, group, weeks, count
                    ));
                }
            }
        }

        // C6 symmetry: at most one colle per group per day, regardless of
        // subject or hour (spec.md §4.4 C6; examples/original_source's
        // "Pas plus d'1 colle par jour" check).
        for week_idx in 0..catalog.weeks.len() {
            let mut by_day: BTreeMap<&str, usize> = BTreeMap::new();
            for a in assigned
                .iter()
                .filter(|a| a.group == group && a.week == week_idx)
            {
                *by_day.entry(catalog.slots[a.slot].day.as_str()).or_insert(0) += 1;
            }
            for (day, count) in by_day {
                if count > 1 {
                    violations.push(format!(
                        "groupe {} semaine {} jour {}: {} colles (max 1 autorisée)",
                        group, catalog.weeks[week_idx].number, day, count
                    ));
                }
            }
        }

        if !violations.is_empty() {
            report.insert(group, violations);
        }
    }

    report
}

fn check_consecutives(catalog: &Catalog, assigned: &[Assigned]) -> Vec<String> {
    let mut violations = Vec::new();

    for group in catalog.groups() {
        for week_idx in 0..catalog.weeks.len() {
            let mut by_day: BTreeMap<&str, Vec<&Assigned>> = BTreeMap::new();
            for a in assigned
                .iter()
                .filter(|a| a.group == group && a.week == week_idx)
            {
                by_day.entry(catalog.slots[a.slot].day.as_str()).or_default().push(a);
            }

            for (day, mut day_assigned) in by_day {
                day_assigned.sort_by_key(|a| catalog.slots[a.slot].hour.start);
                for pair in day_assigned.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    let start_a = catalog.slots[a.slot].hour.start.get() / 60;
                    let start_b = catalog.slots[b.slot].hour.start.get() / 60;
                    if start_b.saturating_sub(start_a) == 1 {
                        violations.push(format!(
                            "groupe {} jour {} semaine {}: colles consécutives ({} puis {})",
                            group,
                            day,
                            catalog.weeks[week_idx].number,
                            catalog.slots[a.slot].subject,
                            catalog.slots[b.slot].subject
                        ));
                    }
                }
            }
        }
    }

    violations
}

fn check_compatibilites_profs(catalog: &Catalog, assigned: &[Assigned]) -> Vec<String> {
    let mut violations = Vec::new();

    for a in assigned {
        let slot = &catalog.slots[a.slot];
        let week = &catalog.weeks[a.week];
        match week.parity() {
            Parity::Even if !slot.works_even => violations.push(format!(
                "{} {} semaine {} (paire): le prof ne travaille pas les semaines paires",
                slot.subject, slot.teacher, week.number
            )),
            Parity::Odd if !slot.works_odd => violations.push(format!(
                "{} {} semaine {} (impaire): le prof ne travaille pas les semaines impaires",
                slot.subject, slot.teacher, week.number
            )),
            _ => {}
        }

        if let Some(eligible) = slot.eligible_groups(week.parity()) {
            if !eligible.contains(&a.group) {
                violations.push(format!(
                    "{} {} semaine {}: groupe {} hors éligibilité {:?}",
                    slot.subject, slot.teacher, week.number, a.group, eligible
                ));
            }
        }
    }

    violations
}

fn build_stats(catalog: &Catalog, assigned: &[Assigned]) -> Stats {
    let mut groupes: BTreeMap<u32, BTreeMap<String, usize>> = BTreeMap::new();
    let mut matieres: BTreeMap<String, usize> = BTreeMap::new();
    let mut profs: BTreeMap<String, usize> = BTreeMap::new();
    let mut charge_hebdo: BTreeMap<u32, Vec<usize>> = catalog
        .groups()
        .into_iter()
        .map(|g| (g, vec![0; catalog.weeks.len()]))
        .collect();

    for a in assigned {
        let slot = &catalog.slots[a.slot];
        *groupes
            .entry(a.group)
            .or_default()
            .entry(slot.subject.clone())
            .or_insert(0) += 1;
        *matieres.entry(slot.subject.clone()).or_insert(0) += 1;
        *profs.entry(slot.teacher.clone()).or_insert(0) += 1;
        if let Some(load) = charge_hebdo.get_mut(&a.group) {
            load[a.week] += 1;
        }
    }

    let total_assigned = assigned.len();
    let total_authorized: usize = catalog
        .slots
        .iter()
        .map(|slot| {
            catalog
                .weeks
                .iter()
                .filter(|week| slot.eligible_groups(week.parity()).is_some())
                .count()
        })
        .sum();
    let utilization = if total_authorized == 0 {
        0.0
    } else {
        total_assigned as f64 / total_authorized as f64
    };

    Stats {
        groupes,
        matieres,
        profs,
        charge_hebdo,
        globales: Globales {
            total_assigned,
            total_authorized,
            utilization,
        },
    }
}

/// Runs every check against `catalog`'s current cell grid, which may come
/// from a fresh solve, a hand-edited file, or an extended assignment.
pub fn analyze(catalog: &Catalog, policy: &AlternationPolicy) -> Report {
    let (assigned, invalid_assignments) = collect_assigned(catalog);

    let globales = check_globales(catalog, &assigned);
    let groupes = check_groupes(catalog, policy, &assigned);
    let consecutives = check_consecutives(catalog, &assigned);
    let compatibilites_profs = check_compatibilites_profs(catalog, &assigned);

    let total_erreurs = globales.len()
        + groupes.values().map(Vec::len).sum::<usize>()
        + consecutives.len()
        + compatibilites_profs.len()
        + invalid_assignments.len();

    let resume = Resume {
        total_erreurs,
        globales_ok: globales.is_empty(),
        groupes_ok: groupes.is_empty(),
        consecutives_ok: consecutives.is_empty(),
        compatibilites_profs_ok: compatibilites_profs.is_empty(),
    };

    let stats = build_stats(catalog, &assigned);

    Report {
        resume,
        stats,
        contraintes: Contraintes {
            globales,
            groupes,
            consecutives,
            compatibilites_profs,
        },
        invalid_assignments,
    }
}
