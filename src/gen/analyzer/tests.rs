use super::*;
use crate::gen::catalog::{Catalog, Slot};
use crate::time::HourRange;
use std::collections::BTreeSet;

fn hour(start_h: u32, end_h: u32) -> HourRange {
    HourRange {
        start: crate::time::Time::from_hm(start_h, 0).unwrap(),
        end: crate::time::Time::from_hm(end_h, 0).unwrap(),
    }
}

fn slot(subject: &str, teacher: &str, day: &str, hour: HourRange, groups: &[u32]) -> Slot {
    Slot {
        subject: subject.to_string(),
        teacher: teacher.to_string(),
        day: day.to_string(),
        hour,
        even_groups: groups.iter().copied().collect::<BTreeSet<_>>(),
        odd_groups: groups.iter().copied().collect::<BTreeSet<_>>(),
        works_even: true,
        works_odd: true,
    }
}

fn catalog_with_two_slots_same_time() -> Catalog {
    let slots = vec![
        slot("Mathematics", "Dupont", "Lundi", hour(17, 18), &[1, 2]),
        slot("Mathematics", "Dupont", "Mardi", hour(17, 18), &[1, 2]),
    ];
    let weeks = vec![
        crate::gen::catalog::Week { number: 38 },
        crate::gen::catalog::Week { number: 39 },
    ];
    Catalog::new(slots, weeks)
}

#[test]
fn clean_strict_assignment_reports_zero_violations() {
    let mut catalog = catalog_with_two_slots_same_time();
    // Exactly one Maths colle per group over the single fortnight window {38,39}.
    catalog.set_cell(0, 0, Some(1));
    catalog.set_cell(1, 0, Some(2));

    let policy = AlternationPolicy::from_rules([(
        "Mathematics".to_string(),
        crate::gen::alternation::Rule { active: true, frequency: 2 },
    )])
    .unwrap();

    let report = analyze(&catalog, &policy);
    assert!(report.resume.globales_ok);
    assert!(report.resume.groupes_ok, "{:?}", report.contraintes.groupes);
    assert!(report.resume.consecutives_ok);
    assert!(report.resume.compatibilites_profs_ok);
    assert_eq!(report.resume.total_erreurs, 0);
}

#[test]
fn same_teacher_double_booked_is_a_global_violation() {
    let slots = vec![
        slot("Mathematics", "Dupont", "Lundi", hour(17, 18), &[1, 2]),
        slot("Physics", "Dupont", "Lundi", hour(17, 18), &[1, 2]),
    ];
    let weeks = vec![crate::gen::catalog::Week { number: 38 }];
    let mut catalog = Catalog::new(slots, weeks);
    catalog.set_cell(0, 0, Some(1));
    catalog.set_cell(1, 0, Some(1));

    let report = analyze(&catalog, &AlternationPolicy::default());
    assert!(!report.resume.globales_ok);
    assert!(report
        .contraintes
        .globales
        .iter()
        .any(|v| v.contains("PROF Dupont")));
}

#[test]
fn consecutive_colles_same_day_are_flagged() {
    let slots = vec![
        slot("Mathematics", "Dupont", "Lundi", hour(17, 18), &[1]),
        slot("Physics", "Martin", "Lundi", hour(18, 19), &[1]),
    ];
    let weeks = vec![crate::gen::catalog::Week { number: 38 }];
    let mut catalog = Catalog::new(slots, weeks);
    catalog.set_cell(0, 0, Some(1));
    catalog.set_cell(1, 0, Some(1));

    let report = analyze(&catalog, &AlternationPolicy::default());
    assert!(!report.resume.consecutives_ok);
    assert_eq!(report.contraintes.consecutives.len(), 1);
}

#[test]
fn two_non_adjacent_colles_same_day_violate_c6_symmetry() {
    // 8h-9h and 17h-18h on the same day: not adjacent (so check_consecutives
    // stays quiet) and not the same (day, hour) pair (so check_globales stays
    // quiet either), yet both on the same day for the same group violates C6.
    let slots = vec![
        slot("Mathematics", "Dupont", "Lundi", hour(8, 9), &[1]),
        slot("Physics", "Martin", "Lundi", hour(17, 18), &[1]),
    ];
    let weeks = vec![crate::gen::catalog::Week { number: 38 }];
    let mut catalog = Catalog::new(slots, weeks);
    catalog.set_cell(0, 0, Some(1));
    catalog.set_cell(1, 0, Some(1));

    let report = analyze(&catalog, &AlternationPolicy::default());
    assert!(report.resume.globales_ok);
    assert!(report.resume.consecutives_ok);
    assert!(!report.resume.groupes_ok, "{:?}", report.contraintes.groupes);
    assert!(report.contraintes.groupes[&1]
        .iter()
        .any(|v| v.contains("max 1 autorisée")));
}

#[test]
fn parity_mismatch_is_flagged() {
    let mut odd_only = slot("Mathematics", "Dupont", "Lundi", hour(17, 18), &[1]);
    odd_only.works_even = false;
    let weeks = vec![crate::gen::catalog::Week { number: 38 }]; // even week
    let mut catalog = Catalog::new(vec![odd_only], weeks);
    catalog.set_cell(0, 0, Some(1));

    let report = analyze(&catalog, &AlternationPolicy::default());
    assert!(!report.resume.compatibilites_profs_ok);
    assert_eq!(report.contraintes.compatibilites_profs.len(), 1);
}

#[test]
fn invalid_cell_is_reported_but_does_not_panic() {
    let csv_text = "Matière;Prof;Jour;Heure;Groupes possibles semaine paire;Groupes possibles semaine impaire;Travaille les semaines paires;Travaille les semaines impaires;38\n\
                    Mathematics;Dupont;Lundi;17h-18h;1;1;Oui;Oui;abc\n";
    let catalog = Catalog::from_reader(csv_text.as_bytes()).unwrap();

    let report = analyze(&catalog, &AlternationPolicy::default());
    assert_eq!(report.invalid_assignments.len(), 1);
    assert!(report.invalid_assignments[0].contains("abc"));
    assert_eq!(report.resume.total_erreurs, 1);
}
