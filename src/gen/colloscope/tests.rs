use super::*;
use crate::gen::alternation::{AlternationPolicy, Rule};
use crate::gen::analyzer;
use crate::gen::catalog::{Catalog, Slot, Week};
use crate::time::HourRange;
use std::collections::BTreeSet;

fn hour(start_h: u32, end_h: u32) -> HourRange {
    HourRange {
        start: crate::time::Time::from_hm(start_h, 0).unwrap(),
        end: crate::time::Time::from_hm(end_h, 0).unwrap(),
    }
}

fn groups(list: &[u32]) -> BTreeSet<u32> {
    list.iter().copied().collect()
}

// Two slots (Monday, Tuesday), one subject at frequency 1, one teacher, two
// groups, two weeks: exactly the capacity the model needs, so the strict
// tier should succeed and the analyzer should certify it clean (spec.md P10).
#[test]
fn strict_solve_is_certified_clean_by_the_analyzer() {
    let slots = vec![
        Slot {
            subject: "English".to_string(),
            teacher: "Prof".to_string(),
            day: "Lundi".to_string(),
            hour: hour(17, 18),
            even_groups: groups(&[1, 2]),
            odd_groups: groups(&[1, 2]),
            works_even: true,
            works_odd: true,
        },
        Slot {
            subject: "English".to_string(),
            teacher: "Prof".to_string(),
            day: "Mardi".to_string(),
            hour: hour(17, 18),
            even_groups: groups(&[1, 2]),
            odd_groups: groups(&[1, 2]),
            works_even: true,
            works_odd: true,
        },
    ];
    let weeks = vec![Week { number: 38 }, Week { number: 40 }];
    let catalog = Catalog::new(slots, weeks);

    let policy =
        AlternationPolicy::from_rules([("English".to_string(), Rule::new(true, 1).unwrap())])
            .unwrap();

    let (mode, assignment) = solve(&catalog, &policy).expect("a feasible strict plan exists");
    assert_eq!(mode, Mode::Strict);

    let report = analyzer::analyze(&assignment, &policy);
    assert_eq!(report.resume.total_erreurs, 0, "{:?}", report.contraintes);
    assert!(report.resume.globales_ok);
    assert!(report.resume.groupes_ok);
    assert!(report.resume.consecutives_ok);
    assert!(report.resume.compatibilites_profs_ok);
}

// Group 2 has no eligible slot in the catalog's only week (its one slot only
// works odd weeks, the week is even), so the weekly-load floor (C7) can never
// be met for group 2 in strict or relaxed mode; only maximize, which drops
// the floor, can produce a plan.
#[test]
fn exhausted_capacity_escalates_all_the_way_to_maximize() {
    let slots = vec![
        Slot {
            subject: "English".to_string(),
            teacher: "Prof".to_string(),
            day: "Lundi".to_string(),
            hour: hour(17, 18),
            even_groups: groups(&[1]),
            odd_groups: groups(&[1]),
            works_even: true,
            works_odd: true,
        },
        Slot {
            subject: "English".to_string(),
            teacher: "Prof".to_string(),
            day: "Mardi".to_string(),
            hour: hour(17, 18),
            even_groups: BTreeSet::new(),
            odd_groups: groups(&[2]),
            works_even: false,
            works_odd: true,
        },
    ];
    let weeks = vec![Week { number: 38 }]; // even week: group 2 has zero capacity
    let catalog = Catalog::new(slots, weeks);

    let policy =
        AlternationPolicy::from_rules([("English".to_string(), Rule::new(true, 1).unwrap())])
            .unwrap();

    assert!(solve_mode(&catalog, &policy, Mode::Strict).is_err());
    assert!(solve_mode(&catalog, &policy, Mode::Relaxed).is_err());

    let (mode, _assignment) = solve(&catalog, &policy).expect("maximize always has a solution");
    assert_eq!(mode, Mode::Maximize);
}

// spec.md S3: parity/eligibility preconditions gate which variables even
// exist, independent of solving.
#[test]
fn eligible_variables_respect_parity_and_eligibility_sets() {
    let slot = Slot {
        subject: "Physics".to_string(),
        teacher: "Martin".to_string(),
        day: "Lundi".to_string(),
        hour: hour(8, 9),
        even_groups: groups(&[1, 2, 3, 4]),
        odd_groups: groups(&[5, 6, 7, 8]),
        works_even: true,
        works_odd: false,
    };
    let weeks = vec![Week { number: 38 }, Week { number: 39 }]; // even, odd
    let catalog = Catalog::new(vec![slot], weeks);

    let vars = eligible_variables(&catalog);

    // Even week (index 0): only groups 1-4 may appear.
    assert!(vars.contains(&Variable { slot: 0, week: 0, group: 1 }));
    assert!(!vars.contains(&Variable { slot: 0, week: 0, group: 5 }));

    // Odd week (index 1): the teacher does not work odd weeks at all.
    for group in 1..=8 {
        assert!(!vars.contains(&Variable { slot: 0, week: 1, group }));
    }
}

// spec.md S4: two touching slots on the same day post a mutual-exclusion
// constraint (C8) for every group, independent of solving.
#[test]
fn consecutive_slots_post_a_mutual_exclusion_constraint() {
    let slots = vec![
        Slot {
            subject: "Mathematics".to_string(),
            teacher: "Dupont".to_string(),
            day: "Lundi".to_string(),
            hour: hour(17, 18),
            even_groups: groups(&[1]),
            odd_groups: groups(&[1]),
            works_even: true,
            works_odd: true,
        },
        Slot {
            subject: "Physics".to_string(),
            teacher: "Martin".to_string(),
            day: "Lundi".to_string(),
            hour: hour(18, 19),
            even_groups: groups(&[1]),
            odd_groups: groups(&[1]),
            works_even: true,
            works_odd: true,
        },
    ];
    let weeks = vec![Week { number: 38 }];
    let catalog = Catalog::new(slots, weeks);
    let policy = AlternationPolicy::from_rules([]).unwrap();

    let builder = ModelBuilder::new(&catalog, &policy);
    let problem = builder.build(Mode::Strict);

    let v0 = Variable { slot: 0, week: 0, group: 1 }.name();
    let v1 = Variable { slot: 1, week: 0, group: 1 }.name();

    let has_mutex = problem.get_constraints().iter().any(|c| {
        c.variables() == std::collections::BTreeSet::from([v0.clone(), v1.clone()])
            && c.get_var(&v0) == Some(1)
            && c.get_var(&v1) == Some(1)
            && c.get_constant() == -1
            && c.get_sign() == crate::ilp::linexpr::Sign::LessThan
    });
    assert!(has_mutex, "expected a <= 1 constraint over both touching slots");
}
