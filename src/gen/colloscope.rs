//! Constraint Model Builder, three-tier Solver Driver, and Assignment
//! Materializer (spec.md §4.4-§4.6).
//!
//! The builder materializes one boolean decision variable per (slot, week,
//! group) triple whose parity and eligibility preconditions hold, posts the
//! constraints C1-C8 for a chosen [`Mode`], and the driver escalates
//! strict -> relaxed -> maximize until CBC reports a usable solution.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::gen::alternation::AlternationPolicy;
use crate::gen::catalog::Catalog;
use crate::gen::window;
use crate::ilp::linexpr::Expr;
use crate::ilp::{solvers::coin_cbc, ProblemBuilder};

/// CBC's per-attempt wall-clock budget (spec.md §4.5).
pub const SOLVE_TIME_LIMIT_SECS: u32 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no feasible solution in any of the strict, relaxed or maximize tiers")]
    NoSolution,
    #[error(transparent)]
    Ilp(#[from] crate::ilp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The three escalation tiers of the solver driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Relaxed,
    Maximize,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Mode::Strict => "strict",
                Mode::Relaxed => "relaxed",
                Mode::Maximize => "maximize",
            }
        )
    }
}

/// A boolean decision variable: "group `group` is assigned to slot `slot` in
/// week `week`". Exists only when week parity matches slot parity, the
/// teacher works that parity, and `group` belongs to the matching
/// eligibility set (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Variable {
    pub slot: usize,
    pub week: usize,
    pub group: u32,
}

impl Variable {
    fn name(&self) -> String {
        format!("x_{}_{}_{}", self.slot, self.week, self.group)
    }
}

/// Every variable whose parity/eligibility precondition holds for `catalog`.
/// Shared by the builder (to create variables) and the materializer (to read
/// them back), so the two can never disagree about what "exists" means.
pub fn eligible_variables(catalog: &Catalog) -> BTreeSet<Variable> {
    let mut vars = BTreeSet::new();
    for (slot_idx, slot) in catalog.slots.iter().enumerate() {
        for (week_idx, week) in catalog.weeks.iter().enumerate() {
            if let Some(groups) = slot.eligible_groups(week.parity()) {
                for &group in groups {
                    vars.insert(Variable {
                        slot: slot_idx,
                        week: week_idx,
                        group,
                    });
                }
            }
        }
    }
    vars
}

/// Builds the ILP model for one solving tier.
pub struct ModelBuilder<'a> {
    catalog: &'a Catalog,
    policy: &'a AlternationPolicy,
    variables: BTreeSet<Variable>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(catalog: &'a Catalog, policy: &'a AlternationPolicy) -> Self {
        ModelBuilder {
            catalog,
            policy,
            variables: eligible_variables(catalog),
        }
    }

    pub fn variables(&self) -> &BTreeSet<Variable> {
        &self.variables
    }

    /// Variables for a given (slot, week), regardless of group.
    fn vars_for_slot_week(&self, slot: usize, week: usize) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|v| v.slot == slot && v.week == week)
            .collect()
    }

    fn sum(vars: impl IntoIterator<Item = Variable>) -> Expr {
        Expr::sum(vars.into_iter().map(|v| v.name()))
    }

    pub fn build(&self, mode: Mode) -> crate::ilp::Problem {
        let mut builder = ProblemBuilder::new().add_variables(self.variables.iter().map(Variable::name));

        builder = self.post_c1_slot_uniqueness(builder);
        if mode != Mode::Maximize {
            builder = self.post_c2_teacher_non_overlap(builder);
        }
        if mode != Mode::Maximize {
            builder = self.post_c3_subject_cadence(builder, mode);
        }
        if mode != Mode::Maximize {
            builder = self.post_c4_teacher_alternation(builder);
        }
        builder = self.post_c5_group_cell_uniqueness(builder);
        builder = self.post_c6_one_colle_per_day(builder);
        builder = self.post_c7_weekly_load(builder, mode);
        builder = self.post_c8_consecutive_forbidden(builder);

        if mode == Mode::Maximize {
            let objective = Expr::sum(self.variables.iter().map(Variable::name));
            builder = builder.maximize(objective);
        }

        builder.build()
    }

    // C1: at most one group per (slot, week).
    fn post_c1_slot_uniqueness(&self, mut builder: ProblemBuilder) -> ProblemBuilder {
        for (slot_idx, _slot) in self.catalog.slots.iter().enumerate() {
            for week_idx in 0..self.catalog.weeks.len() {
                let vars = self.vars_for_slot_week(slot_idx, week_idx);
                if vars.is_empty() {
                    continue;
                }
                let sum = Self::sum(vars.into_iter().copied());
                builder = builder
                    .add_constraint(sum.leq(&Expr::constant(1)))
                    .expect("variables declared above");
            }
        }
        builder
    }

    // C2: a teacher cannot be in two places at the same (week, day, hour).
    fn post_c2_teacher_non_overlap(&self, mut builder: ProblemBuilder) -> ProblemBuilder {
        let mut buckets: BTreeMap<(&str, &str, crate::time::HourRange), Vec<usize>> =
            BTreeMap::new();
        for (slot_idx, slot) in self.catalog.slots.iter().enumerate() {
            buckets
                .entry((slot.teacher.as_str(), slot.day.as_str(), slot.hour))
                .or_default()
                .push(slot_idx);
        }

        for slot_indices in buckets.values() {
            if slot_indices.len() < 2 {
                continue;
            }
            for week_idx in 0..self.catalog.weeks.len() {
                let vars: Vec<Variable> = slot_indices
                    .iter()
                    .flat_map(|&s| self.vars_for_slot_week(s, week_idx).into_iter().copied())
                    .collect();
                if vars.is_empty() {
                    continue;
                }
                let sum = Self::sum(vars);
                builder = builder
                    .add_constraint(sum.leq(&Expr::constant(1)))
                    .expect("variables declared above");
            }
        }
        builder
    }

    // C3: subject cadence per group, per cadence window.
    fn post_c3_subject_cadence(&self, mut builder: ProblemBuilder, mode: Mode) -> ProblemBuilder {
        for group in self.catalog.groups() {
            for (subject, rule) in self.policy.active_rules() {
                let subject_slots: Vec<usize> = self
                    .catalog
                    .slots
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| slot.subject == subject)
                    .map(|(idx, _)| idx)
                    .collect();
                if subject_slots.is_empty() {
                    continue;
                }

                for window_indices in window::window_indices(self.catalog.weeks.len(), rule.frequency as usize)
                {
                    let vars: Vec<Variable> = subject_slots
                        .iter()
                        .flat_map(|&s| {
                            window_indices
                                .clone()
                                .filter_map(move |w| {
                                    self.variables
                                        .get(&Variable { slot: s, week: w, group })
                                        .copied()
                                })
                        })
                        .collect();

                    let sum = Self::sum(vars);
                    let constraint = match mode {
                        Mode::Strict => sum.eq(&Expr::constant(1)),
                        Mode::Relaxed => sum.geq(&Expr::constant(1)),
                        Mode::Maximize => unreachable!("C3 skipped in maximize"),
                    };
                    builder = builder
                        .add_constraint(constraint)
                        .expect("variables declared above");
                }
            }
        }
        builder
    }

    // C4: no group sees the same teacher in two consecutive fortnights, for
    // subjects whose cadence frequency is exactly 2.
    fn post_c4_teacher_alternation(&self, mut builder: ProblemBuilder) -> ProblemBuilder {
        let fortnights = window::window_indices(self.catalog.weeks.len(), 2);

        for group in self.catalog.groups() {
            for (subject, rule) in self.policy.active_rules() {
                if rule.frequency != 2 {
                    continue;
                }

                let teachers: BTreeSet<&str> = self
                    .catalog
                    .slots
                    .iter()
                    .filter(|slot| slot.subject == subject)
                    .map(|slot| slot.teacher.as_str())
                    .collect();

                for teacher in teachers {
                    let teacher_subject_slots: Vec<usize> = self
                        .catalog
                        .slots
                        .iter()
                        .enumerate()
                        .filter(|(_, slot)| slot.subject == subject && slot.teacher == teacher)
                        .map(|(idx, _)| idx)
                        .collect();

                    for pair in fortnights.windows(2) {
                        let (q1, q2) = (pair[0].clone(), pair[1].clone());
                        let vars: Vec<Variable> = teacher_subject_slots
                            .iter()
                            .flat_map(|&s| {
                                q1.clone().chain(q2.clone()).filter_map(move |w| {
                                    self.variables
                                        .get(&Variable { slot: s, week: w, group })
                                        .copied()
                                })
                            })
                            .collect();
                        if vars.is_empty() {
                            continue;
                        }
                        let sum = Self::sum(vars);
                        builder = builder
                            .add_constraint(sum.leq(&Expr::constant(1)))
                            .expect("variables declared above");
                    }
                }
            }
        }
        builder
    }

    // C5: at most one colle per group at a given (week, day, hour), across
    // every slot sharing that (day, hour) regardless of teacher.
    fn post_c5_group_cell_uniqueness(&self, mut builder: ProblemBuilder) -> ProblemBuilder {
        let mut buckets: BTreeMap<(&str, crate::time::HourRange), Vec<usize>> = BTreeMap::new();
        for (slot_idx, slot) in self.catalog.slots.iter().enumerate() {
            buckets
                .entry((slot.day.as_str(), slot.hour))
                .or_default()
                .push(slot_idx);
        }

        for slot_indices in buckets.values() {
            if slot_indices.len() < 2 {
                continue;
            }
            for group in self.catalog.groups() {
                for week_idx in 0..self.catalog.weeks.len() {
                    let vars: Vec<Variable> = slot_indices
                        .iter()
                        .filter_map(|&s| {
                            self.variables
                                .get(&Variable { slot: s, week: week_idx, group })
                                .copied()
                        })
                        .collect();
                    if vars.is_empty() {
                        continue;
                    }
                    let sum = Self::sum(vars);
                    builder = builder
                        .add_constraint(sum.leq(&Expr::constant(1)))
                        .expect("variables declared above");
                }
            }
        }
        builder
    }

    // C6: at most one colle per group per day.
    fn post_c6_one_colle_per_day(&self, mut builder: ProblemBuilder) -> ProblemBuilder {
        let mut by_day: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (slot_idx, slot) in self.catalog.slots.iter().enumerate() {
            by_day.entry(slot.day.as_str()).or_default().push(slot_idx);
        }

        for slot_indices in by_day.values() {
            for group in self.catalog.groups() {
                for week_idx in 0..self.catalog.weeks.len() {
                    let vars: Vec<Variable> = slot_indices
                        .iter()
                        .filter_map(|&s| {
                            self.variables
                                .get(&Variable { slot: s, week: week_idx, group })
                                .copied()
                        })
                        .collect();
                    if vars.is_empty() {
                        continue;
                    }
                    let sum = Self::sum(vars);
                    builder = builder
                        .add_constraint(sum.leq(&Expr::constant(1)))
                        .expect("variables declared above");
                }
            }
        }
        builder
    }

    // C7: weekly load is between 1 and 4 (strict/relaxed) or at most 4 (maximize).
    fn post_c7_weekly_load(&self, mut builder: ProblemBuilder, mode: Mode) -> ProblemBuilder {
        for group in self.catalog.groups() {
            for week_idx in 0..self.catalog.weeks.len() {
                let vars: Vec<Variable> = self
                    .variables
                    .iter()
                    .filter(|v| v.week == week_idx && v.group == group)
                    .copied()
                    .collect();
                let sum = Self::sum(vars);

                builder = builder
                    .add_constraint(sum.leq(&Expr::constant(4)))
                    .expect("variables declared above");
                if mode != Mode::Maximize {
                    builder = builder
                        .add_constraint(sum.geq(&Expr::constant(1)))
                        .expect("variables declared above");
                }
            }
        }
        builder
    }

    // C8: no two colles for the same group on the same day with touching
    // (end == start) hour ranges.
    fn post_c8_consecutive_forbidden(&self, mut builder: ProblemBuilder) -> ProblemBuilder {
        let mut by_day: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (slot_idx, slot) in self.catalog.slots.iter().enumerate() {
            by_day.entry(slot.day.as_str()).or_default().push(slot_idx);
        }

        for slot_indices in by_day.values() {
            for &s1 in slot_indices {
                for &s2 in slot_indices {
                    if s1 == s2 {
                        continue;
                    }
                    if self.catalog.slots[s1].hour.end != self.catalog.slots[s2].hour.start {
                        continue;
                    }
                    for group in self.catalog.groups() {
                        for week_idx in 0..self.catalog.weeks.len() {
                            let v1 = self
                                .variables
                                .get(&Variable { slot: s1, week: week_idx, group })
                                .copied();
                            let v2 = self
                                .variables
                                .get(&Variable { slot: s2, week: week_idx, group })
                                .copied();
                            let (Some(v1), Some(v2)) = (v1, v2) else {
                                continue;
                            };
                            let sum = Self::sum([v1, v2]);
                            builder = builder
                                .add_constraint(sum.leq(&Expr::constant(1)))
                                .expect("variables declared above");
                        }
                    }
                }
            }
        }
        builder
    }
}

/// Writes a solver solution back into a blank copy of `catalog`: one group id
/// (or empty) per (slot, week) cell.
pub fn materialize(catalog: &Catalog, variables: &BTreeSet<Variable>, solution: &crate::ilp::Solution) -> Catalog {
    let mut assignment = catalog.blank();
    for var in variables {
        if solution.get(&var.name()).copied().unwrap_or(false) {
            assignment.set_cell(var.slot, var.week, Some(var.group));
        }
    }
    assignment
}

/// Builds and solves the model for exactly one tier, without escalating.
/// Useful for callers (the CLI's `--mode` override) that want to pin a
/// specific tier rather than let the driver escalate on infeasibility.
pub fn solve_mode(catalog: &Catalog, policy: &AlternationPolicy, mode: Mode) -> Result<Catalog> {
    let builder = ModelBuilder::new(catalog, policy);
    let solver = coin_cbc::Solver::new(SOLVE_TIME_LIMIT_SECS);
    let problem = builder.build(mode);
    let solution = solver.solve(&problem).ok_or(Error::NoSolution)?;
    Ok(materialize(catalog, builder.variables(), &solution))
}

/// Runs the three-tier escalation (spec.md §4.5): strict, then relaxed, then
/// maximize. Returns the tier that succeeded together with the filled-in
/// assignment, or [`Error::NoSolution`] if CBC could not find anything usable
/// within any tier's time budget.
pub fn solve(catalog: &Catalog, policy: &AlternationPolicy) -> Result<(Mode, Catalog)> {
    for mode in [Mode::Strict, Mode::Relaxed, Mode::Maximize] {
        if let Ok(assignment) = solve_mode(catalog, policy, mode) {
            return Ok((mode, assignment));
        }
    }

    Err(Error::NoSolution)
}
