//! The COIN-OR CBC backend: translates a [`crate::ilp::Problem`] (boolean
//! variables, linear (in)equalities, an optional linear objective) into a
//! `coin_cbc::Model` and solves it under a wall-clock time limit.


use crate::ilp::linexpr::Sign;
use crate::ilp::{Problem, Solution};

#[derive(Debug, Clone)]
pub struct Solver {
    time_limit_secs: u32,
    disable_logging: bool,
}

impl Solver {
    pub fn new(time_limit_secs: u32) -> Self {
        Solver {
            time_limit_secs,
            disable_logging: true,
        }
    }

    pub fn with_disable_logging(time_limit_secs: u32, disable_logging: bool) -> Self {
        Solver {
            time_limit_secs,
            disable_logging,
        }
    }

    /// Runs CBC on `problem`. Returns `None` if CBC does not report a feasible
    /// (or, when an objective is set, optimal) solution within the time limit.
    pub fn solve(&self, problem: &Problem) -> Option<Solution> {
        // CBC writes its own banner/progress to stdout regardless of the "log"
        // parameter below; we gag it directly rather than trust that parameter.
        let stdout_gag = gag::Gag::stdout();
        if !self.disable_logging {
            if let Ok(gag) = stdout_gag {
                drop(gag);
            }
        }

        let mut model = coin_cbc::Model::default();

        let cols: std::collections::BTreeMap<_, _> = problem
            .get_variables()
            .iter()
            .map(|v| (v.clone(), model.add_binary()))
            .collect();

        for constraint in problem.get_constraints() {
            let row = model.add_row();
            for var in constraint.variables() {
                let col = cols[&var];
                let weight = constraint.get_var(&var).unwrap();
                model.set_weight(row, col, weight.into());
            }
            match constraint.get_sign() {
                Sign::Equals => model.set_row_equal(row, (-constraint.get_constant()).into()),
                Sign::LessThan => model.set_row_upper(row, (-constraint.get_constant()).into()),
            }
        }

        if let Some(objective) = problem.get_objective() {
            use coin_cbc::Sense;
            model.set_obj_sense(Sense::Maximize);
            for var in objective.variables() {
                let col = cols[&var];
                model.set_obj_coeff(col, objective.get(&var).unwrap_or(0).into());
            }
        }

        if self.disable_logging {
            model.set_parameter("log", "0");
            model.set_parameter("slog", "0");
        }
        model.set_parameter("seconds", &self.time_limit_secs.to_string());
        model.set_parameter("sec", &self.time_limit_secs.to_string());

        let sol = model.solve();

        Self::reconstruct_solution(&sol, &cols)
    }

    fn reconstruct_solution(
        sol: &coin_cbc::Solution,
        cols: &std::collections::BTreeMap<String, coin_cbc::Col>,
    ) -> Option<Solution> {
        use coin_cbc::raw::{SecondaryStatus, Status};

        if sol.raw().status() != Status::Finished {
            return None;
        }
        if sol.raw().secondary_status() != SecondaryStatus::HasSolution {
            return None;
        }

        Some(
            cols.iter()
                .map(|(var, col)| (var.clone(), sol.col(*col) >= 0.5))
                .collect(),
        )
    }
}
