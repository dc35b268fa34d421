//! A small 0/1 integer linear programming layer: boolean decision variables,
//! linear constraints over them ([`linexpr`]), and a backend solver
//! ([`solvers::coin_cbc`]).
//!
//! This module deliberately supports a single variable type (boolean) rather
//! than the generic integer/boolean mix a full-blown ILP modeler would need:
//! every decision variable this crate ever builds is a boolean "is this group
//! assigned to this slot in this week" indicator.

pub mod linexpr;
pub mod solvers;

use std::collections::BTreeSet;

use thiserror::Error;

use linexpr::Constraint;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Variable '{0}' is used in a constraint but was never declared")]
    UndeclaredVariable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Accumulates boolean decision variables and the constraints posted on them.
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    variables: BTreeSet<String>,
    constraints: Vec<Constraint>,
    objective: Option<linexpr::Expr>,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable<T: Into<String>>(mut self, var: T) -> Self {
        self.variables.insert(var.into());
        self
    }

    pub fn add_variables<U: Into<String>, T: IntoIterator<Item = U>>(mut self, vars: T) -> Self {
        for var in vars {
            self.variables.insert(var.into());
        }
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Result<Self> {
        for var in constraint.variables() {
            if !self.variables.contains(&var) {
                return Err(Error::UndeclaredVariable(var));
            }
        }
        self.constraints.push(constraint.cleaned());
        Ok(self)
    }

    pub fn add_constraints<T: IntoIterator<Item = Constraint>>(
        mut self,
        constraints: T,
    ) -> Result<Self> {
        for constraint in constraints {
            self = self.add_constraint(constraint)?;
        }
        Ok(self)
    }

    /// Sets the objective to maximize. Absent, the problem is solved for mere feasibility.
    pub fn maximize(mut self, expr: linexpr::Expr) -> Self {
        self.objective = Some(expr);
        self
    }

    pub fn get_variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    pub fn build(self) -> Problem {
        Problem {
            variables: self.variables,
            constraints: self.constraints,
            objective: self.objective,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Problem {
    variables: BTreeSet<String>,
    constraints: Vec<Constraint>,
    objective: Option<linexpr::Expr>,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "variables : [")?;
        for v in &self.variables {
            write!(f, " {}", v)?;
        }
        writeln!(f, " ]")?;

        if let Some(obj) = &self.objective {
            writeln!(f, "maximize : {}", obj)?;
        }

        write!(f, "constraints :")?;
        for (i, c) in self.constraints.iter().enumerate() {
            write!(f, "\n{}) {}", i, c)?;
        }

        Ok(())
    }
}

impl Problem {
    pub fn get_variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    pub fn get_constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn get_objective(&self) -> Option<&linexpr::Expr> {
        self.objective.as_ref()
    }

    pub fn into_builder(self) -> ProblemBuilder {
        ProblemBuilder {
            variables: self.variables,
            constraints: self.constraints,
            objective: self.objective,
        }
    }
}

/// An assignment of every declared variable to a truth value, as returned by a solver.
pub type Solution = std::collections::BTreeMap<String, bool>;
