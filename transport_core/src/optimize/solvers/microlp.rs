//! Implements a solver interface for microlp
use indexmap::IndexMap;
use log::debug;
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection};

use crate::optimize::constraint::{Constraint, ConstraintTerm};
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Solver backend using the pure-Rust microlp simplex solver
///
/// Integer variables are handled by microlp's branch-and-bound over the LP
/// relaxation.
#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl MicrolpSolver {
    /// Create a new microlp backend
    pub fn new() -> Self {
        MicrolpSolver {}
    }

    /// Lower a constraint's linear terms into a microlp expression
    ///
    /// Coefficients of repeated variables are merged, since microlp rejects
    /// expressions mentioning the same variable twice.
    fn linear_expr(
        terms: &[ConstraintTerm],
        handles: &IndexMap<&str, microlp::Variable>,
    ) -> Result<LinearExpr, SolverError> {
        let mut merged: IndexMap<microlp::Variable, f64> = IndexMap::new();
        for term in terms {
            let handle = handles.get(term.variable.as_str()).ok_or_else(|| {
                SolverError::SolverFault(format!(
                    "constraint references unknown variable '{}'",
                    term.variable
                ))
            })?;
            *merged.entry(*handle).or_insert(0.0) += term.coefficient;
        }
        let mut expr = LinearExpr::empty();
        for (handle, coefficient) in merged {
            expr.add(handle, coefficient);
        }
        Ok(expr)
    }

    /// Clamp an f64 lower bound into the i32 range microlp uses for integer variables
    fn integer_lower_bound(bound: f64) -> i32 {
        if bound <= i32::MIN as f64 {
            i32::MIN
        } else {
            bound.ceil() as i32
        }
    }

    /// Clamp an f64 upper bound into the i32 range microlp uses for integer variables
    fn integer_upper_bound(bound: f64) -> i32 {
        if bound >= i32::MAX as f64 {
            i32::MAX
        } else {
            bound.floor() as i32
        }
    }
}

impl Solver for MicrolpSolver {
    fn integer_variable_capable(&self) -> bool {
        true
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let direction = match problem.objective().sense() {
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
        };
        let mut lp = microlp::Problem::new(direction);

        // microlp attaches objective coefficients at variable creation, so
        // collect them per variable before declaring anything
        let mut coefficients: IndexMap<&str, f64> = problem
            .variables()
            .keys()
            .map(|id| (id.as_str(), 0.0))
            .collect();
        for term in problem.objective().terms() {
            match coefficients.get_mut(term.variable.as_str()) {
                Some(coefficient) => *coefficient += term.coefficient,
                None => {
                    return Err(SolverError::SolverFault(format!(
                        "objective references unknown variable '{}'",
                        term.variable
                    )))
                }
            }
        }

        let mut handles: IndexMap<&str, microlp::Variable> =
            IndexMap::with_capacity(problem.num_variables());
        for (id, var) in problem.variables() {
            let obj_coeff = coefficients[id.as_str()];
            let handle = match var.variable_type {
                VariableType::Continuous => {
                    lp.add_var(obj_coeff, (var.lower_bound, var.upper_bound))
                }
                VariableType::Integer => lp.add_integer_var(
                    obj_coeff,
                    (
                        Self::integer_lower_bound(var.lower_bound),
                        Self::integer_upper_bound(var.upper_bound),
                    ),
                ),
            };
            handles.insert(id.as_str(), handle);
        }

        for constraint in problem.constraints().values() {
            match constraint {
                Constraint::Equality { terms, equals } => {
                    lp.add_constraint(Self::linear_expr(terms, &handles)?, ComparisonOp::Eq, *equals);
                }
                Constraint::Inequality {
                    terms,
                    lower_bound,
                    upper_bound,
                } => {
                    // A two-sided inequality lowers to a Ge and a Le row;
                    // infinite bounds contribute no row
                    if lower_bound.is_finite() {
                        lp.add_constraint(
                            Self::linear_expr(terms, &handles)?,
                            ComparisonOp::Ge,
                            *lower_bound,
                        );
                    }
                    if upper_bound.is_finite() {
                        lp.add_constraint(
                            Self::linear_expr(terms, &handles)?,
                            ComparisonOp::Le,
                            *upper_bound,
                        );
                    }
                }
            }
        }

        debug!(
            "solving problem with {} variables and {} constraints",
            problem.num_variables(),
            problem.num_constraints()
        );

        match lp.solve() {
            Ok(solution) => {
                let variable_values: IndexMap<String, f64> = handles
                    .iter()
                    .map(|(id, handle)| (id.to_string(), *solution.var_value(*handle)))
                    .collect();
                Ok(ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(solution.objective()),
                    variable_values: Some(variable_values),
                })
            }
            Err(microlp::Error::Infeasible) => Ok(ProblemSolution {
                status: OptimizationStatus::Infeasible,
                objective_value: None,
                variable_values: None,
            }),
            Err(microlp::Error::Unbounded) => Ok(ProblemSolution {
                status: OptimizationStatus::Unbounded,
                objective_value: None,
                variable_values: None,
            }),
            Err(fault) => Err(SolverError::SolverFault(fault.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_continuous_lp() {
        // Maximize x + 2*y subject to x + y <= 4 and 2*x + y >= 2,
        // with x >= 0 and 0 <= y <= 3; the optimum is 7 at (1, 3)
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0.0, f64::INFINITY)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 0.0, 3.0)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.0).unwrap();
        problem.add_new_linear_objective_term("y", 2.0).unwrap();
        problem
            .add_new_inequality_constraint("cap", &["x", "y"], &[1.0, 1.0], f64::NEG_INFINITY, 4.0)
            .unwrap();
        problem
            .add_new_inequality_constraint(
                "floor",
                &["x", "y"],
                &[2.0, 1.0],
                2.0,
                f64::INFINITY,
            )
            .unwrap();

        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 7.0).abs() < 1e-8);
        let values = solution.variable_values.unwrap();
        assert!((values["x"] - 1.0).abs() < 1e-8);
        assert!((values["y"] - 3.0).abs() < 1e-8);
    }

    #[test]
    fn solve_integer_program() {
        // Minimize x + y subject to x + y >= 3 with integer variables;
        // any split summing to 3 is optimal
        let mut problem = Problem::new_minimization();
        problem
            .add_new_variable("x", None, VariableType::Integer, 0.0, f64::INFINITY)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Integer, 0.0, f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.0).unwrap();
        problem.add_new_linear_objective_term("y", 1.0).unwrap();
        problem
            .add_new_inequality_constraint(
                "floor",
                &["x", "y"],
                &[1.0, 1.0],
                3.0,
                f64::INFINITY,
            )
            .unwrap();

        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn infeasible_problem_reported_via_status() {
        // x >= 2 and x <= 1 cannot both hold
        let mut problem = Problem::new_minimization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0.0, f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.0).unwrap();
        problem
            .add_new_inequality_constraint("floor", &["x"], &[1.0], 2.0, f64::INFINITY)
            .unwrap();
        problem
            .add_new_inequality_constraint("cap", &["x"], &[1.0], f64::NEG_INFINITY, 1.0)
            .unwrap();

        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert_eq!(solution.objective_value, None);
        assert_eq!(solution.variable_values, None);
    }

    #[test]
    fn unbounded_problem_reported_via_status() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0.0, f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.0).unwrap();
        problem
            .add_new_inequality_constraint("floor", &["x"], &[1.0], 0.0, f64::INFINITY)
            .unwrap();

        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Unbounded);
    }

    #[test]
    fn repeated_terms_are_merged() {
        // x appears twice in the constraint; the coefficients merge to 2*x <= 8
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0.0, f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.0).unwrap();
        problem
            .add_new_inequality_constraint(
                "cap",
                &["x", "x"],
                &[1.0, 1.0],
                f64::NEG_INFINITY,
                8.0,
            )
            .unwrap();

        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 4.0).abs() < 1e-8);
    }

    #[test]
    fn integer_bound_clamping() {
        assert_eq!(MicrolpSolver::integer_lower_bound(0.0), 0);
        assert_eq!(MicrolpSolver::integer_lower_bound(f64::NEG_INFINITY), i32::MIN);
        assert_eq!(MicrolpSolver::integer_upper_bound(10.7), 10);
        assert_eq!(MicrolpSolver::integer_upper_bound(f64::INFINITY), i32::MAX);
    }
}
