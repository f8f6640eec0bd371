//! Solver backends for optimization problems
pub mod microlp;

use thiserror::Error;

use crate::optimize::problem::Problem;
use crate::optimize::ProblemSolution;

/// Interface implemented by every solver backend
///
/// A backend translates a [`Problem`] into its own representation, performs a
/// single solve attempt, and normalizes the outcome into a
/// [`ProblemSolution`]. Infeasible and unbounded problems are legitimate
/// outcomes reported through the solution status; a [`SolverError`] is
/// reserved for faults of the solving routine itself.
pub trait Solver {
    /// Whether the backend can handle integer variables
    fn integer_variable_capable(&self) -> bool;

    /// Solve the problem
    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

/// Errors associated with solver backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Error when a problem with integer variables is given to a backend
    /// which only supports continuous variables
    #[error("Solver backend does not support integer variables")]
    IntegerVariablesUnsupported,
    /// Error when the solving routine itself fails
    #[error("Solver fault: {0}")]
    SolverFault(String),
}
