//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use thiserror::Error;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::variable::{Variable, VariableBuilder, VariableType};

/// An optimization problem
///
/// Variables and constraints are kept in insertion order and are referenced
/// by id everywhere; every insertion is validated and rejected with a
/// [`ProblemError`] if it would leave the problem inconsistent.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Adding Variables
    /// Add a variable to the optimization problem
    pub fn add_variable(&mut self, mut variable: Variable) -> Result<(), ProblemError> {
        // Validate that the variable can in fact be added to the problem
        self.validate_variable(&variable)?;
        // Update the index of the variable to reflect the current variable count
        variable.index = self.variables.len();
        self.variables.insert(variable.id.clone(), variable);
        Ok(())
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        name: Option<&str>,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let mut builder = VariableBuilder::default();
        builder
            .id(id)
            .variable_type(variable_type)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound);
        if let Some(name) = name {
            builder.name(name);
        }
        let new_var = builder
            .build()
            .map_err(|err| ProblemError::InvalidVariable(err.to_string()))?;
        self.add_variable(new_var)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, id: &str, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(id, &constraint)?;
        self.constraints.insert(id.to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let new_cons = Constraint::new_equality(variables, coefficients, equals);
        self.add_constraint(id, new_cons)
    }

    /// Create a new inequality constraint and add it to the problem
    ///
    /// Either bound may be infinite, giving a one-sided inequality.
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let new_cons = Constraint::new_inequality(variables, coefficients, lower_bound, upper_bound);
        self.add_constraint(id, new_cons)
    }
    // endregion Adding Constraints

    // region Adding Objective Terms
    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }

    /// Add a new linear term to the objective
    pub fn add_new_linear_objective_term(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        if !self.variables.contains_key(variable_id) {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        self.objective
            .add_term(ObjectiveTerm::new(variable_id, coefficient));
        Ok(())
    }
    // endregion Adding Objective Terms

    // region Accessors
    /// The objective of the problem
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// The variables of the problem, keyed by id, in insertion order
    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    /// The constraints of the problem, keyed by id, in insertion order
    pub fn constraints(&self) -> &IndexMap<String, Constraint> {
        &self.constraints
    }

    /// Current number of variables in the problem
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Current number of constraints in the problem
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether any variable of the problem is an integer variable
    pub fn has_integer_variables(&self) -> bool {
        self.variables
            .values()
            .any(|var| var.variable_type == VariableType::Integer)
    }
    // endregion Accessors

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        // Check if there is already a variable with this id
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists);
        }
        // Check if the variable bounds are valid
        if variable.lower_bound > variable.upper_bound {
            return Err(ProblemError::InvalidVariableBounds);
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, id: &str, constraint: &Constraint) -> Result<(), ProblemError> {
        // Check that a constraint with the same id doesn't already exist
        if self.constraints.contains_key(id) {
            return Err(ProblemError::ConstraintAlreadyExists);
        }
        // Check that for inequality constraints the bounds make sense
        if let Constraint::Inequality {
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds);
            }
        }
        // Check that the variables in this constraint are in the problem
        for var_id in constraint.variable_ids() {
            if !self.variables.contains_key(var_id) {
                return Err(ProblemError::NonExistentVariablesInConstraint);
            }
        }
        // All checks have passed
        Ok(())
    }
    // endregion Validation Functions
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable")]
    VariableIdAlreadyExists,
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound>upper_bound")]
    InvalidVariableBounds,
    /// Error when a variable could not be constructed
    #[error("Could not construct variable: {0}")]
    InvalidVariable(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint")]
    ConstraintAlreadyExists,
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add an inequality constraint with lower_bound > upper_bound")]
    InvalidConstraintBounds,
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Tried to add a constraint with variables not in the problem")]
    NonExistentVariablesInConstraint,
    /// Error when trying to add an objective term which includes variables not in the problem
    #[error("Tried adding an objective term with variables not in the problem")]
    NonExistentVariablesInObjective,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective().sense(), ObjectiveSense::Maximize);

        let min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective().sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn update_objective_sense() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.update_objective_sense(ObjectiveSense::Minimize);
        assert_eq!(problem.objective().sense(), ObjectiveSense::Minimize);
        problem.update_objective_sense(ObjectiveSense::Maximize);
        assert_eq!(problem.objective().sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        // Add a single variable
        problem
            .add_new_variable("x", None, VariableType::Continuous, 64., 100.)
            .unwrap();
        // Check that the variable is in fact added
        if let Some(var) = problem.variables().get("x") {
            assert_eq!(var.variable_type, VariableType::Continuous);
            assert_eq!(var.index, 0);
            assert!(
                (var.lower_bound - 64.0).abs() < 1e-25,
                "Variable added with incorrect lower bound"
            );
            assert!(
                (var.upper_bound - 100.0).abs() < 1e-25,
                "Variable added with incorrect upper bound"
            );
        } else {
            panic!("Variable not added to problem")
        }
        assert!(!problem.has_integer_variables());

        // Add another variable, this time an integer variable
        problem
            .add_new_variable("y", None, VariableType::Integer, 0., 100.)
            .unwrap();
        if let Some(var) = problem.variables().get("y") {
            assert_eq!(var.variable_type, VariableType::Integer);
            assert_eq!(var.index, 1);
        } else {
            panic!("Variable not added to problem")
        }
        assert!(problem.has_integer_variables());
        assert_eq!(problem.num_variables(), 2);
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        // Add a variable with bad bounds
        let res = problem.add_new_variable("x", None, VariableType::Continuous, 100., 64.);
        assert_eq!(res, Err(ProblemError::InvalidVariableBounds));

        // Add the same variable twice
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., 64.)
            .unwrap();
        let res = problem.add_new_variable("x", None, VariableType::Continuous, 0., 64.);
        assert_eq!(res, Err(ProblemError::VariableIdAlreadyExists));
    }

    #[test]
    fn add_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        // Add some variables
        problem
            .add_new_variable("x", None, VariableType::Continuous, 64., 100.)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 64., 100.)
            .unwrap();

        // Add an equality constraint
        problem
            .add_new_equality_constraint("eq_constraint", &["x", "y"], &[2., 3.], 200.)
            .unwrap();

        // Check that the constraint was correctly added
        match problem.constraints().get("eq_constraint").unwrap() {
            Constraint::Equality { equals, .. } => {
                assert!((equals - 200.).abs() < 1e-25)
            }
            Constraint::Inequality { .. } => panic!("Incorrect constraint type added"),
        }

        // Add an inequality constraint
        problem
            .add_new_inequality_constraint("ineq_constraint", &["x", "y"], &[2., 3.], 100., 200.)
            .unwrap();

        // Check that the constraint was correctly added
        match problem.constraints().get("ineq_constraint").unwrap() {
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => {
                assert!((lower_bound - 100.).abs() < 1e-25);
                assert!((upper_bound - 200.).abs() < 1e-25);
            }
            Constraint::Equality { .. } => panic!("Incorrect constraint type added"),
        }
        assert_eq!(problem.num_constraints(), 2);
    }

    #[test]
    fn add_bad_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        // Add some variables
        problem
            .add_new_variable("x", None, VariableType::Continuous, 64., 100.)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 64., 100.)
            .unwrap();

        // Inverted bounds are caught
        let res = problem
            .add_new_inequality_constraint("bad_constraint", &["x", "y"], &[2., 3.], 200., 100.);
        assert_eq!(res, Err(ProblemError::InvalidConstraintBounds));

        // Unknown variables are caught
        let res =
            problem.add_new_equality_constraint("bad_constraint", &["x", "z"], &[2., 3.], 200.);
        assert_eq!(res, Err(ProblemError::NonExistentVariablesInConstraint));

        // Duplicate constraint ids are caught
        problem
            .add_new_equality_constraint("dup_constraint", &["x"], &[1.], 80.)
            .unwrap();
        let res = problem.add_new_equality_constraint("dup_constraint", &["y"], &[1.], 80.);
        assert_eq!(res, Err(ProblemError::ConstraintAlreadyExists));
    }

    #[test]
    fn add_objective_terms() {
        let mut problem = Problem::new_minimization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., 100.)
            .unwrap();

        problem.add_new_linear_objective_term("x", 5.).unwrap();
        assert_eq!(problem.objective().terms().len(), 1);

        // Terms referencing unknown variables are caught
        let res = problem.add_new_linear_objective_term("z", 5.);
        assert_eq!(res, Err(ProblemError::NonExistentVariablesInObjective));
    }
}
