//! Provides struct for representing an optimization problem's objective

use std::fmt::{Display, Formatter};

/// Represents the linear objective of an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Terms included in the objective (see [`ObjectiveTerm`])
    terms: Vec<ObjectiveTerm>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    sense: ObjectiveSense,
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: Vec::new(),
            sense,
        }
    }

    /// Create a new empty maximization objective
    pub fn new_maximize() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// The sense of the objective
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// The terms making up the objective
    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Add a new term to the objective
    pub fn add_term(&mut self, term: ObjectiveTerm) {
        self.terms.push(term);
    }

    /// Add a new linear term to the objective
    pub fn add_linear_term(&mut self, variable: &str, coefficient: f64) {
        self.terms.push(ObjectiveTerm::new(variable, coefficient));
    }

    /// Add a series of linear terms to the objective function
    pub fn add_linear_terms(&mut self, variables: &[&str], coefficients: &[f64]) {
        self.terms.extend(
            variables
                .iter()
                .zip(coefficients)
                .map(|(var, coef)| ObjectiveTerm::new(var, *coef)),
        );
    }

    /// Remove all terms from the objective
    pub fn remove_all_terms(&mut self) {
        self.terms.clear();
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// A linear term in the objective, the multiplication of `variable` by `coefficient`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveTerm {
    /// Id of the variable in the term
    pub variable: String,
    /// Coefficient for the term
    pub coefficient: f64,
}

impl ObjectiveTerm {
    /// Create a new linear objective term
    pub fn new(variable: &str, coefficient: f64) -> Self {
        ObjectiveTerm {
            variable: variable.to_string(),
            coefficient,
        }
    }
}

impl Display for ObjectiveTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_objective() {
        let max_objective = Objective::new_maximize();
        assert_eq!(max_objective.sense(), ObjectiveSense::Maximize);
        assert!(max_objective.terms().is_empty());

        let min_objective = Objective::new_minimize();
        assert_eq!(min_objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn set_sense() {
        let mut objective = Objective::new_maximize();
        objective.set_sense(ObjectiveSense::Minimize);
        assert_eq!(objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn add_terms() {
        let mut objective = Objective::new_minimize();
        objective.add_linear_term("x", 2.0);
        objective.add_linear_terms(&["y", "z"], &[3.0, 4.0]);
        assert_eq!(objective.terms().len(), 3);
        assert_eq!(objective.terms()[1].variable, "y");
        assert!((objective.terms()[2].coefficient - 4.0).abs() < 1e-25);

        objective.remove_all_terms();
        assert!(objective.terms().is_empty());
    }
}
