//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// A decision variable in an optimization problem
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(setter(into))]
pub struct Variable {
    /// Used to identify the variable within a problem
    pub id: String,
    /// Human-readable variable name
    #[builder(setter(into, strip_option), default = "None")]
    pub name: Option<String>,
    /// Type of the variable (see [`VariableType`])
    #[builder(default = "VariableType::Continuous")]
    pub variable_type: VariableType,
    /// Smallest value the variable is allowed to take
    #[builder(default = "f64::NEG_INFINITY")]
    pub lower_bound: f64,
    /// Largest value the variable is allowed to take
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
    /// Position of the variable within its problem, assigned when it is added
    #[builder(default = "0")]
    pub(crate) index: usize,
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", name, self.variable_type),
            None => write!(f, "{}:{}", self.id, self.variable_type),
        }
    }
}

/// Represents the type of variable in an optimization problem
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    Integer,
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Integer => write!(f, "INTEGER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_defaults() {
        let var = VariableBuilder::default().id("x").build().unwrap();
        assert_eq!(var.id, "x");
        assert_eq!(var.name, None);
        assert_eq!(var.variable_type, VariableType::Continuous);
        assert_eq!(var.lower_bound, f64::NEG_INFINITY);
        assert_eq!(var.upper_bound, f64::INFINITY);
        assert_eq!(var.index, 0);
    }

    #[test]
    fn display() {
        let var = VariableBuilder::default()
            .id("x")
            .variable_type(VariableType::Integer)
            .build()
            .unwrap();
        assert_eq!(format!("{}", var), "x:INTEGER");

        let named = VariableBuilder::default()
            .id("x")
            .name("units shipped")
            .build()
            .unwrap();
        assert_eq!(format!("{}", named), "units shipped:CONTINUOUS");
    }
}
