//! This module provides the TransportModel struct for representing an entire
//! transportation problem
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use log::{debug, info, warn};
use thiserror::Error;

use crate::configuration::{Solver as ConfiguredSolver, CONFIGURATION};
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::microlp::MicrolpSolver;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::OptimizationStatus;
use crate::transport::destination::Destination;
use crate::transport::origin::Origin;
use crate::transport::solution::{TransportOutcome, TransportSolution};

/// Represents a transportation problem over a dense bipartite route set
///
/// Every (origin, destination) pair is a route with a unit shipping cost.
/// Solving minimizes total shipping cost subject to shipping at most each
/// origin's supply out of it and at least each destination's demand into it.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportModel {
    /// Map of origin ids to Origin objects
    pub origins: IndexMap<String, Origin>,
    /// Map of destination ids to Destination objects
    pub destinations: IndexMap<String, Destination>,
    /// Unit shipping costs, keyed by origin id then destination id
    pub costs: IndexMap<String, IndexMap<String, f64>>,
}

impl TransportModel {
    pub fn new_empty() -> Self {
        TransportModel {
            origins: IndexMap::new(),
            destinations: IndexMap::new(),
            costs: IndexMap::new(),
        }
    }

    /// Build a model from a dense cost table and supply/demand vectors
    ///
    /// Origin and destination labels are derived from the cost table's rows
    /// and columns; the supply and demand vectors must use exactly the same
    /// label sets. Mismatched labels, missing cost entries, and negative
    /// values are rejected with a descriptive [`TransportError`].
    pub fn from_tables(
        costs: IndexMap<String, IndexMap<String, f64>>,
        supply: IndexMap<String, f64>,
        demand: IndexMap<String, f64>,
    ) -> Result<TransportModel, TransportError> {
        let destination_labels: Vec<String> = costs
            .values()
            .next()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();

        for label in supply.keys() {
            if !costs.contains_key(label) {
                return Err(TransportError::SupplyLabelMismatch {
                    label: label.clone(),
                });
            }
        }
        for label in demand.keys() {
            if !destination_labels.contains(label) {
                return Err(TransportError::DemandLabelMismatch {
                    label: label.clone(),
                });
            }
        }

        let mut model = TransportModel::new_empty();
        for label in costs.keys() {
            let supply_value =
                supply
                    .get(label)
                    .copied()
                    .ok_or_else(|| TransportError::MissingSupply {
                        label: label.clone(),
                    })?;
            model.add_origin(Origin::new(label.clone(), None, supply_value));
        }
        for label in destination_labels {
            let demand_value =
                demand
                    .get(&label)
                    .copied()
                    .ok_or_else(|| TransportError::MissingDemand {
                        label: label.clone(),
                    })?;
            model.add_destination(Destination::new(label, None, demand_value));
        }
        model.costs = costs;
        model.validate()?;
        Ok(model)
    }

    /// Add an origin to the model
    pub fn add_origin(&mut self, origin: Origin) {
        let id = origin.id.clone();
        self.origins.insert(id, origin);
    }

    /// Add a destination to the model
    pub fn add_destination(&mut self, destination: Destination) {
        let id = destination.id.clone();
        self.destinations.insert(id, destination);
    }

    /// Set the unit cost of shipping from `origin` to `destination`
    pub fn set_cost(&mut self, origin: &str, destination: &str, cost: f64) {
        self.costs
            .entry(origin.to_string())
            .or_default()
            .insert(destination.to_string(), cost);
    }

    /// Total units available across all origins
    pub fn total_supply(&self) -> f64 {
        self.origins.values().map(|origin| origin.supply).sum()
    }

    /// Total units required across all destinations
    pub fn total_demand(&self) -> f64 {
        self.destinations
            .values()
            .map(|destination| destination.demand)
            .sum()
    }

    /// Compare total supply against total demand
    ///
    /// This diagnostic is computed from the raw inputs, independent of any
    /// solver outcome. A deficit means the demand constraints are jointly
    /// unsatisfiable: each destination's intake is at least its demand and
    /// each origin's outflow is at most its supply, while total intake and
    /// total outflow are the same quantity.
    pub fn balance(&self) -> SupplyDemandBalance {
        let difference = self.total_supply() - self.total_demand();
        if difference > 0.0 {
            SupplyDemandBalance::Surplus(difference)
        } else if difference < 0.0 {
            SupplyDemandBalance::Deficit(-difference)
        } else {
            SupplyDemandBalance::Balanced
        }
    }

    /// Check the model preconditions before any optimization problem is built
    ///
    /// Supplies, demands, and costs must be non-negative; the cost table must
    /// have exactly one entry per (origin, destination) pair.
    pub fn validate(&self) -> Result<(), TransportError> {
        for origin in self.origins.values() {
            if origin.supply < 0.0 {
                return Err(TransportError::NegativeSupply {
                    origin: origin.id.clone(),
                    supply: origin.supply,
                });
            }
        }
        for destination in self.destinations.values() {
            if destination.demand < 0.0 {
                return Err(TransportError::NegativeDemand {
                    destination: destination.id.clone(),
                    demand: destination.demand,
                });
            }
        }
        for (row_label, row) in &self.costs {
            if !self.origins.contains_key(row_label) {
                return Err(TransportError::UnknownCostRow {
                    label: row_label.clone(),
                });
            }
            for (column_label, cost) in row {
                if !self.destinations.contains_key(column_label) {
                    return Err(TransportError::UnknownCostColumn {
                        origin: row_label.clone(),
                        label: column_label.clone(),
                    });
                }
                if *cost < 0.0 {
                    return Err(TransportError::NegativeCost {
                        origin: row_label.clone(),
                        destination: column_label.clone(),
                        cost: *cost,
                    });
                }
            }
        }
        for origin_id in self.origins.keys() {
            for destination_id in self.destinations.keys() {
                let present = self
                    .costs
                    .get(origin_id)
                    .is_some_and(|row| row.contains_key(destination_id));
                if !present {
                    return Err(TransportError::MissingCost {
                        origin: origin_id.clone(),
                        destination: destination_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Translate the model into an integer linear program
    ///
    /// One non-negative integer route variable per (origin, destination)
    /// pair; the objective minimizes total shipping cost; each origin gets a
    /// `<= supply` row and each destination a `>= demand` row. Both
    /// constraint families are inequalities, so an origin may ship below
    /// capacity and a destination may be over-served.
    pub fn build_problem(&self) -> Result<Problem, TransportError> {
        self.validate()?;
        let mut problem = Problem::new_minimization();

        for origin_id in self.origins.keys() {
            for destination_id in self.destinations.keys() {
                let id = route_id(origin_id, destination_id);
                problem.add_new_variable(&id, None, VariableType::Integer, 0.0, f64::INFINITY)?;
                problem.add_new_linear_objective_term(
                    &id,
                    self.route_cost(origin_id, destination_id)?,
                )?;
            }
        }

        for (origin_id, origin) in &self.origins {
            let ids: Vec<String> = self
                .destinations
                .keys()
                .map(|destination_id| route_id(origin_id, destination_id))
                .collect();
            let variables: Vec<&str> = ids.iter().map(String::as_str).collect();
            problem.add_new_inequality_constraint(
                &format!("supply_{}", origin_id),
                &variables,
                &vec![1.0; variables.len()],
                f64::NEG_INFINITY,
                origin.supply,
            )?;
        }

        for (destination_id, destination) in &self.destinations {
            let ids: Vec<String> = self
                .origins
                .keys()
                .map(|origin_id| route_id(origin_id, destination_id))
                .collect();
            let variables: Vec<&str> = ids.iter().map(String::as_str).collect();
            problem.add_new_inequality_constraint(
                &format!("demand_{}", destination_id),
                &variables,
                &vec![1.0; variables.len()],
                destination.demand,
                f64::INFINITY,
            )?;
        }

        debug!(
            "built transportation problem with {} route variables and {} constraints",
            problem.num_variables(),
            problem.num_constraints()
        );
        Ok(problem)
    }

    /// Solve the model and extract the shipment plan
    ///
    /// Builds a fresh optimization problem, runs the configured solver
    /// backend once, and maps the raw variable assignment back into a
    /// labeled allocation matrix. Solver faults are reported through
    /// [`TransportOutcome::SolverFault`] rather than propagated as a crash.
    pub fn solve(&self) -> Result<TransportOutcome, TransportError> {
        if self.origins.is_empty() || self.destinations.is_empty() {
            // No routes exist; the empty shipment plan is trivially optimal
            self.validate()?;
            debug!("model has no routes, returning the empty shipment plan");
            return Ok(TransportOutcome::Optimal(TransportSolution::empty()));
        }

        let problem = self.build_problem()?;
        let mut solver = match CONFIGURATION.read().unwrap().solver {
            ConfiguredSolver::Microlp => MicrolpSolver::new(),
        };
        if problem.has_integer_variables() && !solver.integer_variable_capable() {
            return Ok(TransportOutcome::SolverFault(
                SolverError::IntegerVariablesUnsupported.to_string(),
            ));
        }

        let outcome = match solver.solve(&problem) {
            Ok(solution) => match solution.status {
                OptimizationStatus::Optimal => {
                    let values = solution.variable_values.unwrap_or_default();
                    let objective = solution.objective_value.unwrap_or(0.0);
                    TransportOutcome::Optimal(self.extract_solution(&values, objective))
                }
                status => {
                    info!("solver finished without an optimum: {:?}", status);
                    TransportOutcome::NotSolved(status)
                }
            },
            Err(fault) => {
                warn!("solver fault: {}", fault);
                TransportOutcome::SolverFault(fault.to_string())
            }
        };
        Ok(outcome)
    }

    /// Unit cost of the route from `origin` to `destination`
    fn route_cost(&self, origin: &str, destination: &str) -> Result<f64, TransportError> {
        self.costs
            .get(origin)
            .and_then(|row| row.get(destination))
            .copied()
            .ok_or_else(|| TransportError::MissingCost {
                origin: origin.to_string(),
                destination: destination.to_string(),
            })
    }

    /// Map solved route values back into a labeled allocation matrix
    fn extract_solution(
        &self,
        values: &IndexMap<String, f64>,
        objective: f64,
    ) -> TransportSolution {
        let tolerance = CONFIGURATION.read().unwrap().tolerance;
        let mut allocation = IndexMap::with_capacity(self.origins.len());
        for origin_id in self.origins.keys() {
            let mut row = IndexMap::with_capacity(self.destinations.len());
            for destination_id in self.destinations.keys() {
                let raw = values
                    .get(&route_id(origin_id, destination_id))
                    .copied()
                    .unwrap_or(0.0);
                row.insert(destination_id.clone(), suppress_noise(raw, tolerance));
            }
            allocation.insert(origin_id.clone(), row);
        }
        TransportSolution {
            allocation,
            total_cost: objective,
        }
    }
}

/// Id of the route variable for an (origin, destination) pair
fn route_id(origin: &str, destination: &str) -> String {
    format!("route_{}->{}", origin, destination)
}

/// Quantities at or below `tolerance` are solver noise and are recorded as
/// zero; anything larger is rounded to the nearest whole unit
fn suppress_noise(value: f64, tolerance: f64) -> u64 {
    if value <= tolerance {
        0
    } else {
        value.round() as u64
    }
}

/// How total supply compares against total demand
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SupplyDemandBalance {
    /// Total supply equals total demand
    Balanced,
    /// Total supply exceeds total demand; the surplus stays at the origins
    Surplus(f64),
    /// Total demand exceeds total supply; the shortfall cannot be served
    Deficit(f64),
}

impl Display for SupplyDemandBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplyDemandBalance::Balanced => write!(f, "supply and demand are balanced"),
            SupplyDemandBalance::Surplus(surplus) => {
                write!(f, "supply exceeds demand by {} units", surplus)
            }
            SupplyDemandBalance::Deficit(deficit) => {
                write!(f, "demand exceeds supply by {} units", deficit)
            }
        }
    }
}

/// Errors associated with defining a transportation problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Error when a supply entry does not match any cost matrix row
    #[error("Supply entry '{label}' does not correspond to any cost matrix row")]
    SupplyLabelMismatch { label: String },
    /// Error when a cost matrix row has no supply entry
    #[error("Cost matrix row '{label}' has no supply entry")]
    MissingSupply { label: String },
    /// Error when a demand entry does not match any cost matrix column
    #[error("Demand entry '{label}' does not correspond to any cost matrix column")]
    DemandLabelMismatch { label: String },
    /// Error when a cost matrix column has no demand entry
    #[error("Cost matrix column '{label}' has no demand entry")]
    MissingDemand { label: String },
    /// Error when the cost table has a row for an unknown origin
    #[error("Cost matrix row '{label}' does not correspond to any origin")]
    UnknownCostRow { label: String },
    /// Error when a cost table row has an entry for an unknown destination
    #[error("Cost matrix row '{origin}' has column '{label}' which does not correspond to any destination")]
    UnknownCostColumn { origin: String, label: String },
    /// Error when a route has no unit cost
    #[error("No unit cost given for the route from '{origin}' to '{destination}'")]
    MissingCost { origin: String, destination: String },
    /// Error when a route has a negative unit cost
    #[error("Route from '{origin}' to '{destination}' has negative unit cost {cost}")]
    NegativeCost {
        origin: String,
        destination: String,
        cost: f64,
    },
    /// Error when an origin has a negative supply
    #[error("Origin '{origin}' has negative supply {supply}")]
    NegativeSupply { origin: String, supply: f64 },
    /// Error when a destination has a negative demand
    #[error("Destination '{destination}' has negative demand {demand}")]
    NegativeDemand { destination: String, demand: f64 },
    /// Error when the optimization problem could not be assembled
    #[error(transparent)]
    Problem(#[from] ProblemError),
}
