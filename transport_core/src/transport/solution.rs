//! Structs representing the outcome of solving a transportation problem
use indexmap::IndexMap;

use crate::optimize::OptimizationStatus;

/// An optimal shipment plan
///
/// The allocation is row-major by origin id, with one entry per
/// (origin, destination) route, in the insertion order of the model that
/// produced it. Quantities are whole units; solver noise at or below the
/// configured tolerance has already been suppressed to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportSolution {
    /// Units shipped on every route, keyed by origin id then destination id
    pub allocation: IndexMap<String, IndexMap<String, u64>>,
    /// Minimum total shipping cost, as reported by the solver
    pub total_cost: f64,
}

impl TransportSolution {
    /// A solution with no routes and zero cost, for models with nothing to ship
    pub(crate) fn empty() -> Self {
        TransportSolution {
            allocation: IndexMap::new(),
            total_cost: 0.0,
        }
    }

    /// Units shipped from `origin` to `destination`, 0 for unknown labels
    pub fn route(&self, origin: &str, destination: &str) -> u64 {
        self.allocation
            .get(origin)
            .and_then(|row| row.get(destination))
            .copied()
            .unwrap_or(0)
    }

    /// Total units shipped out of `origin`
    pub fn shipped_from(&self, origin: &str) -> u64 {
        self.allocation
            .get(origin)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Total units delivered to `destination`
    pub fn delivered_to(&self, destination: &str) -> u64 {
        self.allocation
            .values()
            .filter_map(|row| row.get(destination))
            .sum()
    }
}

/// The outcome of a solve attempt
///
/// Exactly one of three things happens: the solver proves optimality, the
/// solver finishes without an optimum (infeasible, unbounded, or not
/// solved), or the solving routine itself faults. Only the first carries a
/// shipment plan; there are no partial results.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportOutcome {
    /// The problem was solved to optimality
    Optimal(TransportSolution),
    /// The solver finished without an optimal solution
    NotSolved(OptimizationStatus),
    /// The solving routine failed with an internal fault
    SolverFault(String),
}

impl TransportOutcome {
    /// Whether the outcome carries an optimal solution
    pub fn is_optimal(&self) -> bool {
        matches!(self, TransportOutcome::Optimal(_))
    }

    /// Lower the outcome into an (allocation, minimum cost) pair
    ///
    /// Every non-optimal arm maps to `(None, None)`.
    pub fn into_pair(
        self,
    ) -> (
        Option<IndexMap<String, IndexMap<String, u64>>>,
        Option<f64>,
    ) {
        match self {
            TransportOutcome::Optimal(solution) => {
                (Some(solution.allocation), Some(solution.total_cost))
            }
            TransportOutcome::NotSolved(_) | TransportOutcome::SolverFault(_) => (None, None),
        }
    }
}
