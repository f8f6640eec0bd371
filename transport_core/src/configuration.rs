use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Solved route quantities at or below this value are recorded as zero
    pub tolerance: f64,
    pub solver: Solver,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            tolerance: 1e-3,
            solver: Solver::Microlp,
        }
    }
}

/// Enum used to specify the default solver to use
pub enum Solver {
    /// Use the microlp branch-and-bound simplex solver
    Microlp,
}
