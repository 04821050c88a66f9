//! Solver results.

use crate::error::{SolverError, SolverResult};
use tc_fluids::Property;

/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Relative error on the target fell below the tolerance.
    Converged,
    /// Iteration budget exhausted; the value is the best midpoint.
    MaxIterations,
}

/// The result of a property solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySolution {
    /// Value of the unknown property.
    pub value: f64,
    /// Target property value achieved at `value`.
    pub achieved: f64,
    /// Lookups spent, endpoint probes included.
    pub iterations: usize,
    pub status: Status,
}

impl PropertySolution {
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }

    /// Escalate a non-converged result into an error.
    pub fn into_converged(self, unknown: Property) -> SolverResult<Self> {
        match self.status {
            Status::Converged => Ok(self),
            Status::MaxIterations => Err(SolverError::NonConvergence {
                unknown,
                value: self.value,
                achieved: self.achieved,
                iterations: self.iterations,
            }),
        }
    }
}
