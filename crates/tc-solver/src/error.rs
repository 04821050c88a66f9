//! Error types for solver operations.

use tc_core::{FailureKind, TcError};
use tc_fluids::{FluidError, Property};
use thiserror::Error;

/// Errors that can occur while solving for a property.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Lookup of {target} failed at {unknown}={guess}: {source}")]
    Lookup {
        target: Property,
        unknown: Property,
        guess: f64,
        source: FluidError,
    },

    #[error(
        "No convergence after {iterations} iterations: best {unknown}={value} gives {achieved}"
    )]
    NonConvergence {
        unknown: Property,
        value: f64,
        achieved: f64,
        iterations: usize,
    },

    #[error("Degenerate input: {what}")]
    Degenerate { what: &'static str },

    #[error("Invalid search bounds [{low}, {high}]: {what}")]
    InvalidBounds {
        low: f64,
        high: f64,
        what: &'static str,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Numeric(#[from] TcError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SolverError::Lookup { .. } => FailureKind::LookupFailure,
            SolverError::NonConvergence { .. } => FailureKind::NonConvergence,
            SolverError::Degenerate { .. } => FailureKind::DegenerateInput,
            SolverError::InvalidBounds { .. } | SolverError::InvalidArg { .. } => {
                FailureKind::InvalidInput
            }
            SolverError::Numeric(e) => e.kind(),
        }
    }
}
