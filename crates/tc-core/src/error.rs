use std::fmt;

use thiserror::Error;

pub type TcResult<T> = Result<T, TcError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TcError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Degenerate input: {what}")]
    Degenerate { what: &'static str },
}

impl TcError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TcError::NonFinite { .. } | TcError::InvalidArg { .. } => FailureKind::InvalidInput,
            TcError::Degenerate { .. } => FailureKind::DegenerateInput,
        }
    }
}

/// Coarse classification shared by every error type in the workspace.
///
/// Callers match on this instead of on crate-specific variants when they only
/// care about how to react (skip a branch, accept a degraded answer, abort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The property backend could not resolve a state.
    LookupFailure,
    /// An iterative search ran out of iterations.
    NonConvergence,
    /// A physical feasibility check rejected the configuration.
    InfeasibleConfiguration,
    /// A zero divisor (mass flow, ratio, target value) was detected up front.
    DegenerateInput,
    /// Malformed arguments: non-finite numbers, inverted bounds, fluid mismatch.
    InvalidInput,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::LookupFailure => "lookup failure",
            FailureKind::NonConvergence => "non-convergence",
            FailureKind::InfeasibleConfiguration => "infeasible configuration",
            FailureKind::DegenerateInput => "degenerate input",
            FailureKind::InvalidInput => "invalid input",
        };
        f.write_str(label)
    }
}
