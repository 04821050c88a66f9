//! Error types for component operations.

use tc_core::FailureKind;
use tc_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during unit-operation calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Property lookup failed for {what}: {source}")]
    Lookup {
        what: &'static str,
        source: FluidError,
    },

    #[error("Infeasible: {what}")]
    Infeasible { what: String },

    #[error("Degenerate input: {what}")]
    Degenerate { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ComponentError::Lookup { source, .. } => source.kind(),
            ComponentError::Infeasible { .. } => FailureKind::InfeasibleConfiguration,
            ComponentError::Degenerate { .. } => FailureKind::DegenerateInput,
            ComponentError::NonPhysical { .. } | ComponentError::InvalidArg { .. } => {
                FailureKind::InvalidInput
            }
        }
    }
}
