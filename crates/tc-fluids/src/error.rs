//! Fluid property errors.

use crate::property::Property;
use crate::species::Species;
use crate::state::StateInput;
use tc_core::FailureKind;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during property lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical input values (negative pressure, quality above one, ...).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Fluid name not recognized.
    #[error("Unknown fluid '{name}'")]
    UnknownFluid { name: String },

    /// The backend could not resolve the requested state.
    #[error("Cannot evaluate {output} at {input} for {fluid}: {reason}")]
    Lookup {
        output: Property,
        input: StateInput,
        fluid: Species,
        reason: String,
    },
}

impl FluidError {
    pub fn lookup(
        output: Property,
        input: StateInput,
        fluid: Species,
        reason: impl Into<String>,
    ) -> Self {
        FluidError::Lookup {
            output,
            input,
            fluid,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FluidError::NonPhysical { .. } | FluidError::InvalidArg { .. } => {
                FailureKind::InvalidInput
            }
            FluidError::UnknownFluid { .. } | FluidError::Lookup { .. } => {
                FailureKind::LookupFailure
            }
        }
    }
}
