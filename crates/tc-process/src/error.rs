//! Error types for process-level runs.

use tc_components::ComponentError;
use tc_core::{FailureKind, TcError};
use tc_fluids::FluidError;
use tc_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    /// A chain stage failed; the rest of the chain was not run.
    #[error("Stage '{component}' failed: {source}")]
    Stage {
        component: String,
        source: ComponentError,
    },

    #[error("Property lookup failed for {what}: {source}")]
    Lookup {
        what: &'static str,
        source: FluidError,
    },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Infeasible: {what}")]
    Infeasible { what: String },

    #[error("Degenerate input: {what}")]
    Degenerate { what: &'static str },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error(transparent)]
    Core(#[from] TcError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ProcessResult<T> = Result<T, ProcessError>;

impl ProcessError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProcessError::Stage { source, .. } => source.kind(),
            ProcessError::Lookup { source, .. } => source.kind(),
            ProcessError::Solver(e) => e.kind(),
            ProcessError::Infeasible { .. } => FailureKind::InfeasibleConfiguration,
            ProcessError::Degenerate { .. } => FailureKind::DegenerateInput,
            ProcessError::Core(e) => e.kind(),
            ProcessError::InvalidConfig { .. }
            | ProcessError::Io(_)
            | ProcessError::Yaml(_) => FailureKind::InvalidInput,
        }
    }

    /// Name of the failing chain stage, if any.
    pub fn component(&self) -> Option<&str> {
        match self {
            ProcessError::Stage { component, .. } => Some(component),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_component() {
        let err = ProcessError::Stage {
            component: "Mixer".into(),
            source: ComponentError::Degenerate {
                what: "mixer outlet mass flow is zero",
            },
        };
        assert_eq!(err.component(), Some("Mixer"));
        assert_eq!(err.kind(), FailureKind::DegenerateInput);
        assert!(err.to_string().contains("Stage 'Mixer' failed"));
    }
}
