//! Solver problem definition.

use crate::error::{SolverError, SolverResult};
use tc_fluids::{Property, Species};

/// What to do when a lookup fails in the middle of a bisection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Move the bracket toward the side indicated by the last successful
    /// evaluation and keep going. A failure before any midpoint succeeded is
    /// still fatal. This can bias the bracket away from the root.
    #[default]
    BestEffort,
    /// Any midpoint lookup failure aborts the solve.
    FailFast,
}

/// One property inversion request.
///
/// Consumed by a single call to [`solve`](crate::solve).
#[derive(Debug, Clone, PartialEq)]
pub struct SolverProblem {
    pub fluid: Species,
    pub target: Property,
    pub target_value: f64,
    pub known: Property,
    pub known_value: f64,
    pub unknown: Property,
    pub low: f64,
    pub high: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub recovery: RecoveryPolicy,
}

impl SolverProblem {
    pub const DEFAULT_TOLERANCE: f64 = 1e-3;
    pub const DEFAULT_MAX_ITERATIONS: usize = 50;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fluid: Species,
        target: Property,
        target_value: f64,
        known: Property,
        known_value: f64,
        unknown: Property,
        low: f64,
        high: f64,
    ) -> Self {
        Self {
            fluid,
            target,
            target_value,
            known,
            known_value,
            unknown,
            low,
            high,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            recovery: RecoveryPolicy::default(),
        }
    }

    /// Relative tolerance on the target property.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    /// Reject problems the bisection cannot run on, before any lookup.
    pub fn validate(&self) -> SolverResult<()> {
        if !self.target_value.is_finite() || !self.known_value.is_finite() {
            return Err(SolverError::InvalidArg {
                what: "target and known values must be finite",
            });
        }
        if self.target_value == 0.0 {
            return Err(SolverError::Degenerate {
                what: "target value of zero has no relative error scale",
            });
        }
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(SolverError::InvalidBounds {
                low: self.low,
                high: self.high,
                what: "bounds must be finite",
            });
        }
        if self.low >= self.high {
            return Err(SolverError::InvalidBounds {
                low: self.low,
                high: self.high,
                what: "lower bound must be below upper bound",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidArg {
                what: "tolerance must be positive",
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidArg {
                what: "max_iterations must be at least 1",
            });
        }
        if self.known == self.unknown {
            return Err(SolverError::InvalidArg {
                what: "known and unknown properties must differ",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::FailureKind;

    fn problem() -> SolverProblem {
        SolverProblem::new(
            Species::Water,
            Property::Enthalpy,
            2.7e6,
            Property::Pressure,
            101_325.0,
            Property::Temperature,
            300.0,
            500.0,
        )
    }

    #[test]
    fn defaults() {
        let p = problem();
        assert_eq!(p.tolerance, 1e-3);
        assert_eq!(p.max_iterations, 50);
        assert_eq!(p.recovery, RecoveryPolicy::BestEffort);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_target_is_degenerate() {
        let mut p = problem();
        p.target_value = 0.0;
        let err = p.validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::DegenerateInput);
    }

    #[test]
    fn inverted_or_open_bounds_are_rejected() {
        let mut p = problem();
        p.low = 600.0;
        assert!(matches!(
            p.validate(),
            Err(SolverError::InvalidBounds { .. })
        ));

        let mut p = problem();
        p.high = f64::INFINITY;
        assert!(matches!(
            p.validate(),
            Err(SolverError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn builder_validation() {
        assert!(problem().with_tolerance(0.0).validate().is_err());
        assert!(problem().with_max_iterations(0).validate().is_err());
        assert!(
            problem()
                .with_recovery(RecoveryPolicy::FailFast)
                .with_max_iterations(3)
                .validate()
                .is_ok()
        );
    }
}
