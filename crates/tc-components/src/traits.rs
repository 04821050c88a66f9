//! Core traits for unit-operation outcomes.

use tc_core::DeadState;
use tc_core::units::{MassRate, Power, watts};

/// Second-law bookkeeping for a completed unit operation.
///
/// Exergy destruction follows Gouy-Stodola: `X_dest = T0 · S_gen`.
pub trait ExergyBalance {
    /// Component name for reports.
    fn name(&self) -> &str;

    /// Entropy generation rate [W/K].
    ///
    /// Takes the dead state because heat rejected to the ambient crosses the
    /// boundary at `T0`.
    fn entropy_generation(&self, dead_state: &DeadState) -> f64;

    /// Exergy destruction rate.
    fn exergy_destruction(&self, dead_state: &DeadState) -> Power {
        watts(dead_state.t0().value * self.entropy_generation(dead_state))
    }

    /// Total mass flow entering the operation.
    fn mass_in(&self) -> MassRate;

    /// Total mass flow leaving the operation.
    fn mass_out(&self) -> MassRate;
}
