//! Reference environment for exergy analysis.

use crate::error::{TcError, TcResult};
use crate::units::{Pressure, Temperature, k, pa};

/// Dead state (T₀, P₀) against which exergy is measured.
///
/// Fixed for one analysis run and passed explicitly to every exergy
/// computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadState {
    t0: Temperature,
    p0: Pressure,
}

impl DeadState {
    /// Ambient temperature used by the reference scenarios [K].
    pub const DEFAULT_T0_K: f64 = 300.0;
    /// Standard atmosphere [Pa].
    pub const DEFAULT_P0_PA: f64 = 101_325.0;

    /// Create a dead state, rejecting non-positive or non-finite values.
    pub fn new(t0: Temperature, p0: Pressure) -> TcResult<Self> {
        if !t0.value.is_finite() || t0.value <= 0.0 {
            return Err(TcError::InvalidArg {
                what: "dead-state temperature must be positive and finite",
            });
        }
        if !p0.value.is_finite() || p0.value <= 0.0 {
            return Err(TcError::InvalidArg {
                what: "dead-state pressure must be positive and finite",
            });
        }
        Ok(Self { t0, p0 })
    }

    pub fn t0(&self) -> Temperature {
        self.t0
    }

    pub fn p0(&self) -> Pressure {
        self.p0
    }
}

impl Default for DeadState {
    fn default() -> Self {
        Self {
            t0: k(Self::DEFAULT_T0_K),
            p0: pa(Self::DEFAULT_P0_PA),
        }
    }
}
