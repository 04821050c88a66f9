//! Throttling valve: isenthalpic pressure letdown.

use crate::common::{check_positive, entropy_of, lookup};
use crate::error::ComponentResult;
use crate::stream::Stream;
use crate::traits::ExergyBalance;
use tc_core::DeadState;
use tc_core::units::{MassRate, Pressure, k};
use tc_fluids::{Property, PropertyService, StateInput};
use tracing::{debug, warn};

/// Adiabatic, no-work valve.
///
/// `h_out = h_in`. Outlet temperature, entropy and quality come from
/// `(H = h_in, P = P_out)`. An outlet pressure above the inlet pressure is
/// allowed but logged.
#[derive(Debug, Clone)]
pub struct Throttle {
    name: String,
    /// Downstream pressure
    pub outlet_pressure: Pressure,
}

/// Result of a throttle calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleOutcome {
    pub name: String,
    /// Inlet with its entropy resolved.
    pub inlet: Stream,
    pub outlet: Stream,
    /// Quality exactly as the backend reported it (may be a sentinel);
    /// `None` when the backend refused the query.
    pub raw_quality: Option<f64>,
}

impl Throttle {
    pub fn new(name: impl Into<String>, outlet_pressure: Pressure) -> Self {
        Self {
            name: name.into(),
            outlet_pressure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compute(
        &self,
        service: &dyn PropertyService,
        inlet: &Stream,
    ) -> ComponentResult<ThrottleOutcome> {
        inlet.validate()?;
        check_positive(self.outlet_pressure.value, "throttle outlet pressure")?;
        if self.outlet_pressure > inlet.pressure {
            warn!(
                component = %self.name,
                p_in = inlet.pressure.value,
                p_out = self.outlet_pressure.value,
                "throttle outlet pressure above inlet pressure"
            );
        }

        let s_in = entropy_of(service, inlet)?;
        let h = inlet.enthalpy;
        let state = StateInput::hp(h, self.outlet_pressure);
        let fluid = inlet.fluid;

        let t_out = lookup(
            service,
            Property::Temperature,
            state,
            fluid,
            "throttle outlet temperature",
        )?;
        let s_out = lookup(
            service,
            Property::Entropy,
            state,
            fluid,
            "throttle outlet entropy",
        )?;
        let raw_quality = match service.query(Property::Quality, state, fluid) {
            Ok(q) => Some(q),
            Err(e) => {
                debug!(component = %self.name, error = %e, "outlet quality unavailable");
                None
            }
        };

        let mut outlet = Stream::from_hp(fluid, h, self.outlet_pressure, inlet.mass_flow)
            .with_temperature(k(t_out))
            .with_entropy(s_out);
        if let Some(q) = raw_quality {
            outlet = outlet.with_raw_quality(q);
        }

        Ok(ThrottleOutcome {
            name: self.name.clone(),
            inlet: inlet.with_entropy(s_in),
            outlet,
            raw_quality,
        })
    }
}

impl ExergyBalance for ThrottleOutcome {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_generation(&self, _dead_state: &DeadState) -> f64 {
        let s_in = self.inlet.entropy.unwrap_or_default();
        let s_out = self.outlet.entropy.unwrap_or_default();
        self.inlet.mass_flow.value * (s_out - s_in)
    }

    fn mass_in(&self) -> MassRate {
        self.inlet.mass_flow
    }

    fn mass_out(&self) -> MassRate {
        self.outlet.mass_flow
    }
}
