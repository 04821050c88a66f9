//! Adiabatic constant-pressure mixer.

use crate::common::{check_positive, entropy_of, lookup};
use crate::error::{ComponentError, ComponentResult};
use crate::stream::Stream;
use crate::traits::ExergyBalance;
use tc_core::DeadState;
use tc_core::units::{MassRate, Pressure, k};
use tc_fluids::{Property, PropertyService, StateInput};
use tracing::debug;

/// Two inlets, one outlet, no heat or work.
///
/// `h_out = (m1·h1 + m2·h2) / (m1 + m2)`; outlet temperature and entropy come
/// from `(H = h_out, P)`. Both inlets must carry the same fluid.
#[derive(Debug, Clone)]
pub struct Mixer {
    name: String,
    pub pressure: Pressure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixerOutcome {
    pub name: String,
    /// Inlets with their entropy resolved.
    pub inlets: [Stream; 2],
    pub outlet: Stream,
}

impl Mixer {
    pub fn new(name: impl Into<String>, pressure: Pressure) -> Self {
        Self {
            name: name.into(),
            pressure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compute(
        &self,
        service: &dyn PropertyService,
        first: &Stream,
        second: &Stream,
    ) -> ComponentResult<MixerOutcome> {
        first.validate()?;
        second.validate()?;
        check_positive(self.pressure.value, "mixer pressure")?;
        if first.fluid != second.fluid {
            return Err(ComponentError::InvalidArg {
                what: "mixer inlets must carry the same fluid",
            });
        }

        let m_out = first.mass_flow + second.mass_flow;
        if m_out.value == 0.0 {
            return Err(ComponentError::Degenerate {
                what: "mixer outlet mass flow is zero",
            });
        }
        let h_out = (first.mass_flow.value * first.enthalpy
            + second.mass_flow.value * second.enthalpy)
            / m_out.value;

        let fluid = first.fluid;
        let state = StateInput::hp(h_out, self.pressure);
        let t_out = lookup(
            service,
            Property::Temperature,
            state,
            fluid,
            "mixer outlet temperature",
        )?;
        let s_out = lookup(
            service,
            Property::Entropy,
            state,
            fluid,
            "mixer outlet entropy",
        )?;
        let mut outlet = Stream::from_hp(fluid, h_out, self.pressure, m_out)
            .with_temperature(k(t_out))
            .with_entropy(s_out);
        match service.query(Property::Quality, state, fluid) {
            Ok(q) => outlet = outlet.with_raw_quality(q),
            Err(e) => {
                debug!(component = %self.name, error = %e, "mixer outlet quality unavailable")
            }
        }

        let s1 = entropy_of(service, first)?;
        let s2 = entropy_of(service, second)?;

        Ok(MixerOutcome {
            name: self.name.clone(),
            inlets: [first.with_entropy(s1), second.with_entropy(s2)],
            outlet,
        })
    }
}

impl ExergyBalance for MixerOutcome {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_generation(&self, _dead_state: &DeadState) -> f64 {
        let s_in: f64 = self
            .inlets
            .iter()
            .map(|s| s.mass_flow.value * s.entropy.unwrap_or_default())
            .sum();
        self.outlet.mass_flow.value * self.outlet.entropy.unwrap_or_default() - s_in
    }

    fn mass_in(&self) -> MassRate {
        self.inlets[0].mass_flow + self.inlets[1].mass_flow
    }

    fn mass_out(&self) -> MassRate {
        self.outlet.mass_flow
    }
}
