//! Heat exchanger driven to a target outlet temperature.

use crate::common::{check_positive, lookup};
use crate::error::{ComponentError, ComponentResult};
use crate::stream::Stream;
use crate::traits::ExergyBalance;
use tc_core::DeadState;
use tc_core::units::{MassRate, Power, Temperature, watts};
use tc_fluids::{Property, PropertyService, StateInput};
use tracing::debug;

/// Where the heat duty crosses the control-volume boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatBoundary {
    /// Exchange with the environment at the dead-state temperature.
    Ambient,
    /// Exchange with a thermal reservoir at a fixed temperature.
    Reservoir(Temperature),
}

impl HeatBoundary {
    pub fn temperature(&self, dead_state: &DeadState) -> Temperature {
        match self {
            HeatBoundary::Ambient => dead_state.t0(),
            HeatBoundary::Reservoir(t) => *t,
        }
    }
}

/// Isobaric heater or cooler.
///
/// The inlet must carry enthalpy and entropy from the upstream operation; the
/// exchanger does not resolve its own inlet state.
#[derive(Debug, Clone)]
pub struct HeatExchanger {
    name: String,
    pub target_temperature: Temperature,
    pub boundary: HeatBoundary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatExchangerOutcome {
    pub name: String,
    pub inlet: Stream,
    pub outlet: Stream,
    /// Positive when heat is added to the stream.
    pub heat_duty: Power,
    pub boundary: HeatBoundary,
}

impl HeatExchanger {
    pub fn new(
        name: impl Into<String>,
        target_temperature: Temperature,
        boundary: HeatBoundary,
    ) -> Self {
        Self {
            name: name.into(),
            target_temperature,
            boundary,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compute(
        &self,
        service: &dyn PropertyService,
        inlet: &Stream,
    ) -> ComponentResult<HeatExchangerOutcome> {
        inlet.validate()?;
        check_positive(self.target_temperature.value, "heat exchanger target temperature")?;
        if let HeatBoundary::Reservoir(t) = self.boundary {
            check_positive(t.value, "heat exchanger boundary temperature")?;
        }
        if inlet.entropy.is_none() {
            return Err(ComponentError::InvalidArg {
                what: "heat exchanger inlet must carry entropy",
            });
        }

        let state = StateInput::pt(inlet.pressure, self.target_temperature);
        let h_out = lookup(
            service,
            Property::Enthalpy,
            state,
            inlet.fluid,
            "heat exchanger outlet enthalpy",
        )?;
        let s_out = lookup(
            service,
            Property::Entropy,
            state,
            inlet.fluid,
            "heat exchanger outlet entropy",
        )?;
        let heat_duty = watts(inlet.mass_flow.value * (h_out - inlet.enthalpy));
        debug!(component = %self.name, q = heat_duty.value, "heat duty");

        let outlet = Stream::from_hp(inlet.fluid, h_out, inlet.pressure, inlet.mass_flow)
            .with_temperature(self.target_temperature)
            .with_entropy(s_out);

        Ok(HeatExchangerOutcome {
            name: self.name.clone(),
            inlet: *inlet,
            outlet,
            heat_duty,
            boundary: self.boundary,
        })
    }
}

impl ExergyBalance for HeatExchangerOutcome {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_generation(&self, dead_state: &DeadState) -> f64 {
        let s_in = self.inlet.entropy.unwrap_or_default();
        let s_out = self.outlet.entropy.unwrap_or_default();
        let t_b = self.boundary.temperature(dead_state).value;
        self.inlet.mass_flow.value * (s_out - s_in) - self.heat_duty.value / t_b
    }

    fn mass_in(&self) -> MassRate {
        self.inlet.mass_flow
    }

    fn mass_out(&self) -> MassRate {
        self.outlet.mass_flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::units::{k, kgps, pa};
    use tc_fluids::{SimpleTwoPhaseModel, Species};

    fn saturated_vapor(model: &SimpleTwoPhaseModel) -> Stream {
        let p = pa(6.5e5);
        let state = StateInput::pq(p, 1.0);
        let h = model.query(Property::Enthalpy, state, Species::Propane).unwrap();
        let s = model.query(Property::Entropy, state, Species::Propane).unwrap();
        Stream::from_hp(Species::Propane, h, p, kgps(0.4)).with_entropy(s)
    }

    #[test]
    fn heating_sign_convention() {
        let model = SimpleTwoPhaseModel::with_presets();
        let inlet = saturated_vapor(&model);
        let hx = HeatExchanger::new("superheater", k(345.0), HeatBoundary::Reservoir(k(450.0)));
        let out = hx.compute(&model, &inlet).unwrap();
        assert!(out.heat_duty.value > 0.0);
        assert_eq!(out.mass_in(), out.mass_out());
        assert_eq!(out.outlet.pressure, inlet.pressure);
        assert!(out.exergy_destruction(&DeadState::default()).value > 0.0);
    }

    #[test]
    fn ambient_boundary_uses_dead_state() {
        let dead = DeadState::default();
        assert_eq!(HeatBoundary::Ambient.temperature(&dead), dead.t0());
        assert_eq!(HeatBoundary::Reservoir(k(450.0)).temperature(&dead), k(450.0));
    }

    #[test]
    fn cooling_to_ambient_destroys_exergy() {
        let model = SimpleTwoPhaseModel::with_presets();
        let inlet = Stream::from_pt(&model, Species::N2, pa(1.5e5), k(420.0), kgps(0.2)).unwrap();
        let hx = HeatExchanger::new("aftercooler", k(310.0), HeatBoundary::Ambient);
        let out = hx.compute(&model, &inlet).unwrap();
        assert!(out.heat_duty.value < 0.0);
        assert!(out.exergy_destruction(&DeadState::default()).value > 0.0);
    }

    #[test]
    fn missing_inlet_entropy_is_rejected() {
        let model = SimpleTwoPhaseModel::with_presets();
        let inlet = Stream::from_hp(Species::Propane, 5.0e5, pa(6.5e5), kgps(1.0));
        let hx = HeatExchanger::new("hx", k(345.0), HeatBoundary::Ambient);
        assert!(matches!(
            hx.compute(&model, &inlet),
            Err(ComponentError::InvalidArg { .. })
        ));
    }
}
