//! Flowing fluid state.

use crate::common::{check_finite, check_positive, lookup, two_phase_quality};
use crate::error::{ComponentError, ComponentResult};
use tc_core::units::{MassRate, Pressure, SpecEnergy, SpecEntropy, Temperature};
use tc_fluids::{Property, PropertyService, Species, StateInput};

/// Thermodynamic state and mass flow at one point of a process.
///
/// The state is fixed by pressure and enthalpy; temperature, entropy and
/// quality are carried when known so downstream operations do not repeat
/// lookups. `quality` is `Some` only inside the two-phase region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stream {
    pub fluid: Species,
    pub pressure: Pressure,
    pub temperature: Option<Temperature>,
    pub enthalpy: SpecEnergy,
    pub entropy: Option<SpecEntropy>,
    pub mass_flow: MassRate,
    pub quality: Option<f64>,
}

impl Stream {
    /// Bare stream from `(h, P)` and mass flow; no lookups.
    pub fn from_hp(
        fluid: Species,
        enthalpy: SpecEnergy,
        pressure: Pressure,
        mass_flow: MassRate,
    ) -> Self {
        Self {
            fluid,
            pressure,
            temperature: None,
            enthalpy,
            entropy: None,
            mass_flow,
            quality: None,
        }
    }

    /// Resolve a stream from pressure and temperature.
    pub fn from_pt(
        service: &dyn PropertyService,
        fluid: Species,
        pressure: Pressure,
        temperature: Temperature,
        mass_flow: MassRate,
    ) -> ComponentResult<Self> {
        check_positive(pressure.value, "stream pressure")?;
        check_positive(temperature.value, "stream temperature")?;
        let input = StateInput::pt(pressure, temperature);
        let enthalpy = lookup(service, Property::Enthalpy, input, fluid, "stream enthalpy")?;
        let entropy = lookup(service, Property::Entropy, input, fluid, "stream entropy")?;

        let stream = Self {
            fluid,
            pressure,
            temperature: Some(temperature),
            enthalpy,
            entropy: Some(entropy),
            mass_flow,
            quality: None,
        };
        stream.validate()?;
        Ok(stream)
    }

    pub fn with_entropy(mut self, entropy: SpecEntropy) -> Self {
        self.entropy = Some(entropy);
        self
    }

    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Store a raw backend quality, keeping it only inside the dome.
    pub fn with_raw_quality(mut self, raw: f64) -> Self {
        self.quality = two_phase_quality(raw);
        self
    }

    pub fn validate(&self) -> ComponentResult<()> {
        check_positive(self.pressure.value, "stream pressure")?;
        check_finite(self.enthalpy, "stream enthalpy")?;
        check_finite(self.mass_flow.value, "stream mass flow")?;
        if self.mass_flow.value < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "stream mass flow",
            });
        }
        if let Some(t) = self.temperature {
            check_positive(t.value, "stream temperature")?;
        }
        if let Some(s) = self.entropy {
            check_finite(s, "stream entropy")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::units::{k, kgps, pa};
    use tc_fluids::SimpleTwoPhaseModel;

    #[test]
    fn from_pt_populates_state() {
        let model = SimpleTwoPhaseModel::with_presets();
        let s = Stream::from_pt(&model, Species::Propane, pa(2.5e6), k(330.0), kgps(1.5)).unwrap();
        assert!(s.entropy.is_some());
        assert_eq!(s.temperature, Some(k(330.0)));
        assert_eq!(s.quality, None);
    }

    #[test]
    fn negative_mass_flow_rejected() {
        let s = Stream::from_hp(Species::Water, 1.0e5, pa(1.0e5), kgps(-1.0));
        assert!(s.validate().is_err());
    }

    #[test]
    fn quality_outside_dome_is_none() {
        let s = Stream::from_hp(Species::Water, 1.0e5, pa(1.0e5), kgps(1.0));
        assert_eq!(s.with_raw_quality(-1.0).quality, None);
        assert_eq!(s.with_raw_quality(0.4).quality, Some(0.4));
    }
}
