//! CoolProp-backed property service.

use crate::error::{FluidError, FluidResult};
use crate::property::Property;
use crate::service::PropertyService;
use crate::species::Species;
use crate::state::StateInput;
use rfluids::prelude::*;
use tracing::debug;

/// CoolProp backend for fluid properties.
///
/// Pure fluids only; the predefined refrigerant blends (R410A, R404A, R407C,
/// R507A) are reported as lookup failures.
///
/// Thread-safe: rfluids `Fluid` instances are created per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoolPropService;

impl CoolPropService {
    pub fn new() -> Self {
        Self
    }
}

fn rfluids_pure(species: Species) -> Option<Pure> {
    match species {
        Species::Water => Some(Pure::Water),
        Species::Air => Some(Pure::Air),
        Species::R134a => Some(Pure::R134a),
        Species::R22 => Some(Pure::R22),
        Species::R32 => Some(Pure::R32),
        Species::CO2 => Some(Pure::CarbonDioxide),
        Species::Ammonia => Some(Pure::Ammonia),
        Species::Propane => Some(Pure::nPropane),
        Species::NButane => Some(Pure::nButane),
        Species::Methane => Some(Pure::Methane),
        Species::Ethane => Some(Pure::Ethane),
        Species::N2 => Some(Pure::Nitrogen),
        Species::O2 => Some(Pure::Oxygen),
        Species::He => Some(Pure::Helium),
        Species::H2 => Some(Pure::Hydrogen),
        Species::Ar => Some(Pure::Argon),
        Species::R410A | Species::R404A | Species::R407C | Species::R507A => None,
    }
}

fn fluid_input(prop: Property, value: f64) -> FluidInput {
    match prop {
        Property::Temperature => FluidInput::temperature(value),
        Property::Pressure => FluidInput::pressure(value),
        Property::Enthalpy => FluidInput::enthalpy(value),
        Property::Entropy => FluidInput::entropy(value),
        Property::Density => FluidInput::density(value),
        Property::InternalEnergy => FluidInput::internal_energy(value),
        Property::Quality => FluidInput::quality(value),
    }
}

impl PropertyService for CoolPropService {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn query(&self, output: Property, input: StateInput, fluid: Species) -> FluidResult<f64> {
        input.validate()?;
        let pure = rfluids_pure(fluid).ok_or_else(|| {
            FluidError::lookup(output, input, fluid, "fluid not available in rfluids")
        })?;

        let (first, first_value) = input.first();
        let (second, second_value) = input.second();

        let mut state = Fluid::from(pure)
            .in_state(
                fluid_input(first, first_value),
                fluid_input(second, second_value),
            )
            .map_err(|e| {
                debug!(%fluid, %first, %second, error = %e, "CoolProp state rejected");
                FluidError::lookup(output, input, fluid, e.to_string())
            })?;

        let value = match output {
            Property::Temperature => state.temperature(),
            Property::Pressure => state.pressure(),
            Property::Enthalpy => state.enthalpy(),
            Property::Entropy => state.entropy(),
            Property::Density => state.density(),
            Property::InternalEnergy => state.internal_energy(),
            Property::Quality => state.quality(),
        };

        match value {
            Ok(v) => Ok(v),
            // Single-phase states have no quality; report the CoolProp sentinel.
            Err(_) if output == Property::Quality => Ok(-1.0),
            Err(e) => {
                debug!(%fluid, %output, error = %e, "CoolProp output unavailable");
                Err(FluidError::lookup(output, input, fluid, e.to_string()))
            }
        }
    }
}
