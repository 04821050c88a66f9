//! Input pairs that fix a thermodynamic state.

use std::fmt;

use crate::error::{FluidError, FluidResult};
use crate::property::Property;
use tc_core::units::{Density, Pressure, SpecEnergy, Temperature};

/// Two independent intensive properties that fix a state of a pure fluid.
///
/// Values are stored in SI base units. The pair keeps the caller's order so
/// messages echo what was asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateInput {
    first: (Property, f64),
    second: (Property, f64),
}

impl StateInput {
    pub fn new(first: Property, first_value: f64, second: Property, second_value: f64) -> Self {
        Self {
            first: (first, first_value),
            second: (second, second_value),
        }
    }

    /// Pressure and temperature.
    pub fn pt(p: Pressure, t: Temperature) -> Self {
        Self::new(Property::Pressure, p.value, Property::Temperature, t.value)
    }

    /// Specific enthalpy and pressure.
    pub fn hp(h: SpecEnergy, p: Pressure) -> Self {
        Self::new(Property::Enthalpy, h, Property::Pressure, p.value)
    }

    /// Pressure and vapor quality.
    pub fn pq(p: Pressure, q: f64) -> Self {
        Self::new(Property::Pressure, p.value, Property::Quality, q)
    }

    /// Temperature and vapor quality.
    pub fn tq(t: Temperature, q: f64) -> Self {
        Self::new(Property::Temperature, t.value, Property::Quality, q)
    }

    /// Specific internal energy and density.
    pub fn ud(u: SpecEnergy, rho: Density) -> Self {
        Self::new(Property::InternalEnergy, u, Property::Density, rho.value)
    }

    pub fn first(&self) -> (Property, f64) {
        self.first
    }

    pub fn second(&self) -> (Property, f64) {
        self.second
    }

    /// Value supplied for `prop`, if it is part of the pair.
    pub fn value_of(&self, prop: Property) -> Option<f64> {
        if self.first.0 == prop {
            Some(self.first.1)
        } else if self.second.0 == prop {
            Some(self.second.1)
        } else {
            None
        }
    }

    /// True when the pair consists of exactly `a` and `b`, in either order.
    pub fn is_pair(&self, a: Property, b: Property) -> bool {
        (self.first.0 == a && self.second.0 == b) || (self.first.0 == b && self.second.0 == a)
    }

    /// Check that the pair is usable before it reaches a backend.
    pub fn validate(&self) -> FluidResult<()> {
        if self.first.0 == self.second.0 {
            return Err(FluidError::InvalidArg {
                what: "state inputs must be two different properties",
            });
        }
        for (prop, value) in [self.first, self.second] {
            if !value.is_finite() {
                return Err(FluidError::InvalidArg {
                    what: "input values must be finite",
                });
            }
            match prop {
                Property::Pressure if value <= 0.0 => {
                    return Err(FluidError::NonPhysical {
                        what: "pressure must be positive",
                    });
                }
                Property::Temperature if value <= 0.0 => {
                    return Err(FluidError::NonPhysical {
                        what: "temperature must be positive",
                    });
                }
                Property::Density if value <= 0.0 => {
                    return Err(FluidError::NonPhysical {
                        what: "density must be positive",
                    });
                }
                Property::Quality if !(0.0..=1.0).contains(&value) => {
                    return Err(FluidError::NonPhysical {
                        what: "quality must lie in [0, 1]",
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for StateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}, {}={}",
            self.first.0, self.first.1, self.second.0, self.second.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::units::{k, pa};

    #[test]
    fn constructors_keep_order() {
        let input = StateInput::pt(pa(101_325.0), k(300.0));
        assert_eq!(input.first(), (Property::Pressure, 101_325.0));
        assert_eq!(input.second(), (Property::Temperature, 300.0));
        assert_eq!(input.to_string(), "P=101325, T=300");
    }

    #[test]
    fn pair_matching_ignores_order() {
        let input = StateInput::hp(250_000.0, pa(6.5e5));
        assert!(input.is_pair(Property::Pressure, Property::Enthalpy));
        assert_eq!(input.value_of(Property::Enthalpy), Some(250_000.0));
        assert_eq!(input.value_of(Property::Quality), None);
    }

    #[test]
    fn validation_rejects_bad_pairs() {
        assert!(StateInput::pt(pa(-1.0), k(300.0)).validate().is_err());
        assert!(StateInput::pt(pa(1.0e5), k(0.0)).validate().is_err());
        assert!(StateInput::pq(pa(1.0e5), 1.2).validate().is_err());
        assert!(StateInput::pq(pa(1.0e5), f64::NAN).validate().is_err());
        assert!(
            StateInput::new(Property::Pressure, 1.0, Property::Pressure, 2.0)
                .validate()
                .is_err()
        );
        assert!(StateInput::pq(pa(1.0e5), 0.0).validate().is_ok());
    }
}
