//! Property vocabulary shared by lookups and the solver.

use std::fmt;
use std::str::FromStr;

/// Thermodynamic property code.
///
/// Codes follow the single-letter CoolProp convention (`T`, `P`, `H`, ...),
/// all values are mass-specific SI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Temperature [K]
    Temperature,
    /// Pressure [Pa]
    Pressure,
    /// Specific enthalpy [J/kg]
    Enthalpy,
    /// Specific entropy [J/(kg·K)]
    Entropy,
    /// Density [kg/m³]
    Density,
    /// Specific internal energy [J/kg]
    InternalEnergy,
    /// Vapor quality [-]
    Quality,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::Temperature,
        Property::Pressure,
        Property::Enthalpy,
        Property::Entropy,
        Property::Density,
        Property::InternalEnergy,
        Property::Quality,
    ];

    /// Short code as used on the command line and by CoolProp.
    pub fn code(self) -> &'static str {
        match self {
            Property::Temperature => "T",
            Property::Pressure => "P",
            Property::Enthalpy => "H",
            Property::Entropy => "S",
            Property::Density => "D",
            Property::InternalEnergy => "U",
            Property::Quality => "Q",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Property {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "T" | "TEMPERATURE" => Ok(Property::Temperature),
            "P" | "PRESSURE" => Ok(Property::Pressure),
            "H" | "HMASS" | "ENTHALPY" => Ok(Property::Enthalpy),
            "S" | "SMASS" | "ENTROPY" => Ok(Property::Entropy),
            "D" | "DMASS" | "DENSITY" => Ok(Property::Density),
            "U" | "UMASS" | "INTERNALENERGY" | "INTERNAL_ENERGY" => Ok(Property::InternalEnergy),
            "Q" | "QUALITY" => Ok(Property::Quality),
            other => Err(format!(
                "unknown property '{other}' (expected one of T, P, H, S, D, U, Q)"
            )),
        }
    }
}
