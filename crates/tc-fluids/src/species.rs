//! Fluid identities.

use std::fmt;

use crate::error::FluidError;

/// Pure and pseudo-pure working fluids known to thermochain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Water (H₂O)
    Water,
    /// Air (pseudo-pure)
    Air,
    /// Refrigerant R134a
    R134a,
    /// Refrigerant blend R410A (pseudo-pure)
    R410A,
    /// Refrigerant R22
    R22,
    /// Refrigerant R32
    R32,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Ammonia (NH₃)
    Ammonia,
    /// Propane
    Propane,
    /// n-Butane
    NButane,
    /// Methane (CH₄)
    Methane,
    /// Ethane
    Ethane,
    /// Nitrogen (N₂)
    N2,
    /// Oxygen (O₂)
    O2,
    /// Helium (He)
    He,
    /// Hydrogen (H₂)
    H2,
    /// Argon (Ar)
    Ar,
    /// Refrigerant blend R404A (pseudo-pure)
    R404A,
    /// Refrigerant blend R407C (pseudo-pure)
    R407C,
    /// Refrigerant blend R507A (pseudo-pure)
    R507A,
}

impl Species {
    /// Fluids listed to the user when a name is not recognized.
    pub const COMMON: [Species; 20] = [
        Species::Water,
        Species::Air,
        Species::R134a,
        Species::R410A,
        Species::R22,
        Species::R32,
        Species::CO2,
        Species::Ammonia,
        Species::Propane,
        Species::NButane,
        Species::Methane,
        Species::Ethane,
        Species::N2,
        Species::O2,
        Species::He,
        Species::H2,
        Species::Ar,
        Species::R404A,
        Species::R407C,
        Species::R507A,
    ];

    /// Canonical short key, accepted back by `FromStr`.
    pub fn key(&self) -> &'static str {
        match self {
            Species::Water => "Water",
            Species::Air => "Air",
            Species::R134a => "R134a",
            Species::R410A => "R410A",
            Species::R22 => "R22",
            Species::R32 => "R32",
            Species::CO2 => "CO2",
            Species::Ammonia => "Ammonia",
            Species::Propane => "Propane",
            Species::NButane => "Butane",
            Species::Methane => "Methane",
            Species::Ethane => "Ethane",
            Species::N2 => "Nitrogen",
            Species::O2 => "Oxygen",
            Species::He => "Helium",
            Species::H2 => "Hydrogen",
            Species::Ar => "Argon",
            Species::R404A => "R404A",
            Species::R407C => "R407C",
            Species::R507A => "R507A",
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Species::CO2 => "Carbon Dioxide",
            Species::NButane => "n-Butane",
            other => other.key(),
        }
    }

    /// Comma separated list of the common fluid keys.
    pub fn common_names() -> String {
        Self::COMMON
            .iter()
            .map(|s| s.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Species {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WATER" | "H2O" => Ok(Species::Water),
            "AIR" => Ok(Species::Air),
            "R134A" => Ok(Species::R134a),
            "R410A" => Ok(Species::R410A),
            "R22" => Ok(Species::R22),
            "R32" => Ok(Species::R32),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "AMMONIA" | "NH3" => Ok(Species::Ammonia),
            "PROPANE" | "N-PROPANE" | "C3H8" => Ok(Species::Propane),
            "BUTANE" | "N-BUTANE" | "NBUTANE" => Ok(Species::NButane),
            "METHANE" | "CH4" => Ok(Species::Methane),
            "ETHANE" => Ok(Species::Ethane),
            "NITROGEN" | "N2" => Ok(Species::N2),
            "OXYGEN" | "O2" => Ok(Species::O2),
            "HELIUM" | "HE" => Ok(Species::He),
            "HYDROGEN" | "H2" => Ok(Species::H2),
            "ARGON" | "AR" => Ok(Species::Ar),
            "R404A" => Ok(Species::R404A),
            "R407C" => Ok(Species::R407C),
            "R507A" => Ok(Species::R507A),
            _ => Err(FluidError::UnknownFluid {
                name: s.trim().to_string(),
            }),
        }
    }
}
