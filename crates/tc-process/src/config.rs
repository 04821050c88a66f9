//! YAML scenario files.
//!
//! Each scenario has a `Default` reproducing the reference case, validates
//! itself on load and builds the runtime type it describes. Quantities are
//! stored in SI with the unit in the field name.

use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chain::FlashChain;
use crate::counterflow::{CounterflowExchanger, StreamSide};
use crate::error::{ProcessError, ProcessResult};
use crate::tank::{DEFAULT_INTERVALS, FillingTank, MassFlowSchedule};
use tc_components::HeatBoundary;
use tc_core::DeadState;
use tc_core::units::{delta_k, k, kgps, m3, pa, s};
use tc_fluids::Species;

/// A scenario that can be loaded from YAML.
pub trait Scenario: Serialize + DeserializeOwned {
    fn validate(&self) -> ProcessResult<()>;
}

pub fn load_scenario<T: Scenario>(path: &Path) -> ProcessResult<T> {
    let content = std::fs::read_to_string(path)?;
    parse_scenario(&content)
}

pub fn parse_scenario<T: Scenario>(content: &str) -> ProcessResult<T> {
    let scenario: T = serde_yaml::from_str(content)?;
    scenario.validate()?;
    Ok(scenario)
}

pub fn save_scenario<T: Scenario>(path: &Path, scenario: &T) -> ProcessResult<()> {
    scenario.validate()?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn species(name: &str) -> ProcessResult<Species> {
    Species::from_str(name).map_err(|e| ProcessError::InvalidConfig {
        what: format!("{e}; known fluids: {}", Species::common_names()),
    })
}

fn positive(field: &str, value: f64) -> ProcessResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProcessError::InvalidConfig {
            what: format!("{field} must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &str, value: f64) -> ProcessResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProcessError::InvalidConfig {
            what: format!("{field} must be non-negative, got {value}"),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DeadStateDef {
    pub t0_k: f64,
    pub p0_pa: f64,
}

impl Default for DeadStateDef {
    fn default() -> Self {
        Self {
            t0_k: DeadState::DEFAULT_T0_K,
            p0_pa: DeadState::DEFAULT_P0_PA,
        }
    }
}

impl DeadStateDef {
    pub fn build(&self) -> ProcessResult<DeadState> {
        Ok(DeadState::new(k(self.t0_k), pa(self.p0_pa))?)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StateDef {
    pub pressure_pa: f64,
    pub temperature_k: f64,
}

impl StateDef {
    fn validate(&self, context: &str) -> ProcessResult<()> {
        positive(&format!("{context} pressure_pa"), self.pressure_pa)?;
        positive(&format!("{context} temperature_k"), self.temperature_k)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryDef {
    Ambient,
    Reservoir { temperature_k: f64 },
}

impl BoundaryDef {
    fn build(&self) -> HeatBoundary {
        match *self {
            BoundaryDef::Ambient => HeatBoundary::Ambient,
            BoundaryDef::Reservoir { temperature_k } => HeatBoundary::Reservoir(k(temperature_k)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExchangerDef {
    pub target_temperature_k: f64,
    pub boundary: BoundaryDef,
}

impl ExchangerDef {
    fn validate(&self, context: &str) -> ProcessResult<()> {
        positive(&format!("{context} target_temperature_k"), self.target_temperature_k)?;
        if let BoundaryDef::Reservoir { temperature_k } = self.boundary {
            positive(&format!("{context} reservoir temperature_k"), temperature_k)?;
        }
        Ok(())
    }
}

/// Throttle, flash drum, per-phase exchangers and mixer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainConfig {
    pub fluid: String,
    pub inlet: StateDef,
    pub flash_pressure_pa: f64,
    pub mass_flow_kgps: f64,
    pub vapor_exchanger: ExchangerDef,
    pub liquid_heater: ExchangerDef,
    #[serde(default)]
    pub dead_state: DeadStateDef,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            fluid: "Propane".into(),
            inlet: StateDef {
                pressure_pa: 2.5e6,
                temperature_k: 330.0,
            },
            flash_pressure_pa: 6.5e5,
            mass_flow_kgps: 1.5,
            vapor_exchanger: ExchangerDef {
                target_temperature_k: 305.0,
                boundary: BoundaryDef::Ambient,
            },
            liquid_heater: ExchangerDef {
                target_temperature_k: 345.0,
                boundary: BoundaryDef::Reservoir {
                    temperature_k: 450.0,
                },
            },
            dead_state: DeadStateDef::default(),
        }
    }
}

impl Scenario for ChainConfig {
    fn validate(&self) -> ProcessResult<()> {
        species(&self.fluid)?;
        self.inlet.validate("inlet")?;
        positive("flash_pressure_pa", self.flash_pressure_pa)?;
        non_negative("mass_flow_kgps", self.mass_flow_kgps)?;
        self.vapor_exchanger.validate("vapor_exchanger")?;
        self.liquid_heater.validate("liquid_heater")?;
        self.dead_state.build()?;
        Ok(())
    }
}

impl ChainConfig {
    pub fn build(&self) -> ProcessResult<FlashChain> {
        self.validate()?;
        Ok(FlashChain {
            fluid: species(&self.fluid)?,
            inlet_pressure: pa(self.inlet.pressure_pa),
            inlet_temperature: k(self.inlet.temperature_k),
            flash_pressure: pa(self.flash_pressure_pa),
            mass_flow: kgps(self.mass_flow_kgps),
            vapor_target: k(self.vapor_exchanger.target_temperature_k),
            vapor_boundary: self.vapor_exchanger.boundary.build(),
            liquid_target: k(self.liquid_heater.target_temperature_k),
            liquid_boundary: self.liquid_heater.boundary.build(),
            dead_state: self.dead_state.build()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamSideDef {
    pub fluid: String,
    pub pressure_pa: f64,
    pub inlet_temperature_k: f64,
    pub mass_flow_kgps: f64,
}

impl StreamSideDef {
    fn validate(&self, context: &str) -> ProcessResult<()> {
        species(&self.fluid)?;
        positive(&format!("{context} pressure_pa"), self.pressure_pa)?;
        positive(&format!("{context} inlet_temperature_k"), self.inlet_temperature_k)?;
        non_negative(&format!("{context} mass_flow_kgps"), self.mass_flow_kgps)
    }

    fn build(&self) -> ProcessResult<StreamSide> {
        Ok(StreamSide {
            fluid: species(&self.fluid)?,
            pressure: pa(self.pressure_pa),
            inlet_temperature: k(self.inlet_temperature_k),
            mass_flow: kgps(self.mass_flow_kgps),
        })
    }
}

/// Two-stream counterflow exchanger with a minimum approach.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CounterflowConfig {
    pub hot: StreamSideDef,
    pub cold: StreamSideDef,
    pub dt_min_k: f64,
    #[serde(default)]
    pub dead_state: DeadStateDef,
    /// `[low, high]` bracket for the bisection fallback of `T(H, P)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inversion_bounds_k: Option<[f64; 2]>,
}

impl Default for CounterflowConfig {
    fn default() -> Self {
        Self {
            hot: StreamSideDef {
                fluid: "CO2".into(),
                pressure_pa: 12.0e6,
                inlet_temperature_k: 720.0,
                mass_flow_kgps: 2.0,
            },
            cold: StreamSideDef {
                fluid: "Water".into(),
                pressure_pa: 10.0e6,
                inlet_temperature_k: 310.0,
                mass_flow_kgps: 1.2,
            },
            dt_min_k: 12.0,
            dead_state: DeadStateDef::default(),
            inversion_bounds_k: None,
        }
    }
}

impl Scenario for CounterflowConfig {
    fn validate(&self) -> ProcessResult<()> {
        self.hot.validate("hot")?;
        self.cold.validate("cold")?;
        non_negative("dt_min_k", self.dt_min_k)?;
        if let Some([low, high]) = self.inversion_bounds_k {
            positive("inversion_bounds_k low", low)?;
            if !(high.is_finite() && high > low) {
                return Err(ProcessError::InvalidConfig {
                    what: format!(
                        "inversion_bounds_k [{low}, {high}] is not an increasing bracket"
                    ),
                });
            }
        }
        self.dead_state.build()?;
        Ok(())
    }
}

impl CounterflowConfig {
    pub fn build(&self) -> ProcessResult<CounterflowExchanger> {
        self.validate()?;
        Ok(CounterflowExchanger {
            hot: self.hot.build()?,
            cold: self.cold.build()?,
            dt_min: delta_k(self.dt_min_k),
            dead_state: self.dead_state.build()?,
            inversion_bounds: self.inversion_bounds_k.map(|[low, high]| (k(low), k(high))),
        })
    }
}

fn default_intervals() -> usize {
    DEFAULT_INTERVALS
}

/// Rigid insulated tank filled from a supply line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankConfig {
    pub fluid: String,
    pub volume_m3: f64,
    pub initial: StateDef,
    pub supply: StateDef,
    pub fill_time_s: f64,
    pub schedule: MassFlowSchedule,
    #[serde(default = "default_intervals")]
    pub intervals: usize,
    #[serde(default)]
    pub dead_state: DeadStateDef,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            fluid: "Nitrogen".into(),
            volume_m3: 0.8,
            initial: StateDef {
                pressure_pa: 150.0e3,
                temperature_k: 310.0,
            },
            supply: StateDef {
                pressure_pa: 1.8e6,
                temperature_k: 420.0,
            },
            fill_time_s: 600.0,
            schedule: MassFlowSchedule::Linear {
                initial_kgps: 0.02,
                final_kgps: 0.0,
            },
            intervals: DEFAULT_INTERVALS,
            dead_state: DeadStateDef::default(),
        }
    }
}

impl Scenario for TankConfig {
    fn validate(&self) -> ProcessResult<()> {
        self.build_unchecked()?.validate()?;
        if self.intervals == 0 {
            return Err(ProcessError::InvalidConfig {
                what: "intervals must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl TankConfig {
    pub fn build(&self) -> ProcessResult<FillingTank> {
        self.validate()?;
        self.build_unchecked()
    }

    fn build_unchecked(&self) -> ProcessResult<FillingTank> {
        Ok(FillingTank {
            fluid: species(&self.fluid)?,
            volume: m3(self.volume_m3),
            initial_pressure: pa(self.initial.pressure_pa),
            initial_temperature: k(self.initial.temperature_k),
            supply_pressure: pa(self.supply.pressure_pa),
            supply_temperature: k(self.supply.temperature_k),
            fill_time: s(self.fill_time_s),
            schedule: self.schedule,
            intervals: self.intervals,
            dead_state: self.dead_state.build()?,
        })
    }
}
