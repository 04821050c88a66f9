//! Rigid, insulated vessel charged from a supply line.
//!
//! No work and no heat cross the boundary, so the energy balance reduces to
//! `m_f u_f = m_i u_i + h_in Δm`. The added mass is the integral of the
//! mass-flow schedule over the fill time.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessError, ProcessResult};
use crate::integrate::simpson;
use tc_core::DeadState;
use tc_core::units::{Density, Mass, Pressure, Temperature, Time, Volume, k, kg, kg_per_m3, pa};
use tc_fluids::{Property, PropertyService, Species, StateInput};
use tracing::{debug, info, warn};

pub const DEFAULT_INTERVALS: usize = 100;

/// Supply mass flow as a function of time since the valve opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MassFlowSchedule {
    /// Straight line from `initial_kgps` at t = 0 to `final_kgps` at the end
    /// of the fill.
    Linear { initial_kgps: f64, final_kgps: f64 },
}

impl MassFlowSchedule {
    /// Mass flow [kg/s] at `t` seconds into a fill lasting `duration` seconds.
    pub fn rate(&self, t: f64, duration: f64) -> f64 {
        match *self {
            MassFlowSchedule::Linear {
                initial_kgps,
                final_kgps,
            } => initial_kgps + (final_kgps - initial_kgps) * t / duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillingTank {
    pub fluid: Species,
    pub volume: Volume,
    pub initial_pressure: Pressure,
    pub initial_temperature: Temperature,
    pub supply_pressure: Pressure,
    pub supply_temperature: Temperature,
    pub fill_time: Time,
    pub schedule: MassFlowSchedule,
    /// Simpson intervals for the mass integral.
    pub intervals: usize,
    pub dead_state: DeadState,
}

/// Contents of the vessel at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankState {
    pub pressure: Pressure,
    pub temperature: Temperature,
    pub mass: Mass,
    pub density: Density,
    /// Specific internal energy [J/kg].
    pub internal_energy: f64,
    /// Specific entropy [J/(kg·K)].
    pub entropy: f64,
    /// Non-flow exergy of the contents [J].
    pub stored_exergy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankReport {
    pub initial: TankState,
    pub final_state: TankState,
    pub mass_added: Mass,
    /// Supply enthalpy [J/kg].
    pub inlet_enthalpy: f64,
    /// Supply flow exergy [J/kg].
    pub inlet_flow_exergy: f64,
    /// `ψ_in Δm - (Ξ_f - Ξ_i)` [J].
    pub exergy_destroyed: f64,
}

/// Dead-state properties used by every exergy term.
struct Reference {
    u: f64,
    v: f64,
    h: f64,
    s: f64,
}

impl FillingTank {
    pub fn validate(&self) -> ProcessResult<()> {
        let positive = [
            ("tank volume", self.volume.value),
            ("initial pressure", self.initial_pressure.value),
            ("initial temperature", self.initial_temperature.value),
            ("supply pressure", self.supply_pressure.value),
            ("supply temperature", self.supply_temperature.value),
            ("fill time", self.fill_time.value),
        ];
        for (what, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProcessError::InvalidConfig {
                    what: format!("{what} must be positive, got {value}"),
                });
            }
        }
        let MassFlowSchedule::Linear {
            initial_kgps,
            final_kgps,
        } = self.schedule;
        if !initial_kgps.is_finite() || !final_kgps.is_finite() {
            return Err(ProcessError::InvalidConfig {
                what: "mass-flow schedule must be finite".into(),
            });
        }
        Ok(())
    }

    /// Integral of the schedule over the fill time [kg].
    pub fn mass_added(&self) -> ProcessResult<Mass> {
        let duration = self.fill_time.value;
        let dm = simpson(
            |t| self.schedule.rate(t, duration),
            0.0,
            duration,
            self.intervals,
        )?;
        Ok(kg(dm))
    }

    pub fn fill(&self, service: &dyn PropertyService) -> ProcessResult<TankReport> {
        self.validate()?;
        let reference = self.reference(service)?;
        let v = self.volume.value;

        let pt_initial = StateInput::pt(self.initial_pressure, self.initial_temperature);
        let rho_i = self.lookup(service, Property::Density, pt_initial, "initial density")?;
        let u_i = self.lookup(
            service,
            Property::InternalEnergy,
            pt_initial,
            "initial internal energy",
        )?;
        let s_i = self.lookup(service, Property::Entropy, pt_initial, "initial entropy")?;
        let m_i = rho_i * v;

        let supply = StateInput::pt(self.supply_pressure, self.supply_temperature);
        let h_in = self.lookup(service, Property::Enthalpy, supply, "supply enthalpy")?;
        let s_in = self.lookup(service, Property::Entropy, supply, "supply entropy")?;

        let dm = self.mass_added()?.value;
        let m_f = m_i + dm;
        if m_f <= 0.0 {
            return Err(ProcessError::Degenerate {
                what: "tank is empty at the end of the fill",
            });
        }
        if dm < 0.0 {
            warn!(dm, "schedule removes mass; supply enthalpy is still used");
        }
        debug!(m_i, dm, m_f, "tank mass balance");

        let u_f = (m_i * u_i + h_in * dm) / m_f;
        let rho_f = m_f / v;
        let ud = StateInput::ud(u_f, kg_per_m3(rho_f));
        let t_f = self.lookup(service, Property::Temperature, ud, "final temperature")?;
        let p_f = self.lookup(service, Property::Pressure, ud, "final pressure")?;
        let s_f = self.lookup(service, Property::Entropy, ud, "final entropy")?;

        let t0 = self.dead_state.t0().value;
        let p0 = self.dead_state.p0().value;
        let stored = |m: f64, u: f64, rho: f64, s: f64| {
            m * ((u - reference.u) + p0 * (1.0 / rho - reference.v) - t0 * (s - reference.s))
        };

        let initial = TankState {
            pressure: self.initial_pressure,
            temperature: self.initial_temperature,
            mass: kg(m_i),
            density: kg_per_m3(rho_i),
            internal_energy: u_i,
            entropy: s_i,
            stored_exergy: stored(m_i, u_i, rho_i, s_i),
        };
        let final_state = TankState {
            pressure: pa(p_f),
            temperature: k(t_f),
            mass: kg(m_f),
            density: kg_per_m3(rho_f),
            internal_energy: u_f,
            entropy: s_f,
            stored_exergy: stored(m_f, u_f, rho_f, s_f),
        };

        let psi_in = (h_in - reference.h) - t0 * (s_in - reference.s);
        let destroyed = psi_in * dm - (final_state.stored_exergy - initial.stored_exergy);
        if destroyed < 0.0 {
            warn!(destroyed, "filling shows negative exergy destruction");
        }
        info!(t_f, p_f, m_f, destroyed, "tank fill complete");

        Ok(TankReport {
            initial,
            final_state,
            mass_added: kg(dm),
            inlet_enthalpy: h_in,
            inlet_flow_exergy: psi_in,
            exergy_destroyed: destroyed,
        })
    }

    fn reference(&self, service: &dyn PropertyService) -> ProcessResult<Reference> {
        let dead = StateInput::pt(self.dead_state.p0(), self.dead_state.t0());
        let rho = self.lookup(service, Property::Density, dead, "dead-state density")?;
        Ok(Reference {
            u: self.lookup(service, Property::InternalEnergy, dead, "dead-state internal energy")?,
            v: 1.0 / rho,
            h: self.lookup(service, Property::Enthalpy, dead, "dead-state enthalpy")?,
            s: self.lookup(service, Property::Entropy, dead, "dead-state entropy")?,
        })
    }

    fn lookup(
        &self,
        service: &dyn PropertyService,
        output: Property,
        input: StateInput,
        what: &'static str,
    ) -> ProcessResult<f64> {
        service
            .query(output, input, self.fluid)
            .map_err(|source| ProcessError::Lookup { what, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::units::{m3, s};
    use tc_fluids::SimpleTwoPhaseModel;

    fn tank() -> FillingTank {
        FillingTank {
            fluid: Species::N2,
            volume: m3(0.8),
            initial_pressure: pa(150.0e3),
            initial_temperature: k(310.0),
            supply_pressure: pa(1.8e6),
            supply_temperature: k(420.0),
            fill_time: s(600.0),
            schedule: MassFlowSchedule::Linear {
                initial_kgps: 0.02,
                final_kgps: 0.0,
            },
            intervals: DEFAULT_INTERVALS,
            dead_state: DeadState::default(),
        }
    }

    #[test]
    fn linear_schedule_endpoints() {
        let schedule = tank().schedule;
        assert_eq!(schedule.rate(0.0, 600.0), 0.02);
        assert_eq!(schedule.rate(600.0, 600.0), 0.0);
        assert!((schedule.rate(300.0, 600.0) - 0.01).abs() < 1e-15);
    }

    #[test]
    fn linear_schedule_integrates_exactly() {
        let dm = tank().mass_added().unwrap();
        assert!((dm.value - 6.0).abs() < 1e-12, "dm = {}", dm.value);
    }

    #[test]
    fn fill_conserves_mass_and_energy() {
        let model = SimpleTwoPhaseModel::with_presets();
        let t = tank();
        let report = t.fill(&model).unwrap();

        let m_i = report.initial.mass.value;
        let m_f = report.final_state.mass.value;
        assert!((m_f - m_i - 6.0).abs() < 1e-9);

        let lhs = m_f * report.final_state.internal_energy;
        let rhs = m_i * report.initial.internal_energy + report.inlet_enthalpy * 6.0;
        assert!((lhs - rhs).abs() <= 1e-9 * rhs.abs().max(1.0));

        let expected_rho = m_f / t.volume.value;
        assert!((report.final_state.density.value - expected_rho).abs() < 1e-9);
    }

    #[test]
    fn filling_heats_and_pressurises() {
        let model = SimpleTwoPhaseModel::with_presets();
        let report = tank().fill(&model).unwrap();
        let t_f = report.final_state.temperature.value;
        assert!(t_f > 420.0 && t_f < 600.0, "T_f = {t_f}");
        assert!(report.final_state.pressure.value > 1.0e6);
        assert!(report.final_state.pressure.value < 1.8e6);
        assert!(report.exergy_destroyed > 0.0);
        assert!(report.inlet_flow_exergy > 0.0);
    }

    #[test]
    fn bad_geometry_is_rejected() {
        let mut t = tank();
        t.volume = m3(0.0);
        let model = SimpleTwoPhaseModel::with_presets();
        let err = t.fill(&model).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidConfig { .. }));
    }
}
