//! Counterflow exchanger: pinch placement feasibility and boundary
//! temperature analysis.
//!
//! Two pinch placements are tried for fixed inlet temperatures:
//!
//! - [`PinchCase::HotOutlet`]: `T_h,out = T_c,in + dTmin`, the cold outlet
//!   follows from the energy balance and the approach is checked at the hot
//!   inlet end (`T_h,in - T_c,out`).
//! - [`PinchCase::ColdOutlet`]: `T_c,out = T_h,in - dTmin`, the hot outlet
//!   follows from the energy balance and the approach is checked at the cold
//!   inlet end (`T_h,out - T_c,in`).
//!
//! The first feasible case, in that order, is analysed:
//!
//! ```text
//! T_b,H  = (h_h,in - h_h,out) / (s_h,in - s_h,out)
//! T_b,C  = (h_c,out - h_c,in) / (s_c,out - s_c,in)
//! Q      = m_h (h_h,in - h_h,out)
//! X_dest = T0 · Q · (1/T_b,C - 1/T_b,H)
//! X_chk  = T0 · [m_h (s_h,out - s_h,in) + m_c (s_c,out - s_c,in)]
//! η      = m_c[Δh_c - T0 Δs_c] / m_h[-Δh_h + T0 Δs_h]
//! ```

use std::fmt;

use crate::error::{ProcessError, ProcessResult};
use tc_core::DeadState;
use tc_core::units::{MassRate, Power, Pressure, TempInterval, Temperature, delta_k, k, watts};
use tc_fluids::{Property, PropertyService, Species, StateInput};
use tc_solver::{SolverProblem, solve};
use tracing::{debug, warn};

/// One side of the exchanger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSide {
    pub fluid: Species,
    pub pressure: Pressure,
    pub inlet_temperature: Temperature,
    pub mass_flow: MassRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchCase {
    HotOutlet,
    ColdOutlet,
}

impl fmt::Display for PinchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinchCase::HotOutlet => f.write_str("pinch at hot outlet"),
            PinchCase::ColdOutlet => f.write_str("pinch at cold outlet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    Infeasible,
    /// The other stream's outlet temperature could not be recovered.
    Unavailable,
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feasibility::Feasible => f.write_str("FEASIBLE"),
            Feasibility::Infeasible => f.write_str("INFEASIBLE"),
            Feasibility::Unavailable => f.write_str("UNAVAILABLE"),
        }
    }
}

/// Outlet state for one pinch placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseEvaluation {
    pub case: PinchCase,
    pub hot_outlet_enthalpy: f64,
    pub cold_outlet_enthalpy: f64,
    pub hot_outlet_temperature: Option<Temperature>,
    pub cold_outlet_temperature: Option<Temperature>,
    /// Approach at the end opposite the pinch.
    pub approach: Option<TempInterval>,
    /// `(h_c,out - h_c,in) / (h_h,in - h_h,out)`, when the hot side changes.
    pub implied_mass_flow_ratio: Option<f64>,
    pub feasibility: Feasibility,
}

/// Boundary temperatures and exergy figures for the selected case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterflowAnalysis {
    pub case: PinchCase,
    pub hot_boundary_temperature: Temperature,
    pub cold_boundary_temperature: Temperature,
    pub heat_rate: Power,
    pub exergy_destruction: Power,
    /// Entropy-generation form of the same quantity.
    pub exergy_check: Power,
    /// `None` when the hot stream gives up no exergy.
    pub exergetic_efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterflowReport {
    /// `m_h / m_c`
    pub mass_flow_ratio: f64,
    pub hot_inlet_enthalpy: f64,
    pub cold_inlet_enthalpy: f64,
    pub cases: [CaseEvaluation; 2],
    /// `None` when neither case is feasible.
    pub analysis: Option<CounterflowAnalysis>,
}

impl CounterflowReport {
    /// The analysis, or an infeasibility error naming both cases.
    pub fn require_analysis(&self) -> ProcessResult<&CounterflowAnalysis> {
        self.analysis.as_ref().ok_or_else(|| ProcessError::Infeasible {
            what: format!(
                "no pinch placement satisfies dTmin ({}: {}, {}: {})",
                self.cases[0].case,
                self.cases[0].feasibility,
                self.cases[1].case,
                self.cases[1].feasibility
            ),
        })
    }
}

/// Two-stream counterflow exchanger with a minimum approach temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterflowExchanger {
    pub hot: StreamSide,
    pub cold: StreamSide,
    pub dt_min: TempInterval,
    pub dead_state: DeadState,
    /// Temperature bracket for the bisection fallback when the backend
    /// cannot invert `T(H, P)` directly.
    pub inversion_bounds: Option<(Temperature, Temperature)>,
}

impl CounterflowExchanger {
    pub fn evaluate(&self, service: &dyn PropertyService) -> ProcessResult<CounterflowReport> {
        if self.cold.mass_flow.value == 0.0 {
            return Err(ProcessError::Degenerate {
                what: "cold-side mass flow is zero",
            });
        }
        let mu = self.hot.mass_flow.value / self.cold.mass_flow.value;
        if mu == 0.0 {
            return Err(ProcessError::Degenerate {
                what: "mass-flow ratio m_h/m_c is zero",
            });
        }
        if !mu.is_finite() || mu < 0.0 {
            return Err(ProcessError::InvalidConfig {
                what: format!("mass-flow ratio {mu} is not usable"),
            });
        }
        if self.dt_min.value.is_nan() || self.dt_min.value < 0.0 {
            return Err(ProcessError::InvalidConfig {
                what: format!("dTmin {} K must be non-negative", self.dt_min.value),
            });
        }

        let h_h_in = self.enthalpy(
            service,
            &self.hot,
            self.hot.inlet_temperature,
            "hot inlet enthalpy",
        )?;
        let h_c_in = self.enthalpy(
            service,
            &self.cold,
            self.cold.inlet_temperature,
            "cold inlet enthalpy",
        )?;

        let cases = [
            self.pinch_at_hot_outlet(service, mu, h_h_in, h_c_in)?,
            self.pinch_at_cold_outlet(service, mu, h_h_in, h_c_in)?,
        ];
        for case in &cases {
            if case.feasibility != Feasibility::Feasible {
                warn!(case = %case.case, feasibility = %case.feasibility, "pinch case rejected");
            }
        }

        let analysis = match cases.iter().find(|c| c.feasibility == Feasibility::Feasible) {
            Some(selected) => Some(self.analyse(service, selected)?),
            None => None,
        };

        Ok(CounterflowReport {
            mass_flow_ratio: mu,
            hot_inlet_enthalpy: h_h_in,
            cold_inlet_enthalpy: h_c_in,
            cases,
            analysis,
        })
    }

    fn pinch_at_hot_outlet(
        &self,
        service: &dyn PropertyService,
        mu: f64,
        h_h_in: f64,
        h_c_in: f64,
    ) -> ProcessResult<CaseEvaluation> {
        let t_h_out = k(self.cold.inlet_temperature.value + self.dt_min.value);
        let h_h_out = self.enthalpy(service, &self.hot, t_h_out, "hot outlet enthalpy")?;
        let h_c_out = h_c_in + mu * (h_h_in - h_h_out);
        let t_c_out = self.invert(service, &self.cold, h_c_out);
        let approach = t_c_out.map(|t| self.hot.inlet_temperature.value - t.value);

        Ok(self.case(
            PinchCase::HotOutlet,
            (h_h_in, h_h_out, Some(t_h_out)),
            (h_c_in, h_c_out, t_c_out),
            approach,
        ))
    }

    fn pinch_at_cold_outlet(
        &self,
        service: &dyn PropertyService,
        mu: f64,
        h_h_in: f64,
        h_c_in: f64,
    ) -> ProcessResult<CaseEvaluation> {
        let t_c_out = k(self.hot.inlet_temperature.value - self.dt_min.value);
        let h_c_out = self.enthalpy(service, &self.cold, t_c_out, "cold outlet enthalpy")?;
        let h_h_out = h_h_in - (h_c_out - h_c_in) / mu;
        let t_h_out = self.invert(service, &self.hot, h_h_out);
        let approach = t_h_out.map(|t| t.value - self.cold.inlet_temperature.value);

        Ok(self.case(
            PinchCase::ColdOutlet,
            (h_h_in, h_h_out, t_h_out),
            (h_c_in, h_c_out, Some(t_c_out)),
            approach,
        ))
    }

    fn case(
        &self,
        case: PinchCase,
        (h_h_in, h_h_out, t_h_out): (f64, f64, Option<Temperature>),
        (h_c_in, h_c_out, t_c_out): (f64, f64, Option<Temperature>),
        approach: Option<f64>,
    ) -> CaseEvaluation {
        let feasibility = match approach {
            Some(dt) if dt >= self.dt_min.value => Feasibility::Feasible,
            Some(_) => Feasibility::Infeasible,
            None => Feasibility::Unavailable,
        };
        let dh_hot = h_h_in - h_h_out;
        let implied = (dh_hot != 0.0).then(|| (h_c_out - h_c_in) / dh_hot);
        debug!(%case, ?approach, %feasibility, "pinch case evaluated");

        CaseEvaluation {
            case,
            hot_outlet_enthalpy: h_h_out,
            cold_outlet_enthalpy: h_c_out,
            hot_outlet_temperature: t_h_out,
            cold_outlet_temperature: t_c_out,
            approach: approach.map(delta_k),
            implied_mass_flow_ratio: implied,
            feasibility,
        }
    }

    fn analyse(
        &self,
        service: &dyn PropertyService,
        selected: &CaseEvaluation,
    ) -> ProcessResult<CounterflowAnalysis> {
        let (Some(t_h_out), Some(t_c_out)) = (
            selected.hot_outlet_temperature,
            selected.cold_outlet_temperature,
        ) else {
            return Err(ProcessError::Infeasible {
                what: format!("{} has no outlet temperatures", selected.case),
            });
        };

        let hot = &self.hot;
        let cold = &self.cold;
        let h_h_in = self.enthalpy(service, hot, hot.inlet_temperature, "hot inlet enthalpy")?;
        let h_h_out = self.enthalpy(service, hot, t_h_out, "hot outlet enthalpy")?;
        let s_h_in = self.entropy(service, hot, hot.inlet_temperature, "hot inlet entropy")?;
        let s_h_out = self.entropy(service, hot, t_h_out, "hot outlet entropy")?;
        let h_c_in = self.enthalpy(service, cold, cold.inlet_temperature, "cold inlet enthalpy")?;
        let h_c_out = self.enthalpy(service, cold, t_c_out, "cold outlet enthalpy")?;
        let s_c_in = self.entropy(service, cold, cold.inlet_temperature, "cold inlet entropy")?;
        let s_c_out = self.entropy(service, cold, t_c_out, "cold outlet entropy")?;

        if s_h_in == s_h_out || s_c_in == s_c_out {
            return Err(ProcessError::Degenerate {
                what: "boundary temperature needs an entropy change on both sides",
            });
        }
        let t0 = self.dead_state.t0().value;
        let m_h = hot.mass_flow.value;
        let m_c = cold.mass_flow.value;

        let t_b_hot = (h_h_in - h_h_out) / (s_h_in - s_h_out);
        let t_b_cold = (h_c_out - h_c_in) / (s_c_out - s_c_in);
        let q = m_h * (h_h_in - h_h_out);
        let x_dest = t0 * q * (1.0 / t_b_cold - 1.0 / t_b_hot);
        let x_check = t0 * (m_h * (s_h_out - s_h_in) + m_c * (s_c_out - s_c_in));

        let gained = m_c * ((h_c_out - h_c_in) - t0 * (s_c_out - s_c_in));
        let given = m_h * ((h_h_in - h_h_out) - t0 * (s_h_in - s_h_out));
        let efficiency = (given != 0.0).then(|| gained / given);

        Ok(CounterflowAnalysis {
            case: selected.case,
            hot_boundary_temperature: k(t_b_hot),
            cold_boundary_temperature: k(t_b_cold),
            heat_rate: watts(q),
            exergy_destruction: watts(x_dest),
            exergy_check: watts(x_check),
            exergetic_efficiency: efficiency,
        })
    }

    fn enthalpy(
        &self,
        service: &dyn PropertyService,
        side: &StreamSide,
        t: Temperature,
        what: &'static str,
    ) -> ProcessResult<f64> {
        service
            .query(Property::Enthalpy, StateInput::pt(side.pressure, t), side.fluid)
            .map_err(|source| ProcessError::Lookup { what, source })
    }

    fn entropy(
        &self,
        service: &dyn PropertyService,
        side: &StreamSide,
        t: Temperature,
        what: &'static str,
    ) -> ProcessResult<f64> {
        service
            .query(Property::Entropy, StateInput::pt(side.pressure, t), side.fluid)
            .map_err(|source| ProcessError::Lookup { what, source })
    }

    /// `T(H, P)`: direct lookup first, then bisection over the configured
    /// bounds. `None` when neither works.
    fn invert(
        &self,
        service: &dyn PropertyService,
        side: &StreamSide,
        h: f64,
    ) -> Option<Temperature> {
        let input = StateInput::hp(h, side.pressure);
        match service.query(Property::Temperature, input, side.fluid) {
            Ok(t) if t.is_finite() && t > 0.0 => return Some(k(t)),
            Ok(t) => debug!(h, t, "direct T(H, P) inversion returned an unusable value"),
            Err(e) => debug!(h, error = %e, "direct T(H, P) inversion failed"),
        }

        let (low, high) = self.inversion_bounds?;
        let problem = SolverProblem::new(
            side.fluid,
            Property::Enthalpy,
            h,
            Property::Pressure,
            side.pressure.value,
            Property::Temperature,
            low.value,
            high.value,
        )
        .with_tolerance(1e-9)
        .with_max_iterations(200);

        match solve(service, &problem) {
            Ok(solution) if solution.is_converged() => Some(k(solution.value)),
            Ok(solution) => {
                debug!(value = solution.value, "bisection inversion did not converge");
                None
            }
            Err(e) => {
                debug!(error = %e, "bisection inversion failed");
                None
            }
        }
    }
}
