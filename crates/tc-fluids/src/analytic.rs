//! Analytic two-phase property model.
//!
//! A closed-form fluid model that needs no native library. It is built from
//! a handful of constants per fluid and is thermodynamically consistent
//! (Gibbs relation holds across the saturation dome), which makes it suitable
//! for tests, offline runs and second-law checks. It is NOT a replacement for
//! a real equation of state.
//!
//! Model:
//! - single constant heat capacity `cp` for both phases
//! - incompressible liquid with density `rho_liquid`
//! - ideal-gas vapor with gas constant `r`
//! - constant latent heat `h_fg`; the saturation curve follows the
//!   integrated Clausius-Clapeyron relation
//!
//! ```text
//! 1/T_sat(P) = 1/T_ref - (r / h_fg) ln(P / P_ref)
//! h_liq(T)    = cp (T - T_ref)
//! h_vap(T)    = cp (T - T_ref) + h_fg
//! s_liq(T)    = cp ln(T / T_ref)
//! s_vap(T, P) = cp ln(T / T_ref) + h_fg / T_ref - r ln(P / P_ref)
//! ```
//!
//! The reference state is saturated liquid at `(T_ref, P_ref)` with `h = s = 0`.

use crate::error::{FluidError, FluidResult};
use crate::property::Property;
use crate::service::PropertyService;
use crate::species::Species;
use crate::state::StateInput;
use tracing::debug;

/// Universal gas constant [J/(kmol·K)]
const R_UNIVERSAL: f64 = 8314.462618;

/// Quality reported for single-phase states, following CoolProp.
pub const SINGLE_PHASE_QUALITY: f64 = -1.0;

/// Constants describing one fluid in the analytic model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPhaseParams {
    /// Reference saturation temperature [K]
    pub t_ref: f64,
    /// Saturation pressure at `t_ref` [Pa]
    pub p_ref: f64,
    /// Latent heat of vaporization [J/kg]
    pub h_fg: f64,
    /// Heat capacity, both phases [J/(kg·K)]
    pub cp: f64,
    /// Specific gas constant of the vapor [J/(kg·K)]
    pub r: f64,
    /// Liquid density [kg/m³]
    pub rho_liquid: f64,
}

impl TwoPhaseParams {
    /// Build parameters from the normal boiling point and molar mass.
    pub fn from_boiling_point(
        t_nbp: f64,
        h_fg: f64,
        cp: f64,
        molar_mass_kg_kmol: f64,
        rho_liquid: f64,
    ) -> Self {
        Self {
            t_ref: t_nbp,
            p_ref: 101_325.0,
            h_fg,
            cp,
            r: R_UNIVERSAL / molar_mass_kg_kmol,
            rho_liquid,
        }
    }

    pub fn propane() -> Self {
        Self::from_boiling_point(231.04, 425.0e3, 2400.0, 44.097, 580.0)
    }

    pub fn water() -> Self {
        Self::from_boiling_point(373.124, 2256.4e3, 4180.0, 18.015, 997.0)
    }

    pub fn nitrogen() -> Self {
        Self::from_boiling_point(77.355, 199.2e3, 1040.0, 28.014, 806.0)
    }

    pub fn ammonia() -> Self {
        Self::from_boiling_point(239.82, 1369.0e3, 2200.0, 17.031, 682.0)
    }

    pub fn r134a() -> Self {
        Self::from_boiling_point(247.08, 216.97e3, 1400.0, 102.03, 1377.0)
    }

    /// CO₂ has no normal boiling point; the curve is anchored at the triple point.
    pub fn carbon_dioxide() -> Self {
        Self {
            t_ref: 216.59,
            p_ref: 518_000.0,
            h_fg: 347.0e3,
            cp: 1100.0,
            r: R_UNIVERSAL / 44.01,
            rho_liquid: 1178.0,
        }
    }

    fn validate(&self) -> FluidResult<()> {
        let all_positive = [
            self.t_ref,
            self.p_ref,
            self.h_fg,
            self.cp,
            self.r,
            self.rho_liquid,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
        if !all_positive {
            return Err(FluidError::InvalidArg {
                what: "two-phase parameters must be positive and finite",
            });
        }
        if self.cp <= self.r {
            return Err(FluidError::InvalidArg {
                what: "two-phase parameters need cp > r",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Liquid,
    TwoPhase { x: f64 },
    Vapor,
}

/// A resolved state: temperature, pressure and phase.
#[derive(Debug, Clone, Copy)]
struct Point {
    t: f64,
    p: f64,
    phase: Phase,
}

/// Analytic [`PropertyService`] over a set of registered fluids.
#[derive(Debug, Clone, Default)]
pub struct SimpleTwoPhaseModel {
    fluids: Vec<(Species, TwoPhaseParams)>,
}

impl SimpleTwoPhaseModel {
    /// Empty model; register fluids with [`with_fluid`](Self::with_fluid).
    pub fn new() -> Self {
        Self { fluids: Vec::new() }
    }

    /// Model preloaded with every built-in parameter set.
    pub fn with_presets() -> Self {
        Self::new()
            .with_fluid(Species::Propane, TwoPhaseParams::propane())
            .with_fluid(Species::Water, TwoPhaseParams::water())
            .with_fluid(Species::N2, TwoPhaseParams::nitrogen())
            .with_fluid(Species::Ammonia, TwoPhaseParams::ammonia())
            .with_fluid(Species::R134a, TwoPhaseParams::r134a())
            .with_fluid(Species::CO2, TwoPhaseParams::carbon_dioxide())
    }

    /// Register (or replace) the parameters for a fluid.
    pub fn with_fluid(mut self, species: Species, params: TwoPhaseParams) -> Self {
        self.fluids.retain(|(s, _)| *s != species);
        self.fluids.push((species, params));
        self
    }

    fn params(&self, species: Species) -> Option<&TwoPhaseParams> {
        self.fluids
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, params)| params)
    }
}

impl TwoPhaseParams {
    fn t_sat(&self, p: f64) -> Result<f64, &'static str> {
        let inv = 1.0 / self.t_ref - (self.r / self.h_fg) * (p / self.p_ref).ln();
        if inv <= 0.0 {
            return Err("pressure above the saturation range");
        }
        Ok(1.0 / inv)
    }

    fn p_sat(&self, t: f64) -> f64 {
        self.p_ref * ((self.h_fg / self.r) * (1.0 / self.t_ref - 1.0 / t)).exp()
    }

    fn h_liquid(&self, t: f64) -> f64 {
        self.cp * (t - self.t_ref)
    }

    fn s_liquid(&self, t: f64) -> f64 {
        self.cp * (t / self.t_ref).ln()
    }

    fn s_vapor(&self, t: f64, p: f64) -> f64 {
        self.cp * (t / self.t_ref).ln() + self.h_fg / self.t_ref - self.r * (p / self.p_ref).ln()
    }

    fn resolve(&self, input: &StateInput) -> Result<Point, &'static str> {
        use Property::*;

        let value = |prop| input.value_of(prop).unwrap_or(f64::NAN);

        let point = if input.is_pair(Pressure, Temperature) {
            let (p, t) = (value(Pressure), value(Temperature));
            let phase = if t <= self.t_sat(p)? {
                Phase::Liquid
            } else {
                Phase::Vapor
            };
            Point { t, p, phase }
        } else if input.is_pair(Pressure, Enthalpy) {
            let (p, h) = (value(Pressure), value(Enthalpy));
            let t_sat = self.t_sat(p)?;
            let h_l = self.h_liquid(t_sat);
            if h < h_l {
                Point {
                    t: self.t_ref + h / self.cp,
                    p,
                    phase: Phase::Liquid,
                }
            } else if h > h_l + self.h_fg {
                Point {
                    t: self.t_ref + (h - self.h_fg) / self.cp,
                    p,
                    phase: Phase::Vapor,
                }
            } else {
                Point {
                    t: t_sat,
                    p,
                    phase: Phase::TwoPhase {
                        x: (h - h_l) / self.h_fg,
                    },
                }
            }
        } else if input.is_pair(Pressure, Entropy) {
            let (p, s) = (value(Pressure), value(Entropy));
            let t_sat = self.t_sat(p)?;
            let s_l = self.s_liquid(t_sat);
            let s_fg = self.h_fg / t_sat;
            if s < s_l {
                Point {
                    t: self.t_ref * (s / self.cp).exp(),
                    p,
                    phase: Phase::Liquid,
                }
            } else if s > s_l + s_fg {
                let ln_ratio =
                    (s - self.h_fg / self.t_ref + self.r * (p / self.p_ref).ln()) / self.cp;
                Point {
                    t: self.t_ref * ln_ratio.exp(),
                    p,
                    phase: Phase::Vapor,
                }
            } else {
                Point {
                    t: t_sat,
                    p,
                    phase: Phase::TwoPhase {
                        x: (s - s_l) / s_fg,
                    },
                }
            }
        } else if input.is_pair(Pressure, Quality) {
            let p = value(Pressure);
            Point {
                t: self.t_sat(p)?,
                p,
                phase: Phase::TwoPhase { x: value(Quality) },
            }
        } else if input.is_pair(Temperature, Quality) {
            let t = value(Temperature);
            Point {
                t,
                p: self.p_sat(t),
                phase: Phase::TwoPhase { x: value(Quality) },
            }
        } else if input.is_pair(InternalEnergy, Density) {
            // Only the vapor region is invertible in closed form:
            // u = cp (T - T_ref) + h_fg - r T
            let (u, rho) = (value(InternalEnergy), value(Density));
            let t = (u + self.cp * self.t_ref - self.h_fg) / (self.cp - self.r);
            if t <= 0.0 {
                return Err("internal energy below the vapor region");
            }
            let p = rho * self.r * t;
            if let Ok(t_sat) = self.t_sat(p)
                && t <= t_sat
            {
                return Err("(U, D) inversion is only available for vapor states");
            }
            Point {
                t,
                p,
                phase: Phase::Vapor,
            }
        } else {
            return Err("input pair not supported by the analytic model");
        };

        if !point.t.is_finite() || point.t <= 0.0 {
            return Err("state resolves to a non-positive temperature");
        }
        Ok(point)
    }

    fn evaluate(&self, point: &Point, output: Property) -> f64 {
        let Point { t, p, phase } = *point;
        let density = || match phase {
            Phase::Liquid => self.rho_liquid,
            Phase::Vapor => p / (self.r * t),
            Phase::TwoPhase { x } => 1.0 / ((1.0 - x) / self.rho_liquid + x * self.r * t / p),
        };
        let enthalpy = || match phase {
            Phase::Liquid => self.h_liquid(t),
            Phase::Vapor => self.h_liquid(t) + self.h_fg,
            Phase::TwoPhase { x } => self.h_liquid(t) + x * self.h_fg,
        };

        match output {
            Property::Temperature => t,
            Property::Pressure => p,
            Property::Enthalpy => enthalpy(),
            Property::Entropy => match phase {
                Phase::Liquid => self.s_liquid(t),
                Phase::Vapor => self.s_vapor(t, p),
                Phase::TwoPhase { x } => self.s_liquid(t) + x * self.h_fg / t,
            },
            Property::Density => density(),
            Property::InternalEnergy => enthalpy() - p / density(),
            Property::Quality => match phase {
                Phase::TwoPhase { x } => x,
                _ => SINGLE_PHASE_QUALITY,
            },
        }
    }
}

impl PropertyService for SimpleTwoPhaseModel {
    fn name(&self) -> &str {
        "analytic two-phase"
    }

    fn query(&self, output: Property, input: StateInput, fluid: Species) -> FluidResult<f64> {
        input.validate()?;
        let params = self
            .params(fluid)
            .ok_or_else(|| FluidError::lookup(output, input, fluid, "fluid not registered"))?;
        params.validate()?;

        let point = params.resolve(&input).map_err(|reason| {
            debug!(%fluid, %output, reason, "analytic lookup failed");
            FluidError::lookup(output, input, fluid, reason)
        })?;
        Ok(params.evaluate(&point, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tc_core::units::{k, pa};
    use tc_core::{Tolerances, nearly_equal};

    const TOL: Tolerances = Tolerances {
        abs: 1e-6,
        rel: 1e-9,
    };

    fn model() -> SimpleTwoPhaseModel {
        SimpleTwoPhaseModel::with_presets()
    }

    #[test]
    fn reference_state_is_zero() {
        let m = model();
        let params = TwoPhaseParams::propane();
        let input = StateInput::pq(pa(params.p_ref), 0.0);
        let h = m.query(Property::Enthalpy, input, Species::Propane).unwrap();
        let s = m.query(Property::Entropy, input, Species::Propane).unwrap();
        let t = m.query(Property::Temperature, input, Species::Propane).unwrap();
        assert!(h.abs() < 1e-6);
        assert!(s.abs() < 1e-9);
        assert!(nearly_equal(t, params.t_ref, TOL));
    }

    #[test]
    fn saturation_curve_roundtrips() {
        let m = model();
        let t_sat = m
            .query(
                Property::Temperature,
                StateInput::pq(pa(6.5e5), 0.5),
                Species::Propane,
            )
            .unwrap();
        let p_sat = m
            .query(
                Property::Pressure,
                StateInput::tq(k(t_sat), 0.5),
                Species::Propane,
            )
            .unwrap();
        assert!(nearly_equal(p_sat, 6.5e5, TOL));
    }

    #[test]
    fn phase_classification_from_pressure_temperature() {
        let m = model();
        let q_liquid = m
            .query(
                Property::Quality,
                StateInput::pt(pa(2.5e6), k(330.0)),
                Species::Propane,
            )
            .unwrap();
        let q_vapor = m
            .query(
                Property::Quality,
                StateInput::pt(pa(6.5e5), k(345.0)),
                Species::Propane,
            )
            .unwrap();
        assert_eq!(q_liquid, SINGLE_PHASE_QUALITY);
        assert_eq!(q_vapor, SINGLE_PHASE_QUALITY);

        let rho = m
            .query(
                Property::Density,
                StateInput::pt(pa(6.5e5), k(345.0)),
                Species::Propane,
            )
            .unwrap();
        assert!(rho > 1.0 && rho < 100.0, "vapor density {rho}");
    }

    #[test]
    fn enthalpy_inversion_matches_forward_lookup() {
        let m = model();
        for (p, t) in [(2.5e6, 330.0), (6.5e5, 345.0), (1.0e5, 200.0)] {
            let h = m
                .query(
                    Property::Enthalpy,
                    StateInput::pt(pa(p), k(t)),
                    Species::Propane,
                )
                .unwrap();
            let t_back = m
                .query(
                    Property::Temperature,
                    StateInput::hp(h, pa(p)),
                    Species::Propane,
                )
                .unwrap();
            assert!(nearly_equal(t_back, t, TOL), "T={t} back={t_back}");
        }
    }

    #[test]
    fn entropy_is_continuous_across_the_dome() {
        let m = model();
        let p = pa(6.5e5);
        let s_sat_vap = m
            .query(Property::Entropy, StateInput::pq(p, 1.0), Species::Propane)
            .unwrap();
        let h_sat_vap = m
            .query(Property::Enthalpy, StateInput::pq(p, 1.0), Species::Propane)
            .unwrap();
        let s_from_h = m
            .query(
                Property::Entropy,
                StateInput::hp(h_sat_vap + 1e-6, p),
                Species::Propane,
            )
            .unwrap();
        assert!((s_sat_vap - s_from_h).abs() < 1e-6);
    }

    #[test]
    fn internal_energy_density_inversion_for_vapor() {
        let m = model();
        let input = StateInput::pt(pa(1.5e5), k(310.0));
        let u = m
            .query(Property::InternalEnergy, input, Species::N2)
            .unwrap();
        let rho = m.query(Property::Density, input, Species::N2).unwrap();
        let ud = StateInput::new(Property::InternalEnergy, u, Property::Density, rho);
        let t = m.query(Property::Temperature, ud, Species::N2).unwrap();
        let p = m.query(Property::Pressure, ud, Species::N2).unwrap();
        assert!(nearly_equal(t, 310.0, TOL));
        assert!(nearly_equal(p, 1.5e5, TOL));
    }

    #[test]
    fn unsupported_requests_fail_descriptively() {
        let m = model();
        let err = m
            .query(
                Property::Enthalpy,
                StateInput::pt(pa(1.0e5), k(300.0)),
                Species::He,
            )
            .unwrap_err();
        assert!(err.to_string().contains("Helium"), "{err}");

        let err = m
            .query(
                Property::Temperature,
                StateInput::new(Property::Enthalpy, 1.0, Property::Entropy, 1.0),
                Species::Propane,
            )
            .unwrap_err();
        assert!(matches!(err, FluidError::Lookup { .. }));

        let err = m
            .query(
                Property::Enthalpy,
                StateInput::pq(pa(1.0e5), 1.5),
                Species::Propane,
            )
            .unwrap_err();
        assert!(matches!(err, FluidError::NonPhysical { .. }));
    }

    proptest! {
        #[test]
        fn throttling_never_destroys_entropy(
            t_in in 250.0_f64..340.0,
            p_in in 2.6e6_f64..4.0e6,
            p_out in 2.0e5_f64..2.0e6,
        ) {
            let m = model();
            let inlet = StateInput::pt(pa(p_in), k(t_in));
            let h = m.query(Property::Enthalpy, inlet, Species::Propane).unwrap();
            let s_in = m.query(Property::Entropy, inlet, Species::Propane).unwrap();
            let s_out = m
                .query(Property::Entropy, StateInput::hp(h, pa(p_out)), Species::Propane)
                .unwrap();
            prop_assert!(s_out - s_in >= -1e-9);
        }
    }
}
