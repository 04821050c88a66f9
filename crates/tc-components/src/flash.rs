//! Flash separator: splits a two-phase feed into saturated vapor and liquid.

use crate::common::{check_finite, check_positive, lookup};
use crate::error::{ComponentError, ComponentResult};
use crate::stream::Stream;
use crate::traits::ExergyBalance;
use tc_core::DeadState;
use tc_core::units::{MassRate, Pressure, SpecEntropy, k, kgps};
use tc_fluids::{Property, PropertyService, Species, StateInput};

/// Feed to a flash drum.
///
/// The entropy is optional so an upstream throttle can hand over the value it
/// already has; otherwise it is derived from the feed enthalpy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashFeed {
    pub fluid: Species,
    pub pressure: Pressure,
    pub quality: Option<f64>,
    pub mass_flow: MassRate,
    pub entropy: Option<SpecEntropy>,
}

impl FlashFeed {
    pub fn from_stream(stream: &Stream) -> Self {
        Self {
            fluid: stream.fluid,
            pressure: stream.pressure,
            quality: stream.quality,
            mass_flow: stream.mass_flow,
            entropy: stream.entropy,
        }
    }
}

/// Adiabatic phase separator at constant pressure.
#[derive(Debug, Clone)]
pub struct FlashSeparator {
    name: String,
}

/// Result of a flash separation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashOutcome {
    pub name: String,
    pub feed: FlashFeed,
    /// Feed entropy actually used in the balance.
    pub inlet_entropy: SpecEntropy,
    /// Saturated vapor, `x · m`.
    pub vapor: Stream,
    /// Saturated liquid, `(1 - x) · m`.
    pub liquid: Stream,
}

impl FlashSeparator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn separate(
        &self,
        service: &dyn PropertyService,
        feed: &FlashFeed,
    ) -> ComponentResult<FlashOutcome> {
        check_positive(feed.pressure.value, "flash pressure")?;
        check_finite(feed.mass_flow.value, "flash feed mass flow")?;
        if feed.mass_flow.value < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "flash feed mass flow",
            });
        }

        let x = match feed.quality {
            Some(x) if (0.0..=1.0).contains(&x) => x,
            Some(_) | None => {
                return Err(ComponentError::Infeasible {
                    what: format!(
                        "{} feed of {} at {} Pa is not two-phase",
                        self.name, feed.fluid, feed.pressure.value
                    ),
                });
            }
        };

        let inlet_entropy = match feed.entropy {
            Some(s) => s,
            None => {
                let h_mix = lookup(
                    service,
                    Property::Enthalpy,
                    StateInput::pq(feed.pressure, x),
                    feed.fluid,
                    "flash feed enthalpy",
                )?;
                lookup(
                    service,
                    Property::Entropy,
                    StateInput::hp(h_mix, feed.pressure),
                    feed.fluid,
                    "flash feed entropy",
                )?
            }
        };

        let (m_vap, m_liq) = split(feed.mass_flow.value, x);
        let vapor = self.saturated(service, feed, 1.0, kgps(m_vap))?;
        let liquid = self.saturated(service, feed, 0.0, kgps(m_liq))?;

        Ok(FlashOutcome {
            name: self.name.clone(),
            feed: *feed,
            inlet_entropy,
            vapor,
            liquid,
        })
    }

    fn saturated(
        &self,
        service: &dyn PropertyService,
        feed: &FlashFeed,
        q: f64,
        mass_flow: MassRate,
    ) -> ComponentResult<Stream> {
        let state = StateInput::pq(feed.pressure, q);
        let (h_what, s_what, t_what) = if q == 1.0 {
            (
                "saturated vapor enthalpy",
                "saturated vapor entropy",
                "saturated vapor temperature",
            )
        } else {
            (
                "saturated liquid enthalpy",
                "saturated liquid entropy",
                "saturated liquid temperature",
            )
        };
        let h = lookup(service, Property::Enthalpy, state, feed.fluid, h_what)?;
        let s = lookup(service, Property::Entropy, state, feed.fluid, s_what)?;
        let t = lookup(service, Property::Temperature, state, feed.fluid, t_what)?;

        Ok(Stream::from_hp(feed.fluid, h, feed.pressure, mass_flow)
            .with_entropy(s)
            .with_temperature(k(t))
            .with_raw_quality(q))
    }
}

impl ExergyBalance for FlashOutcome {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_generation(&self, _dead_state: &DeadState) -> f64 {
        let s_vap = self.vapor.entropy.unwrap_or_default();
        let s_liq = self.liquid.entropy.unwrap_or_default();
        self.vapor.mass_flow.value * s_vap + self.liquid.mass_flow.value * s_liq
            - self.feed.mass_flow.value * self.inlet_entropy
    }

    fn mass_in(&self) -> MassRate {
        self.feed.mass_flow
    }

    fn mass_out(&self) -> MassRate {
        self.vapor.mass_flow + self.liquid.mass_flow
    }
}

/// Vapor and liquid flows for quality `x`, summing to exactly `m`.
///
/// The minor phase is taken as the difference from the major one, which is
/// at least `m / 2` and so subtracts without rounding.
fn split(m: f64, x: f64) -> (f64, f64) {
    if x >= 0.5 {
        let m_vap = x * m;
        (m_vap, m - m_vap)
    } else {
        let m_liq = (1.0 - x) * m;
        (m - m_liq, m_liq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::FailureKind;
    use tc_core::units::pa;
    use proptest::prelude::*;
    use tc_fluids::SimpleTwoPhaseModel;

    fn feed(quality: Option<f64>, entropy: Option<f64>) -> FlashFeed {
        FlashFeed {
            fluid: Species::Propane,
            pressure: pa(6.5e5),
            quality,
            mass_flow: kgps(1.5),
            entropy,
        }
    }

    #[test]
    fn split_follows_quality() {
        let model = SimpleTwoPhaseModel::with_presets();
        let out = FlashSeparator::new("flash")
            .separate(&model, &feed(Some(0.25), None))
            .unwrap();
        assert!((out.vapor.mass_flow.value - 0.375).abs() < 1e-12);
        assert!((out.liquid.mass_flow.value - 1.125).abs() < 1e-12);
        assert_eq!(out.vapor.quality, Some(1.0));
        assert_eq!(out.liquid.quality, Some(0.0));
        assert_eq!(out.vapor.temperature, out.liquid.temperature);
    }

    proptest! {
        #[test]
        fn split_sums_to_the_feed_exactly(m in 1e-6_f64..1e4, x in 0.0_f64..=1.0) {
            let (m_vap, m_liq) = split(m, x);
            prop_assert_eq!(m_vap + m_liq, m);
            prop_assert!(m_vap >= 0.0 && m_liq >= 0.0);
        }
    }

    #[test]
    fn derived_entropy_gives_reversible_split() {
        // A flash at the feed pressure only separates phases already present.
        let model = SimpleTwoPhaseModel::with_presets();
        let out = FlashSeparator::new("flash")
            .separate(&model, &feed(Some(0.4), None))
            .unwrap();
        let s_gen = out.entropy_generation(&DeadState::default());
        assert!(s_gen.abs() < 1e-9, "s_gen = {s_gen}");
    }

    #[test]
    fn supplied_entropy_is_used() {
        let model = SimpleTwoPhaseModel::with_presets();
        let out = FlashSeparator::new("flash")
            .separate(&model, &feed(Some(0.4), Some(-10.0)))
            .unwrap();
        assert_eq!(out.inlet_entropy, -10.0);
    }

    #[test]
    fn single_phase_feed_is_infeasible() {
        let model = SimpleTwoPhaseModel::with_presets();
        let err = FlashSeparator::new("flash")
            .separate(&model, &feed(None, None))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InfeasibleConfiguration);
        assert!(err.to_string().contains("not two-phase"));
    }
}
