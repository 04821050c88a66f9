//! Unit-operation integration tests on the analytic propane model.

use proptest::prelude::*;
use tc_components::{
    ExergyBalance, FlashFeed, FlashSeparator, HeatBoundary, HeatExchanger, Mixer, Stream,
    Throttle,
};
use tc_core::units::{k, kgps, pa};
use tc_core::{DeadState, Tolerances, nearly_equal};
use tc_fluids::{SimpleTwoPhaseModel, Species};

const MASS_TOL: Tolerances = Tolerances {
    abs: 1e-12,
    rel: 1e-12,
};

fn model() -> SimpleTwoPhaseModel {
    SimpleTwoPhaseModel::with_presets()
}

#[test]
fn throttle_then_flash_splits_the_feed() {
    let model = model();
    let inlet = Stream::from_pt(&model, Species::Propane, pa(2.5e6), k(330.0), kgps(1.5)).unwrap();
    let throttled = Throttle::new("valve", pa(6.5e5))
        .compute(&model, &inlet)
        .unwrap();

    let x = throttled.outlet.quality.unwrap();
    assert!(x > 0.0 && x < 1.0);

    let flash = FlashSeparator::new("flash")
        .separate(&model, &FlashFeed::from_stream(&throttled.outlet))
        .unwrap();
    let total = flash.vapor.mass_flow.value + flash.liquid.mass_flow.value;
    assert_eq!(total, 1.5);
    assert!(nearly_equal(
        flash.mass_out().value,
        throttled.mass_in().value,
        MASS_TOL
    ));
}

#[test]
fn flash_is_idempotent() {
    let model = model();
    let feed = FlashFeed {
        fluid: Species::Propane,
        pressure: pa(6.5e5),
        quality: Some(0.3),
        mass_flow: kgps(1.5),
        entropy: None,
    };
    let separator = FlashSeparator::new("flash");
    let first = separator.separate(&model, &feed).unwrap();
    let second = separator.separate(&model, &feed).unwrap();
    assert_eq!(first, second);
}

#[test]
fn full_chain_second_law() {
    let model = model();
    let dead = DeadState::default();
    let p_low = pa(6.5e5);

    let inlet = Stream::from_pt(&model, Species::Propane, pa(2.5e6), k(330.0), kgps(1.5)).unwrap();
    let throttle = Throttle::new("valve", p_low).compute(&model, &inlet).unwrap();
    let flash = FlashSeparator::new("flash")
        .separate(&model, &FlashFeed::from_stream(&throttle.outlet))
        .unwrap();
    let vapor = HeatExchanger::new("vapor exchanger", k(305.0), HeatBoundary::Ambient)
        .compute(&model, &flash.vapor)
        .unwrap();
    let liquid = HeatExchanger::new("liquid heater", k(345.0), HeatBoundary::Reservoir(k(450.0)))
        .compute(&model, &flash.liquid)
        .unwrap();
    let mixer = Mixer::new("mixer", p_low)
        .compute(&model, &vapor.outlet, &liquid.outlet)
        .unwrap();

    let stages: [&dyn ExergyBalance; 5] = [&throttle, &flash, &vapor, &liquid, &mixer];
    for stage in stages {
        assert!(
            nearly_equal(stage.mass_in().value, stage.mass_out().value, MASS_TOL),
            "{} leaks mass",
            stage.name()
        );
        assert!(
            stage.exergy_destruction(&dead).value > -1e-6,
            "{} violates the second law",
            stage.name()
        );
    }
    assert!(nearly_equal(mixer.outlet.mass_flow.value, 1.5, MASS_TOL));
}

proptest! {
    #[test]
    fn mixing_conserves_mass_and_energy_and_generates_entropy(
        h1 in -50_000.0_f64..800_000.0,
        h2 in -50_000.0_f64..800_000.0,
        m1 in 0.01_f64..5.0,
        m2 in 0.01_f64..5.0,
    ) {
        let model = model();
        let p = pa(6.5e5);
        let a = Stream::from_hp(Species::Propane, h1, p, kgps(m1));
        let b = Stream::from_hp(Species::Propane, h2, p, kgps(m2));
        let out = Mixer::new("mixer", p).compute(&model, &a, &b).unwrap();

        prop_assert!(nearly_equal(out.mass_out().value, m1 + m2, MASS_TOL));
        let energy_in = m1 * h1 + m2 * h2;
        let energy_out = out.outlet.mass_flow.value * out.outlet.enthalpy;
        let scale = (m1 * h1.abs() + m2 * h2.abs()).max(1.0);
        prop_assert!((energy_in - energy_out).abs() <= 1e-12 * scale);
        prop_assert!(out.entropy_generation(&DeadState::default()) > -1e-6);
    }
}
