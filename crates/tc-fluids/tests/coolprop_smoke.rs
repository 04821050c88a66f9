//! CoolProp integration tests.
//!
//! Broad tolerances keep these independent of the CoolProp release.

#![cfg(feature = "coolprop")]

use tc_core::units::{k, pa};
use tc_fluids::{CoolPropService, Property, PropertyService, Species, StateInput};

#[test]
fn water_at_1atm_300k() {
    let service = CoolPropService::new();
    let rho = service
        .query(
            Property::Density,
            StateInput::pt(pa(101_325.0), k(300.0)),
            Species::Water,
        )
        .unwrap();
    assert!(rho > 900.0 && rho < 1100.0, "rho = {rho} kg/m³");
}

#[test]
fn propane_flash_quality() {
    let service = CoolPropService::new();
    let h = service
        .query(
            Property::Enthalpy,
            StateInput::pt(pa(2.5e6), k(330.0)),
            Species::Propane,
        )
        .unwrap();
    let q = service
        .query(
            Property::Quality,
            StateInput::hp(h, pa(6.5e5)),
            Species::Propane,
        )
        .unwrap();
    assert!(q > 0.0 && q < 1.0, "q = {q}");
}

#[test]
fn single_phase_quality_is_sentinel() {
    let service = CoolPropService::new();
    let q = service
        .query(
            Property::Quality,
            StateInput::pt(pa(101_325.0), k(300.0)),
            Species::N2,
        )
        .unwrap();
    assert!(q < 0.0);
}
