//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use crate::stream::Stream;
use tc_core::numeric::ensure_finite;
use tc_fluids::{Property, PropertyService, Species, StateInput};

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(ComponentError::NonPhysical { what });
    }
    Ok(())
}

/// Backend quality normalized to the two-phase region.
///
/// Backends report single-phase states with a sentinel (CoolProp uses -1);
/// anything outside [0, 1] becomes `None`.
pub fn two_phase_quality(raw: f64) -> Option<f64> {
    (raw.is_finite() && (0.0..=1.0).contains(&raw)).then_some(raw)
}

/// Property lookup with the failing quantity attached to the error.
pub fn lookup(
    service: &dyn PropertyService,
    output: Property,
    input: StateInput,
    fluid: Species,
    what: &'static str,
) -> ComponentResult<f64> {
    let value = service
        .query(output, input, fluid)
        .map_err(|source| ComponentError::Lookup { what, source })?;
    check_finite(value, what)?;
    Ok(value)
}

/// Stream entropy, looked up from `(H, P)` when the stream does not carry it.
pub fn entropy_of(service: &dyn PropertyService, stream: &Stream) -> ComponentResult<f64> {
    match stream.entropy {
        Some(s) => Ok(s),
        None => lookup(
            service,
            Property::Entropy,
            StateInput::hp(stream.enthalpy, stream.pressure),
            stream.fluid,
            "inlet entropy",
        ),
    }
}
