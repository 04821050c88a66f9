//! The property lookup contract.

use crate::error::FluidResult;
use crate::property::Property;
use crate::species::Species;
use crate::state::StateInput;

/// Stateless thermodynamic property lookup.
///
/// `query(output, input, fluid)` maps a requested property, an input pair and
/// a fluid to a value in SI base units. Implementations fail with a
/// descriptive [`FluidError`](crate::FluidError) when the fluid is unknown or
/// the pair does not determine a valid state.
///
/// Quality queries outside the two-phase envelope follow the CoolProp
/// convention and may return a sentinel (typically `-1`) instead of failing;
/// callers decide how to interpret it.
pub trait PropertyService: Send + Sync {
    /// Backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Evaluate `output` at the state fixed by `input` for `fluid`.
    fn query(&self, output: Property, input: StateInput, fluid: Species) -> FluidResult<f64>;
}
