//! tc-fluids: property lookups for thermochain.
//!
//! Provides:
//! - The property vocabulary (`Property`) and input pairs (`StateInput`)
//! - Fluid identities (`Species`)
//! - The `PropertyService` trait every unit operation and solver consumes
//! - An analytic two-phase model usable without any native library
//! - A CoolProp backend (feature `coolprop`)
//!
//! # Architecture
//!
//! The rest of thermochain only ever talks to `&dyn PropertyService`. The
//! service is stateless from the caller's point of view: one call maps
//! `(output, input pair, fluid)` to a number or a descriptive error.
//!
//! # Example
//!
//! ```
//! use tc_core::units::{k, pa};
//! use tc_fluids::{Property, PropertyService, SimpleTwoPhaseModel, Species, StateInput};
//!
//! let model = SimpleTwoPhaseModel::with_presets();
//! let h = model
//!     .query(
//!         Property::Enthalpy,
//!         StateInput::pt(pa(2.5e6), k(330.0)),
//!         Species::Propane,
//!     )
//!     .unwrap();
//! assert!(h.is_finite());
//! ```

pub mod analytic;
#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod property;
pub mod service;
pub mod species;
pub mod state;

// Re-exports for ergonomics
pub use analytic::{SimpleTwoPhaseModel, TwoPhaseParams};
#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropService;
pub use error::{FluidError, FluidResult};
pub use property::Property;
pub use service::PropertyService;
pub use species::Species;
pub use state::StateInput;
