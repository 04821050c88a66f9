//! tc-components: unit operations for steady-flow process chains.
//!
//! Provides:
//! - `Throttle`: isenthalpic pressure letdown
//! - `FlashSeparator`: splits a two-phase feed into saturated vapor and liquid
//! - `HeatExchanger`: isobaric heating or cooling to a target temperature
//! - `Mixer`: adiabatic constant-pressure mixing of two streams
//!
//! Every operation is a pure `compute(service, inlet) -> outcome` call. The
//! outcome carries the inlet and outlet streams and implements
//! [`ExergyBalance`], so exergy destruction can be read against any
//! [`DeadState`](tc_core::DeadState).
//!
//! # Example
//!
//! ```
//! use tc_components::{ExergyBalance, Stream, Throttle};
//! use tc_core::DeadState;
//! use tc_core::units::{k, kgps, pa};
//! use tc_fluids::{SimpleTwoPhaseModel, Species};
//!
//! let model = SimpleTwoPhaseModel::with_presets();
//! let inlet = Stream::from_pt(&model, Species::Propane, pa(2.5e6), k(330.0), kgps(1.5)).unwrap();
//!
//! let valve = Throttle::new("expansion valve", pa(6.5e5));
//! let outcome = valve.compute(&model, &inlet).unwrap();
//!
//! assert_eq!(outcome.outlet.enthalpy, inlet.enthalpy);
//! assert!(outcome.outlet.quality.is_some());
//! assert!(outcome.exergy_destruction(&DeadState::default()).value >= 0.0);
//! ```

pub mod common;
pub mod error;
pub mod flash;
pub mod heat_exchanger;
pub mod mixer;
pub mod stream;
pub mod throttle;
pub mod traits;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use flash::{FlashFeed, FlashOutcome, FlashSeparator};
pub use heat_exchanger::{HeatBoundary, HeatExchanger, HeatExchangerOutcome};
pub use mixer::{Mixer, MixerOutcome};
pub use stream::Stream;
pub use throttle::{Throttle, ThrottleOutcome};
pub use traits::ExergyBalance;
