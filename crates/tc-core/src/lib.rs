//! tc-core: stable foundation for thermochain.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - dead_state (reference environment for exergy analysis)
//! - error (shared error types and the failure taxonomy)

pub mod dead_state;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use dead_state::DeadState;
pub use error::{FailureKind, TcError, TcResult};
pub use numeric::*;
pub use units::*;
