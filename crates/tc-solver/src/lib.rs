//! Property solver: inverts an opaque property lookup by bisection.
//!
//! Given a known property and a target value for a second property, find the
//! value of an unknown property that reproduces the target:
//!
//! ```text
//! find x in [low, high] such that  target(known = k, unknown = x) ≈ t
//! ```
//!
//! The lookup is treated as a black box behind [`PropertyService`]; it must be
//! monotonically increasing in the unknown over the bracket. That precondition
//! is documented, not checked.
//!
//! [`PropertyService`]: tc_fluids::PropertyService

pub mod bisection;
pub mod error;
pub mod problem;
pub mod solution;

pub use bisection::{Evaluation, IterationEvent, solve, solve_with_progress};
pub use error::{SolverError, SolverResult};
pub use problem::{RecoveryPolicy, SolverProblem};
pub use solution::{PropertySolution, Status};
