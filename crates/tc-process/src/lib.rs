//! tc-process: hand-composed process chains and exergy accounting.
//!
//! - [`ExergyLedger`]: per-component exergy destruction, total, dominant
//!   irreversibility and a second-law audit
//! - [`FlashChain`]: throttle, flash drum, one exchanger per phase, mixer
//! - [`CounterflowExchanger`]: pinch placement feasibility and boundary
//!   temperature analysis for a two-stream counterflow exchanger
//! - [`FillingTank`]: rigid insulated vessel charged from a supply line
//! - [`config`]: YAML scenario files for all of the above
//!
//! Every run is a pure function of its configuration and the injected
//! [`PropertyService`](tc_fluids::PropertyService).

pub mod chain;
pub mod config;
pub mod counterflow;
pub mod error;
pub mod integrate;
pub mod ledger;
pub mod tank;

pub use chain::{ChainReport, FlashChain};
pub use config::{
    ChainConfig, CounterflowConfig, Scenario, TankConfig, load_scenario, parse_scenario,
    save_scenario,
};
pub use counterflow::{
    CaseEvaluation, CounterflowAnalysis, CounterflowExchanger, CounterflowReport, Feasibility,
    PinchCase, StreamSide,
};
pub use error::{ProcessError, ProcessResult};
pub use ledger::{ExergyLedger, LedgerEntry};
pub use tank::{FillingTank, MassFlowSchedule, TankReport, TankState};
