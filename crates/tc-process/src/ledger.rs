//! Exergy accounting across a chain of unit operations.

use tc_components::ExergyBalance;
use tc_core::DeadState;
use tc_core::units::{Power, watts};
use tracing::warn;

/// Destruction below `-DEFAULT_AUDIT_TOLERANCE_W` is flagged by the audit.
pub const DEFAULT_AUDIT_TOLERANCE_W: f64 = 1e-6;

/// One component's contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub component: String,
    /// Entropy generation rate [W/K].
    pub entropy_generation: f64,
    pub exergy_destroyed: Power,
}

/// Exergy destruction per component, in recording order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExergyLedger {
    dead_state: DeadState,
    entries: Vec<LedgerEntry>,
}

impl ExergyLedger {
    pub fn new(dead_state: DeadState) -> Self {
        Self {
            dead_state,
            entries: Vec::new(),
        }
    }

    pub fn dead_state(&self) -> &DeadState {
        &self.dead_state
    }

    /// Record an operation and return its exergy destruction.
    pub fn record(&mut self, operation: &dyn ExergyBalance) -> Power {
        let s_gen = operation.entropy_generation(&self.dead_state);
        let x_dest = operation.exergy_destruction(&self.dead_state);
        if x_dest.value < -DEFAULT_AUDIT_TOLERANCE_W {
            warn!(
                component = operation.name(),
                x_dest_w = x_dest.value,
                "negative exergy destruction"
            );
        }
        self.entries.push(LedgerEntry {
            component: operation.name().to_string(),
            entropy_generation: s_gen,
            exergy_destroyed: x_dest,
        });
        x_dest
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn get(&self, component: &str) -> Option<Power> {
        self.entries
            .iter()
            .find(|e| e.component == component)
            .map(|e| e.exergy_destroyed)
    }

    /// Sum of all recorded destruction.
    pub fn total(&self) -> Power {
        watts(self.entries.iter().map(|e| e.exergy_destroyed.value).sum())
    }

    /// Component with the largest destruction (dominant irreversibility).
    pub fn dominant(&self) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .max_by(|a, b| a.exergy_destroyed.value.total_cmp(&b.exergy_destroyed.value))
    }

    /// Entries whose destruction is negative beyond `tolerance_w`.
    pub fn second_law_violations(&self, tolerance_w: f64) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.exergy_destroyed.value < -tolerance_w.abs())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
