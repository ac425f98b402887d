//! Orchestration services for board reconciliation.

mod reconciler;

pub use reconciler::{
    Reconciler, ReconcileError, ReconcileResult, ReconcilerConfig, Recovery,
};
