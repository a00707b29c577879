pub mod apply_plan;
pub mod entry;
pub mod run_report;

pub use apply_plan::ApplyPlan;
pub use entry::{Entry, Manifest, MANIFEST_SUFFIXES};
pub use run_report::{ApplyFailures, ApplyOutcome, OperationKind, OutcomeStatus, RunReport};
