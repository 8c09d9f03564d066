// self
use crate::obs::{OperationKind, OperationOutcome};

/// Counter incremented once per recorded outcome, labeled by `operation` and `outcome`.
pub const OPERATION_COUNTER: &str = "rcs_client_operation_total";

/// Increments [`OPERATION_COUNTER`] on the globally installed recorder.
#[cfg(feature = "metrics")]
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	metrics::counter!(
		OPERATION_COUNTER,
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
}

/// No-op; enable the `metrics` feature to export counters.
#[cfg(not(feature = "metrics"))]
pub fn record_operation_outcome(_: OperationKind, _: OperationOutcome) {}
