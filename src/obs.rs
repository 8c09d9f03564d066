//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `rcs_client.operation` with the
//!   `operation` and `provider` fields, plus a `warn` event for every failure.
//! - Enable `metrics` to increment the `rcs_client_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.
//!
//! The crate never installs a subscriber or recorder; the host application owns both.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Credential synthesis.
	Authenticate,
	/// Facade or provider initialization (including the connectivity probe).
	Initialize,
	/// Outbound message delivery.
	SendMessage,
	/// Capability lookup for a destination address.
	ValidatePhoneNumber,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "authenticate",
			OperationKind::Initialize => "initialize",
			OperationKind::SendMessage => "send_message",
			OperationKind::ValidatePhoneNumber => "validate_phone_number",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated (or reported) back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a failure outcome and logs the error kind when tracing is enabled.
pub fn record_failure(kind: OperationKind, err: &Error) {
	record_operation_outcome(kind, OperationOutcome::Failure);
	log_failure(kind, err);
}

/// Records the outcome of a finished operation.
pub fn record_result<T>(kind: OperationKind, result: &Result<T>) {
	match result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(e) => record_failure(kind, e),
	}
}
