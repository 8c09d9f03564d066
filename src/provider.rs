//! Provider adapters: the only layer that knows a backend's wire format.
//!
//! [`RcsProvider`] is the contract the facade drives. Adapters own their [`HttpPipeline`],
//! move through [`ProviderState`] exactly once, and translate between the provider-neutral
//! [`message`](crate::message) models and their backend's JSON.
//!
//! [`HttpPipeline`]: crate::http::HttpPipeline

pub mod longears;

pub use longears::LongearsProvider;

// self
use crate::{
	_prelude::*,
	config::ProviderConfig,
	message::{MessageResponse, RcsMessage, ValidateOptions, ValidationResult},
};

/// Boxed future returned by [`RcsProvider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Contract implemented by every backend adapter.
pub trait RcsProvider
where
	Self: Send + Sync,
{
	/// Stable provider name stamped on errors.
	fn name(&self) -> &str;

	/// Current lifecycle state.
	fn state(&self) -> ProviderState;

	/// Applies `config`, probes connectivity, and transitions to `Ready` or `Failed`.
	///
	/// Calling it again once `Ready` is a no-op; once `Failed` the adapter must be discarded.
	fn initialize<'a>(&'a self, config: &'a ProviderConfig) -> ProviderFuture<'a, ()>;

	/// Validates, translates, and delivers `message`.
	fn send_message<'a>(&'a self, message: &'a RcsMessage) -> ProviderFuture<'a, MessageResponse>;

	/// Looks up the enriched feature set of `phone_number`.
	///
	/// Only precondition failures are returned as errors; every downstream failure is reported
	/// as [`ValidationResult::Failure`].
	fn validate_phone_number<'a>(
		&'a self,
		phone_number: &'a str,
		options: ValidateOptions,
	) -> ProviderFuture<'a, ValidationResult>;
}

/// Adapter lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProviderState {
	#[default]
	/// Constructed; `initialize` has not run.
	Uninitialized,
	/// The connectivity probe is in flight.
	Initializing,
	/// Probe succeeded; operations are accepted.
	Ready,
	/// Probe failed; the adapter must be discarded.
	Failed,
}
impl ProviderState {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderState::Uninitialized => "uninitialized",
			ProviderState::Initializing => "initializing",
			ProviderState::Ready => "ready",
			ProviderState::Failed => "failed",
		}
	}
}
impl Display for ProviderState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
