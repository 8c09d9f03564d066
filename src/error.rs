//! Client-level error type shared by the issuer, pipeline, providers, and facade.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used as the nested cause of an [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Closed taxonomy of failure categories surfaced by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// Client or provider initialization did not complete.
	InitializationFailed,
	/// An operation was attempted before `initialize` succeeded.
	NotInitialized,
	/// The configured provider name is not registered.
	ProviderNotFound,
	/// The provider answered with an unexpected or unclassified failure.
	ProviderError,
	/// The provider rejected the request credentials.
	AuthFailed,
	/// The supplied auth configuration is missing or malformed.
	AuthInvalid,
	/// A message could not be sent.
	MessageSendFailed,
	/// The destination address is not valid E.164.
	InvalidPhoneNumber,
	/// No response was received from the provider.
	NetworkError,
	/// The provider throttled the request.
	RateLimitExceeded,
	/// Local validation failed.
	ValidationFailed,
	/// The capability lookup could not be completed.
	CapabilityCheckFailed,
	/// The provider does not support the requested resource for this destination.
	NotSupported,
	/// Anything not covered above.
	Unknown,
}
impl ErrorKind {
	/// Returns a stable label suitable for logs, metrics, and serialized payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::InitializationFailed => "INITIALIZATION_FAILED",
			ErrorKind::NotInitialized => "NOT_INITIALIZED",
			ErrorKind::ProviderNotFound => "PROVIDER_NOT_FOUND",
			ErrorKind::ProviderError => "PROVIDER_ERROR",
			ErrorKind::AuthFailed => "AUTH_FAILED",
			ErrorKind::AuthInvalid => "AUTH_INVALID",
			ErrorKind::MessageSendFailed => "MESSAGE_SEND_FAILED",
			ErrorKind::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
			ErrorKind::NetworkError => "NETWORK_ERROR",
			ErrorKind::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
			ErrorKind::ValidationFailed => "VALIDATION_FAILED",
			ErrorKind::CapabilityCheckFailed => "CAPABILITY_CHECK_FAILED",
			ErrorKind::NotSupported => "NOT_SUPPORTED",
			ErrorKind::Unknown => "UNKNOWN",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical client error exposed by public APIs.
///
/// Every error records the provider it originated from (when known), optional structured
/// details such as the HTTP status and response body, an optional nested cause, and the
/// instant it was created.
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
	/// Failure category.
	pub kind: ErrorKind,
	/// Human-readable summary.
	pub message: String,
	/// Provider name that produced the failure.
	pub provider: Option<String>,
	/// Structured context (HTTP status, body, offending input).
	pub details: Option<serde_json::Value>,
	/// Nested cause, if any.
	#[source]
	pub source: Option<BoxError>,
	/// Creation instant.
	pub timestamp: OffsetDateTime,
}
impl Error {
	/// Creates an error of the given kind stamped with the current instant.
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			provider: None,
			details: None,
			source: None,
			timestamp: OffsetDateTime::now_utc(),
		}
	}

	/// Shortcut for [`ErrorKind::NotInitialized`].
	pub fn not_initialized(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::NotInitialized, message)
	}

	/// Attaches the originating provider name.
	pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
		self.provider = Some(provider.into());

		self
	}

	/// Attaches structured details.
	pub fn with_details(mut self, details: serde_json::Value) -> Self {
		self.details = Some(details);

		self
	}

	/// Attaches a nested cause.
	pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
		self.source = Some(source.into());

		self
	}

	/// Returns `true` when the error belongs to `kind`.
	pub fn is(&self, kind: ErrorKind) -> bool {
		self.kind == kind
	}

	/// Renders the error as a JSON object suitable for shipping across process boundaries.
	pub fn to_json(&self) -> serde_json::Value {
		let timestamp = self
			.timestamp
			.format(&time::format_description::well_known::Rfc3339)
			.unwrap_or_default();
		let cause = self.source.as_ref().map(|source| source.to_string());

		serde_json::json!({
			"name": "RcsError",
			"message": self.message,
			"code": self.kind.as_str(),
			"provider": self.provider,
			"details": self.details,
			"cause": cause,
			"timestamp": timestamp,
		})
	}
}
