//! Status classification for failed provider responses.
//!
//! The pipeline records each failure in an [`ErrorContext`] (call site, HTTP status, decoded
//! body, retry hint) and turns it into an [`Error`] with [`ErrorContext::into_error`]. Upstream
//! layers never reclassify the result.

// self
use crate::{_prelude::*, error::ErrorKind};

/// Call site a request originates from; decides how `404` is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallContext {
	/// Connectivity probe issued during initialization.
	Probe,
	/// Message delivery.
	SendMessage,
	/// Capability lookup for a destination address.
	Capability,
}
impl CallContext {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallContext::Probe => "probe",
			CallContext::SendMessage => "send_message",
			CallContext::Capability => "capability",
		}
	}
}

/// Primitive description of a failed response.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorContext {
	/// Call site of the failing request.
	pub context: CallContext,
	/// HTTP status code returned by the provider.
	pub http_status: Option<u16>,
	/// Decoded response body (JSON, or the raw text as a string).
	pub body: Option<serde_json::Value>,
	/// Retry-After hint supplied by the provider.
	pub retry_after: Option<Duration>,
}
impl ErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates an empty context for `context`.
	pub fn new(context: CallContext) -> Self {
		Self { context, http_status: None, body: None, retry_after: None }
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the decoded body; text bodies longer than the preview limit are cut and marked
	/// with `…`.
	pub fn with_body(mut self, body: serde_json::Value) -> Self {
		let body = match body {
			serde_json::Value::String(text)
				if text.chars().nth(Self::BODY_PREVIEW_LIMIT).is_some() =>
			{
				let mut preview = text.chars().take(Self::BODY_PREVIEW_LIMIT).collect::<String>();

				preview.push('…');

				serde_json::Value::String(preview)
			},
			body => body,
		};

		self.body = Some(body);

		self
	}

	/// Adds a Retry-After hint.
	pub fn with_retry_after(mut self, delay: Duration) -> Self {
		self.retry_after = Some(delay);

		self
	}

	/// Maps the status onto the error taxonomy.
	pub fn classify(&self) -> ErrorKind {
		classify_status(self.http_status, self.context)
	}

	/// Builds the structured error for this failure.
	pub fn into_error(self, provider: &str) -> Error {
		let kind = self.classify();
		let message = match kind {
			ErrorKind::AuthFailed => "Authentication failed.".to_owned(),
			ErrorKind::NotSupported => "Phone number does not support RCS.".to_owned(),
			ErrorKind::RateLimitExceeded => "Rate limit exceeded.".to_owned(),
			_ if self.http_status == Some(404) => "Resource not found.".to_owned(),
			_ => self.provider_message().unwrap_or_else(|| "Provider request failed.".to_owned()),
		};
		let mut details = serde_json::Map::new();

		details.insert("status".into(), self.http_status.into());
		details.insert("data".into(), self.body.unwrap_or_default());

		if let Some(delay) = self.retry_after {
			details.insert("retryAfterSeconds".into(), delay.whole_seconds().into());
		}

		Error::new(kind, message)
			.with_provider(provider)
			.with_details(serde_json::Value::Object(details))
	}

	fn provider_message(&self) -> Option<String> {
		let body = self.body.as_ref()?;

		body.get("error")
			.or_else(|| body.get("message"))
			.and_then(serde_json::Value::as_str)
			.map(str::to_owned)
	}
}

/// Maps an HTTP status onto the error taxonomy.
pub fn classify_status(status: Option<u16>, context: CallContext) -> ErrorKind {
	match status {
		Some(401 | 403) => ErrorKind::AuthFailed,
		Some(404) if context == CallContext::Capability => ErrorKind::NotSupported,
		Some(429) => ErrorKind::RateLimitExceeded,
		Some(_) => ErrorKind::ProviderError,
		None => ErrorKind::NetworkError,
	}
}
