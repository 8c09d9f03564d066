//! Signed, time-limited credential records and their transport schemes.

// self
use crate::{_prelude::*, auth::secret::Secret};

/// Transport scheme a credential must be presented with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthScheme {
	/// `Authorization: Bearer <token>`.
	Bearer,
	/// `Authorization: Basic <token>`.
	Basic,
	/// Raw token in a provider-specific header, with no scheme prefix.
	Custom,
}
impl AuthScheme {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthScheme::Bearer => "Bearer",
			AuthScheme::Basic => "Basic",
			AuthScheme::Custom => "Custom",
		}
	}

	/// Formats `token` the way the scheme expects it on the wire.
	pub fn header_value(self, token: &str) -> String {
		match self {
			AuthScheme::Bearer => format!("Bearer {token}"),
			AuthScheme::Basic => format!("Basic {token}"),
			AuthScheme::Custom => token.to_owned(),
		}
	}
}
impl Display for AuthScheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Signed credential issued by a [`CredentialIssuer`](crate::auth::CredentialIssuer).
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
	/// Opaque signed token; callers must avoid logging it.
	pub token: Secret,
	/// Scheme the token must be transmitted with.
	pub scheme: AuthScheme,
	/// Instant the credential was synthesized.
	pub issued_at: OffsetDateTime,
	/// First instant at which the credential is no longer valid.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Returns `true` if `instant` is strictly before the expiry.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks validity against the current UTC instant.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns the value to place in the transport header.
	pub fn header_value(&self) -> String {
		self.scheme.header_value(self.token.expose())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &"<redacted>")
			.field("scheme", &self.scheme)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
