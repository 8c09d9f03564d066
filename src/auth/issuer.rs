//! Credential issuers that synthesize, cache, and refresh signed credentials.
//!
//! [`HmacCredentialIssuer`] signs `{key}:{timestamp}` with HMAC-SHA256 keyed by the API
//! secret and emits `{key}:{timestamp}:{hex signature}` tokens that stay valid for one hour.
//! Synthesis is a pure local computation, so the cached credential is swapped without
//! coordination: concurrent callers may redundantly sign a fresh token, which is harmless.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{
		credential::{AuthScheme, Credential},
		secret::Secret,
	},
	config::AuthCredentials,
	error::ErrorKind,
	obs::{self, OperationKind, OperationOutcome},
};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of every credential synthesized by [`HmacCredentialIssuer`].
pub const CREDENTIAL_TTL: Duration = Duration::seconds(3600);

/// Produces signed, time-limited credentials for outgoing requests.
///
/// Implementations own their cached credential exclusively and must never hand out an
/// expired one from [`issue`](CredentialIssuer::issue).
pub trait CredentialIssuer
where
	Self: Send + Sync,
{
	/// Auth type tag this issuer was registered under.
	fn auth_type(&self) -> &str;

	/// Scheme every credential from this issuer is transmitted with.
	fn scheme(&self) -> AuthScheme;

	/// Returns the cached credential while it is still valid, otherwise synthesizes a new one.
	fn issue(&self) -> Result<Credential>;

	/// Discards the cached credential and synthesizes a new one.
	fn refresh(&self) -> Result<Credential>;

	/// Returns `true` iff a credential exists and the current instant precedes its expiry.
	fn is_valid(&self) -> bool;
}

/// HMAC-SHA256 issuer for the Longears API.
pub struct HmacCredentialIssuer {
	api_key: String,
	api_secret: Secret,
	current: RwLock<Option<Credential>>,
}
impl HmacCredentialIssuer {
	/// Auth type tag used by the registry.
	pub const AUTH_TYPE: &'static str = "longears";

	/// Creates an issuer, failing with [`ErrorKind::AuthInvalid`] when either half of the
	/// key pair is empty.
	pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
		let api_key = api_key.into();
		let api_secret = Secret::new(api_secret);

		if api_key.is_empty() || api_secret.is_empty() {
			return Err(missing_credentials());
		}

		Ok(Self { api_key, api_secret, current: RwLock::new(None) })
	}

	/// Creates an issuer from configuration credentials, where either field may be absent.
	pub fn from_credentials(credentials: &AuthCredentials) -> Result<Self> {
		match (&credentials.api_key, &credentials.api_secret) {
			(Some(key), Some(secret)) => Self::new(key.clone(), secret.expose()),
			_ => Err(missing_credentials()),
		}
	}

	/// Returns the public API key.
	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	/// Returns the cached credential if it is valid at `now`, otherwise signs a new one at `now`.
	pub fn issue_at(&self, now: OffsetDateTime) -> Result<Credential> {
		if let Some(current) = self.current.read().as_ref().filter(|c| c.is_valid_at(now)) {
			return Ok(current.clone());
		}

		self.synthesize(now)
	}

	/// Drops the cached credential and signs a new one at `now`.
	pub fn refresh_at(&self, now: OffsetDateTime) -> Result<Credential> {
		self.current.write().take();

		self.synthesize(now)
	}

	/// Returns `true` iff a credential exists and `instant` precedes its expiry.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.current.read().as_ref().is_some_and(|c| c.is_valid_at(instant))
	}

	fn synthesize(&self, now: OffsetDateTime) -> Result<Credential> {
		const KIND: OperationKind = OperationKind::Authenticate;

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let timestamp_ms = now.unix_timestamp_nanos() / 1_000_000;
		let token = match sign(&self.api_key, self.api_secret.expose(), timestamp_ms) {
			Ok(token) => token,
			Err(e) => {
				obs::record_failure(KIND, &e);

				return Err(e);
			},
		};
		let credential = Credential {
			token: Secret::new(token),
			scheme: AuthScheme::Custom,
			issued_at: now,
			expires_at: now + CREDENTIAL_TTL,
		};

		*self.current.write() = Some(credential.clone());

		obs::record_operation_outcome(KIND, OperationOutcome::Success);

		Ok(credential)
	}
}
impl CredentialIssuer for HmacCredentialIssuer {
	fn auth_type(&self) -> &str {
		Self::AUTH_TYPE
	}

	fn scheme(&self) -> AuthScheme {
		AuthScheme::Custom
	}

	fn issue(&self) -> Result<Credential> {
		self.issue_at(OffsetDateTime::now_utc())
	}

	fn refresh(&self) -> Result<Credential> {
		self.refresh_at(OffsetDateTime::now_utc())
	}

	fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl Debug for HmacCredentialIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HmacCredentialIssuer")
			.field("api_key", &self.api_key)
			.field("api_secret", &self.api_secret)
			.field("credential_set", &self.current.read().is_some())
			.finish()
	}
}

/// Signs `{api_key}:{timestamp_ms}` with HMAC-SHA256 keyed by `api_secret` and returns the
/// three-field `{api_key}:{timestamp_ms}:{hex signature}` token.
pub fn sign(api_key: &str, api_secret: &str, timestamp_ms: i128) -> Result<String> {
	let message = format!("{api_key}:{timestamp_ms}");
	let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes()).map_err(|e| {
		Error::new(ErrorKind::AuthFailed, "Failed to authenticate with Longears.")
			.with_provider(HmacCredentialIssuer::AUTH_TYPE)
			.with_source(e.to_string())
	})?;

	mac.update(message.as_bytes());

	let signature = hex::encode(mac.finalize().into_bytes());

	Ok(format!("{message}:{signature}"))
}

fn missing_credentials() -> Error {
	Error::new(ErrorKind::AuthInvalid, "Longears authentication requires apiKey and apiSecret.")
		.with_provider(HmacCredentialIssuer::AUTH_TYPE)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn issuer() -> HmacCredentialIssuer {
		HmacCredentialIssuer::new("test-api-key", "test-api-secret")
			.expect("Issuer fixture should accept a full key pair.")
	}

	#[test]
	fn signing_matches_reference_vector() {
		let token = sign("test-api-key", "test-api-secret", 1_672_531_200_000)
			.expect("Signing should succeed for any secret length.");

		assert_eq!(
			token,
			"test-api-key:1672531200000:63454758a2006ff0d7cab3ad1d940a623581b1cb97a9b643c1c14c7b26bc5b9d"
		);
	}

	#[test]
	fn tokens_have_three_fields_led_by_key() {
		let credential = issuer()
			.issue_at(macros::datetime!(2023-01-01 00:00 UTC))
			.expect("Issuing should succeed.");
		let fields = credential.token.expose().split(':').collect::<Vec<_>>();

		assert_eq!(fields.len(), 3);
		assert_eq!(fields[0], "test-api-key");
		assert_eq!(fields[1], "1672531200000");
		assert_eq!(fields[2].len(), 64);
		assert_eq!(credential.scheme, AuthScheme::Custom);
		assert_eq!(credential.expires_at, macros::datetime!(2023-01-01 01:00 UTC));
	}

	#[test]
	fn different_timestamps_produce_different_tokens() {
		let issuer = issuer();
		let first = issuer
			.refresh_at(macros::datetime!(2023-01-01 00:00 UTC))
			.expect("First refresh should succeed.");
		let second = issuer
			.refresh_at(macros::datetime!(2023-01-01 00:00:00.001 UTC))
			.expect("Second refresh should succeed.");

		assert_ne!(first.token, second.token);
	}

	#[test]
	fn validity_tracks_issuance_and_expiry() {
		let issuer = issuer();

		assert!(!issuer.is_valid());

		issuer.issue().expect("Issuing should succeed.");

		assert!(issuer.is_valid());

		let past = OffsetDateTime::now_utc() - Duration::hours(2);

		issuer.refresh_at(past).expect("Refreshing with a past instant should succeed.");

		assert!(!issuer.is_valid());

		let fresh = issuer.issue().expect("Issuing after expiry should succeed.");

		assert!(fresh.is_valid());
		assert!(issuer.is_valid());
	}

	#[test]
	fn issue_reuses_valid_credential() {
		let issuer = issuer();
		let now = macros::datetime!(2023-01-01 00:00 UTC);
		let first = issuer.issue_at(now).expect("Issuing should succeed.");
		let second =
			issuer.issue_at(now + Duration::minutes(30)).expect("Reissuing should succeed.");
		let third = issuer.issue_at(now + CREDENTIAL_TTL).expect("Issuing at expiry should succeed.");

		assert_eq!(first.token, second.token);
		assert_ne!(first.token, third.token);
	}

	#[test]
	fn refresh_always_changes_the_token() {
		let issuer = issuer();
		let first = issuer.issue().expect("Issuing should succeed.");

		std::thread::sleep(std::time::Duration::from_millis(2));

		let refreshed = issuer.refresh().expect("Refreshing should succeed.");

		assert_ne!(first.token, refreshed.token);
	}

	#[test]
	fn construction_requires_both_halves() {
		let neither = AuthCredentials { api_key: None, api_secret: None };
		let key_only = AuthCredentials { api_key: Some("key".into()), api_secret: None };
		let secret_only = AuthCredentials { api_key: None, api_secret: Some(Secret::new("s")) };

		for credentials in [neither, key_only, secret_only] {
			let err = HmacCredentialIssuer::from_credentials(&credentials)
				.expect_err("Incomplete credentials should be rejected.");

			assert_eq!(err.kind, ErrorKind::AuthInvalid);
		}

		let err = HmacCredentialIssuer::new("", "secret")
			.expect_err("Empty API keys should be rejected.");

		assert_eq!(err.kind, ErrorKind::AuthInvalid);
	}
}
