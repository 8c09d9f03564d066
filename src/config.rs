//! Plain configuration values consumed by the client.
//!
//! All structures deserialize from camelCase JSON so existing configuration documents can be
//! loaded directly. Nothing here reads the process environment.

// self
use crate::{_prelude::*, auth::Secret};

/// Endpoint used when neither the options nor `initialize` supply one.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.longears.mobi/v1";
/// Request timeout used when the options omit one.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(30_000);

/// Top-level client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
	/// Provider name resolved through the registry (case-insensitive).
	pub provider: String,
	/// Auth type and credentials used to build the credential issuer.
	pub auth: AuthConfig,
	/// Transport and provider options.
	#[serde(default)]
	pub options: ClientOptions,
}
impl ClientConfig {
	/// Creates a configuration with default options.
	pub fn new(provider: impl Into<String>, auth: AuthConfig) -> Self {
		Self { provider: provider.into(), auth, options: ClientOptions::default() }
	}

	/// Replaces the options block.
	pub fn with_options(mut self, options: ClientOptions) -> Self {
		self.options = options;

		self
	}
}

/// Auth type tag plus the long-lived key pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
	/// Auth type tag, matched exactly against the registry.
	#[serde(rename = "type")]
	pub kind: String,
	/// Long-lived key pair.
	pub credentials: AuthCredentials,
}
impl AuthConfig {
	/// Creates a config for the provided auth type and key pair.
	pub fn new(
		kind: impl Into<String>,
		api_key: impl Into<String>,
		api_secret: impl Into<String>,
	) -> Self {
		Self {
			kind: kind.into(),
			credentials: AuthCredentials {
				api_key: Some(api_key.into()),
				api_secret: Some(Secret::new(api_secret)),
			},
		}
	}
}

/// Long-lived key pair; either half may be absent in a loaded document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCredentials {
	/// Public API key.
	pub api_key: Option<String>,
	/// API secret used as the HMAC key.
	pub api_secret: Option<Secret>,
}

/// Optional knobs forwarded to the provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
	/// Endpoint override.
	pub api_endpoint: Option<String>,
	/// Request timeout in milliseconds.
	pub timeout: Option<u64>,
	/// Default agent identifier appended to capability lookups.
	pub agent_id: Option<String>,
	/// Retry attempts hint for callers that implement retries.
	pub retry_attempts: Option<u32>,
	/// Delay between retries in milliseconds, for callers that implement retries.
	pub retry_delay: Option<u64>,
	/// Region hint.
	pub region: Option<String>,
	/// Webhook URL registered with the provider.
	pub webhook_url: Option<String>,
	/// `User-Agent` override.
	pub user_agent: Option<String>,
}
impl ClientOptions {
	/// Sets the endpoint override.
	pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.api_endpoint = Some(endpoint.into());

		self
	}

	/// Sets the request timeout in milliseconds.
	pub fn timeout_ms(mut self, timeout: u64) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets the default agent identifier.
	pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
		self.agent_id = Some(agent_id.into());

		self
	}
}

/// Provider-facing configuration derived from [`ClientOptions`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Endpoint override with one trailing slash stripped.
	pub api_endpoint: Option<String>,
	/// Request timeout.
	pub timeout: Option<std::time::Duration>,
	/// Default agent identifier for capability lookups.
	pub agent_id: Option<String>,
	/// Retry attempts hint; never acted upon by the client.
	pub retry_attempts: Option<u32>,
	/// Retry delay hint; never acted upon by the client.
	pub retry_delay: Option<std::time::Duration>,
	/// Region hint.
	pub region: Option<String>,
	/// Webhook URL.
	pub webhook_url: Option<String>,
	/// `User-Agent` override.
	pub user_agent: Option<String>,
}
impl ProviderConfig {
	/// Returns the configured timeout or [`DEFAULT_TIMEOUT`].
	pub fn timeout_or_default(&self) -> std::time::Duration {
		self.timeout.unwrap_or(DEFAULT_TIMEOUT)
	}
}
impl From<&ClientOptions> for ProviderConfig {
	fn from(options: &ClientOptions) -> Self {
		Self {
			api_endpoint: options.api_endpoint.as_deref().map(strip_trailing_slash),
			timeout: options.timeout.map(std::time::Duration::from_millis),
			agent_id: options.agent_id.clone(),
			retry_attempts: options.retry_attempts,
			retry_delay: options.retry_delay.map(std::time::Duration::from_millis),
			region: options.region.clone(),
			webhook_url: options.webhook_url.clone(),
			user_agent: options.user_agent.clone(),
		}
	}
}

/// Removes a single trailing `/` from an endpoint.
pub fn strip_trailing_slash(endpoint: &str) -> String {
	endpoint.strip_suffix('/').unwrap_or(endpoint).to_owned()
}
