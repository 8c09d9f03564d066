//! Authenticated request pipeline shared by provider adapters.
//!
//! Every call asks the [`CredentialIssuer`] for a fresh credential, attaches it according to
//! its [`AuthScheme`], dispatches with the configured timeout, and classifies failures exactly
//! once into the client [`Error`] taxonomy. The pipeline holds no credential state of its own
//! and never retries.

pub mod classify;

pub use classify::*;

// crates.io
use reqwest::{
	Method,
	header::{
		AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT,
	},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	auth::{AuthScheme, CredentialIssuer},
	error::ErrorKind,
};

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("rcs-client/", env!("CARGO_PKG_VERSION"));

/// Reqwest-backed executor that signs and classifies provider requests.
#[derive(Clone)]
pub struct HttpPipeline {
	client: ReqwestClient,
	issuer: Arc<dyn CredentialIssuer>,
	provider: String,
	auth_header: HeaderName,
}
impl HttpPipeline {
	/// Builds a pipeline whose custom-scheme credentials travel in `auth_header`.
	pub fn new(
		provider: impl Into<String>,
		issuer: Arc<dyn CredentialIssuer>,
		auth_header: HeaderName,
		timeout: std::time::Duration,
		user_agent: Option<&str>,
	) -> Result<Self> {
		let provider = provider.into();
		let user_agent = HeaderValue::from_str(user_agent.unwrap_or(DEFAULT_USER_AGENT))
			.map_err(|e| {
				Error::new(ErrorKind::ValidationFailed, "User agent is not a valid header value.")
					.with_provider(&provider)
					.with_source(e)
			})?;
		let mut headers = HeaderMap::new();

		headers.insert(USER_AGENT, user_agent);

		let client =
			ReqwestClient::builder().timeout(timeout).default_headers(headers).build().map_err(
				|e| {
					Error::new(ErrorKind::ProviderError, "HTTP client could not be constructed.")
						.with_provider(&provider)
						.with_source(e)
				},
			)?;

		Ok(Self::with_client(provider, issuer, auth_header, client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(
		provider: impl Into<String>,
		issuer: Arc<dyn CredentialIssuer>,
		auth_header: HeaderName,
		client: ReqwestClient,
	) -> Self {
		Self { client, issuer, provider: provider.into(), auth_header }
	}

	/// Provider name stamped on every error.
	pub fn provider(&self) -> &str {
		&self.provider
	}

	/// Issues an authenticated `GET`.
	pub async fn get(&self, url: &str, context: CallContext) -> Result<serde_json::Value> {
		self.execute(Method::GET, url, None, context).await
	}

	/// Issues an authenticated `POST` with a JSON body.
	pub async fn post<B>(&self, url: &str, body: &B, context: CallContext) -> Result<serde_json::Value>
	where
		B: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(body).map_err(|e| {
			Error::new(ErrorKind::ValidationFailed, "Request body could not be serialized.")
				.with_provider(&self.provider)
				.with_source(e)
		})?;

		self.execute(Method::POST, url, Some(body), context).await
	}

	async fn execute(
		&self,
		method: Method,
		url: &str,
		body: Option<Vec<u8>>,
		context: CallContext,
	) -> Result<serde_json::Value> {
		let (name, value) = self.authorization()?;
		let mut request = self.client.request(method, url).header(name, value);

		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, "application/json").body(body);
		}

		let response = request.send().await.map_err(|e| self.map_transport_error(e))?;
		let status = response.status();
		let retry_after = parse_retry_after(response.headers(), OffsetDateTime::now_utc());
		let bytes = response.bytes().await.map_err(|e| self.map_transport_error(e))?;
		let body = decode_body(&bytes);

		if status.is_success() {
			return Ok(body);
		}

		let mut ctx = ErrorContext::new(context).with_http_status(status.as_u16()).with_body(body);

		if let Some(delay) = retry_after {
			ctx = ctx.with_retry_after(delay);
		}

		Err(ctx.into_error(&self.provider))
	}

	fn authorization(&self) -> Result<(HeaderName, HeaderValue)> {
		let credential = self.issuer.issue().map_err(|e| self.auth_failure(e))?;
		let name = match credential.scheme {
			AuthScheme::Custom => self.auth_header.clone(),
			AuthScheme::Bearer | AuthScheme::Basic => AUTHORIZATION,
		};
		let mut value =
			HeaderValue::from_str(&credential.header_value()).map_err(|e| self.auth_failure(e))?;

		value.set_sensitive(true);

		Ok((name, value))
	}

	fn auth_failure(&self, source: impl Into<crate::error::BoxError>) -> Error {
		Error::new(ErrorKind::AuthFailed, "Failed to authenticate request.")
			.with_provider(&self.provider)
			.with_source(source)
	}

	fn map_transport_error(&self, err: ReqwestError) -> Error {
		let mapped = if err.is_builder() {
			Error::new(ErrorKind::ProviderError, "Request setup failed.")
		} else if err.is_timeout() {
			Error::new(ErrorKind::NetworkError, "Request to provider timed out.")
		} else {
			Error::new(ErrorKind::NetworkError, "No response received from provider.")
		};

		mapped.with_provider(&self.provider).with_source(err)
	}
}
impl Debug for HttpPipeline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpPipeline")
			.field("provider", &self.provider)
			.field("auth_header", &self.auth_header)
			.finish()
	}
}

fn decode_body(bytes: &[u8]) -> serde_json::Value {
	if bytes.is_empty() {
		return serde_json::Value::Null;
	}

	serde_json::from_slice(bytes)
		.unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// Accepts delta-seconds or an HTTP date; hints that are already due are dropped.
fn parse_retry_after(headers: &HeaderMap, now: OffsetDateTime) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
	let delay = match raw.parse::<i64>() {
		Ok(secs) => Duration::seconds(secs),
		Err(_) => OffsetDateTime::parse(raw, &Rfc2822).ok()? - now,
	};

	delay.is_positive().then_some(delay)
}
