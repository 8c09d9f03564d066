//! Adapter for the Longears RCS backend.
//!
//! The adapter signs every request with the `X-Longears-Auth` header, probes `GET /status`
//! once during [`initialize`](RcsProvider::initialize), and translates between the neutral
//! message models and the Longears JSON shapes defined in [`wire`].

pub mod wire;

// crates.io
use reqwest::header::HeaderName;
// self
use crate::{
	_prelude::*,
	auth::CredentialIssuer,
	config::{self, ProviderConfig},
	error::ErrorKind,
	http::{CallContext, HttpPipeline},
	message::{MessageResponse, RcsMessage, ValidateOptions, ValidationResult},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	phone,
	provider::{ProviderFuture, ProviderState, RcsProvider},
};

/// Longears adapter backed by an [`HttpPipeline`].
pub struct LongearsProvider {
	pipeline: HttpPipeline,
	endpoint: RwLock<String>,
	agent_id: RwLock<Option<String>>,
	state: Mutex<ProviderState>,
	init_guard: AsyncMutex<()>,
}
impl LongearsProvider {
	/// Canonical provider name.
	pub const NAME: &'static str = "longears";
	/// Header carrying the signed credential.
	pub const AUTH_HEADER: &'static str = "x-longears-auth";

	/// Creates an uninitialized adapter that signs requests with `issuer`.
	pub fn new(issuer: Arc<dyn CredentialIssuer>, config: &ProviderConfig) -> Result<Self> {
		let pipeline = HttpPipeline::new(
			Self::NAME,
			issuer,
			HeaderName::from_static(Self::AUTH_HEADER),
			config.timeout_or_default(),
			config.user_agent.as_deref(),
		)?;

		Ok(Self::with_pipeline(pipeline, config))
	}

	/// Creates an uninitialized adapter around an existing pipeline.
	pub fn with_pipeline(pipeline: HttpPipeline, config: &ProviderConfig) -> Self {
		let endpoint = config
			.api_endpoint
			.as_deref()
			.map(config::strip_trailing_slash)
			.unwrap_or_else(|| config::DEFAULT_API_ENDPOINT.to_owned());

		Self {
			pipeline,
			endpoint: RwLock::new(endpoint),
			agent_id: RwLock::new(config.agent_id.clone()),
			state: Mutex::new(ProviderState::Uninitialized),
			init_guard: AsyncMutex::new(()),
		}
	}

	/// Base URL requests are issued against.
	pub fn endpoint(&self) -> String {
		self.endpoint.read().clone()
	}

	fn set_state(&self, state: ProviderState) {
		*self.state.lock() = state;
	}

	fn ensure_ready(&self) -> Result<()> {
		if self.state() == ProviderState::Ready {
			Ok(())
		} else {
			Err(Error::not_initialized("Provider not initialized. Call initialize() first.")
				.with_provider(Self::NAME))
		}
	}

	fn apply_config(&self, config: &ProviderConfig) -> Result<String> {
		let endpoint = match config.api_endpoint.as_deref() {
			Some(endpoint) => config::strip_trailing_slash(endpoint),
			None => self.endpoint(),
		};

		Url::parse(&endpoint).map_err(|e| {
			Error::new(ErrorKind::ValidationFailed, format!("Invalid API endpoint: {endpoint}."))
				.with_provider(Self::NAME)
				.with_source(e)
		})?;

		*self.endpoint.write() = endpoint.clone();

		if let Some(agent_id) = &config.agent_id {
			*self.agent_id.write() = Some(agent_id.clone());
		}

		Ok(endpoint)
	}

	async fn probe(&self, config: &ProviderConfig) -> Result<()> {
		let endpoint = self.apply_config(config)?;

		self.pipeline.get(&format!("{endpoint}/status"), CallContext::Probe).await?;

		Ok(())
	}

	async fn initialize_inner(&self, config: &ProviderConfig) -> Result<()> {
		let _guard = self.init_guard.lock().await;

		match self.state() {
			ProviderState::Ready => return Ok(()),
			ProviderState::Failed =>
				return Err(Error::new(
					ErrorKind::InitializationFailed,
					"Longears RCS provider previously failed to initialize.",
				)
				.with_provider(Self::NAME)),
			ProviderState::Uninitialized | ProviderState::Initializing => {},
		}

		self.set_state(ProviderState::Initializing);

		match self.probe(config).await {
			Ok(()) => {
				self.set_state(ProviderState::Ready);

				Ok(())
			},
			Err(e) => {
				self.set_state(ProviderState::Failed);

				Err(Error::new(
					ErrorKind::InitializationFailed,
					"Failed to initialize Longears RCS provider.",
				)
				.with_provider(Self::NAME)
				.with_source(e))
			},
		}
	}

	async fn send_message_inner(&self, message: &RcsMessage) -> Result<MessageResponse> {
		self.ensure_ready()?;

		if !phone::is_valid_e164(&message.to) {
			return Err(Error::new(
				ErrorKind::InvalidPhoneNumber,
				format!("Invalid phone number format: {}.", message.to),
			)
			.with_provider(Self::NAME)
			.with_details(serde_json::json!({ "phoneNumber": message.to })));
		}

		let endpoint = self.endpoint();
		let body = wire::translate_message(message);
		let raw = self
			.pipeline
			.post(&format!("{endpoint}/messages"), &body, CallContext::SendMessage)
			.await?;
		let receipt = wire::decode::<wire::WireReceipt>(raw.clone()).map_err(|e| {
			Error::new(ErrorKind::MessageSendFailed, "Provider returned an unreadable receipt.")
				.with_provider(Self::NAME)
				.with_details(serde_json::json!({ "path": e.path().to_string(), "data": raw }))
				.with_source(e.into_inner())
		})?;

		Ok(wire::translate_receipt(receipt, raw, OffsetDateTime::now_utc()))
	}

	async fn lookup_capabilities(
		&self,
		phone_number: &str,
		options: ValidateOptions,
	) -> Result<ValidationResult> {
		self.ensure_ready()?;

		let formatted =
			phone::format_phone_number(phone_number).unwrap_or_else(|| phone_number.to_owned());
		let agent_id = options
			.agent_id
			.filter(|id| !id.is_empty())
			.or_else(|| self.agent_id.read().clone());
		let url = capability_url(&self.endpoint(), &formatted, agent_id.as_deref());

		let capabilities = match self.fetch_capabilities(&url).await {
			Ok(capabilities) => capabilities,
			Err(e) => {
				obs::record_failure(OperationKind::ValidatePhoneNumber, &e);

				return Ok(ValidationResult::Failure {
					error: format!("Failed to validate phone number: {e}"),
				});
			},
		};

		Ok(ValidationResult::Success {
			capability: wire::translate_capabilities(
				formatted,
				capabilities,
				OffsetDateTime::now_utc(),
			),
		})
	}

	async fn fetch_capabilities(&self, url: &str) -> Result<wire::WireCapabilities> {
		let raw = self.pipeline.get(url, CallContext::Capability).await?;

		wire::decode(raw).map_err(|e| {
			Error::new(
				ErrorKind::CapabilityCheckFailed,
				format!("Provider returned an unreadable capability report at {}.", e.path()),
			)
			.with_provider(Self::NAME)
			.with_source(e.into_inner())
		})
	}
}
impl RcsProvider for LongearsProvider {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn state(&self) -> ProviderState {
		*self.state.lock()
	}

	fn initialize<'a>(&'a self, config: &'a ProviderConfig) -> ProviderFuture<'a, ()> {
		Box::pin(async move {
			const KIND: OperationKind = OperationKind::Initialize;

			let span = OperationSpan::new(KIND, Self::NAME);

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let result = span.instrument(self.initialize_inner(config)).await;

			obs::record_result(KIND, &result);

			result
		})
	}

	fn send_message<'a>(&'a self, message: &'a RcsMessage) -> ProviderFuture<'a, MessageResponse> {
		Box::pin(async move {
			const KIND: OperationKind = OperationKind::SendMessage;

			let span = OperationSpan::new(KIND, Self::NAME);

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let result = span.instrument(self.send_message_inner(message)).await;

			obs::record_result(KIND, &result);

			result
		})
	}

	fn validate_phone_number<'a>(
		&'a self,
		phone_number: &'a str,
		options: ValidateOptions,
	) -> ProviderFuture<'a, ValidationResult> {
		Box::pin(async move {
			const KIND: OperationKind = OperationKind::ValidatePhoneNumber;

			let span = OperationSpan::new(KIND, Self::NAME);

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let result = span.instrument(self.lookup_capabilities(phone_number, options)).await;

			match &result {
				Ok(ValidationResult::Success { .. }) =>
					obs::record_operation_outcome(KIND, OperationOutcome::Success),
				Ok(ValidationResult::Failure { .. }) => {},
				Err(e) => obs::record_failure(KIND, e),
			}

			result
		})
	}
}
impl Debug for LongearsProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LongearsProvider")
			.field("endpoint", &*self.endpoint.read())
			.field("state", &self.state())
			.finish()
	}
}

fn capability_url(endpoint: &str, phone_number: &str, agent_id: Option<&str>) -> String {
	let mut url =
		format!("{endpoint}/capabilities?phoneNumber={}", urlencoding::encode(phone_number));

	if let Some(agent_id) = agent_id.filter(|id| !id.is_empty()) {
		url.push_str("&agentId=");
		url.push_str(&urlencoding::encode(agent_id));
	}

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet;

	fn provider(config: &ProviderConfig) -> LongearsProvider {
		LongearsProvider::new(_preludet::test_issuer(), config).expect("Provider should build.")
	}

	#[test]
	fn endpoint_defaults_and_strips_trailing_slash() {
		assert_eq!(provider(&ProviderConfig::default()).endpoint(), config::DEFAULT_API_ENDPOINT);

		let config = ProviderConfig {
			api_endpoint: Some("https://rcs.example.com/v2/".into()),
			..Default::default()
		};

		assert_eq!(provider(&config).endpoint(), "https://rcs.example.com/v2");
	}

	#[test]
	fn capability_url_encodes_and_skips_blank_agent() {
		let base = "https://api.test/v1";

		assert_eq!(
			capability_url(base, "+12345678901", None),
			"https://api.test/v1/capabilities?phoneNumber=%2B12345678901"
		);
		assert_eq!(
			capability_url(base, "+12345678901", Some("")),
			"https://api.test/v1/capabilities?phoneNumber=%2B12345678901"
		);
		assert_eq!(
			capability_url(base, "+12345678901", Some("agent 7")),
			"https://api.test/v1/capabilities?phoneNumber=%2B12345678901&agentId=agent%207"
		);
	}

	#[tokio::test]
	async fn operations_require_ready_state() {
		let provider = provider(&ProviderConfig::default());
		let message = RcsMessage { to: "+12345678901".into(), ..Default::default() };
		let err = provider.send_message(&message).await.expect_err("Send should fail before init.");

		assert_eq!(err.kind, ErrorKind::NotInitialized);
		assert_eq!(provider.state(), ProviderState::Uninitialized);

		let err = provider
			.validate_phone_number("+12345678901", ValidateOptions::default())
			.await
			.expect_err("Validation should fail before init.");

		assert_eq!(err.kind, ErrorKind::NotInitialized);
	}

	#[tokio::test]
	async fn invalid_endpoint_fails_initialization() {
		let provider = provider(&ProviderConfig::default());
		let config =
			ProviderConfig { api_endpoint: Some("not a url".into()), ..Default::default() };
		let err = provider.initialize(&config).await.expect_err("Bad endpoints should fail.");

		assert_eq!(err.kind, ErrorKind::InitializationFailed);
		assert_eq!(provider.state(), ProviderState::Failed);
	}
}
