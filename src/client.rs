//! Facade that wires a credential issuer and a provider adapter behind one surface.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	auth::CredentialIssuer,
	config::{ClientConfig, ProviderConfig},
	error::ErrorKind,
	message::{MessageResponse, RcsMessage, ValidateOptions, ValidationResult},
	provider::RcsProvider,
	registry,
};

/// Provider-abstracted RCS client.
///
/// The client owns exactly one [`CredentialIssuer`] and one [`RcsProvider`], both selected by
/// name through the [`registry`]. It moves from uninitialized to initialized once and never
/// reverts; every operation other than [`initialize`](Self::initialize) requires the latter.
pub struct RcsClient {
	config: ClientConfig,
	provider_config: ProviderConfig,
	issuer: Arc<dyn CredentialIssuer>,
	provider: Box<dyn RcsProvider>,
	initialized: AtomicBool,
}
impl RcsClient {
	/// Selects the issuer and provider named by `config`.
	///
	/// Fails with [`ErrorKind::AuthInvalid`] for an unknown auth type or missing credentials and
	/// with [`ErrorKind::ProviderNotFound`] for an unknown provider. No network I/O happens here.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let issuer = registry::create_issuer(&config.auth)?;
		let provider_config = ProviderConfig::from(&config.options);
		let provider = registry::create_provider(&config.provider, issuer.clone(), &provider_config)?;

		Ok(Self { config, provider_config, issuer, provider, initialized: AtomicBool::new(false) })
	}

	/// Issues the first credential, then initializes the provider. Idempotent.
	///
	/// A credential failure aborts before the provider is touched; provider errors are returned
	/// unchanged.
	pub async fn initialize(&self) -> Result<()> {
		if self.is_initialized() {
			return Ok(());
		}

		self.issuer.issue().map_err(|e| {
			Error::new(ErrorKind::InitializationFailed, "Failed to authenticate with provider.")
				.with_provider(self.provider.name())
				.with_source(e)
		})?;
		self.provider.initialize(&self.provider_config).await?;
		self.initialized.store(true, Ordering::Release);

		Ok(())
	}

	/// Sends `message` through the provider.
	pub async fn send_message(&self, message: &RcsMessage) -> Result<MessageResponse> {
		self.ensure_initialized()?;

		self.provider.send_message(message).await
	}

	/// Looks up the enriched feature set of `phone_number`.
	///
	/// Only the not-initialized precondition is an error; downstream failures come back as
	/// [`ValidationResult::Failure`].
	pub async fn validate_phone_number(
		&self,
		phone_number: &str,
		options: ValidateOptions,
	) -> Result<ValidationResult> {
		self.ensure_initialized()?;

		self.provider.validate_phone_number(phone_number, options).await
	}

	/// Selected provider adapter.
	pub fn provider(&self) -> &dyn RcsProvider {
		self.provider.as_ref()
	}

	/// Credential issuer shared with the provider's pipeline.
	pub fn issuer(&self) -> &dyn CredentialIssuer {
		self.issuer.as_ref()
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns `true` once [`initialize`](Self::initialize) has succeeded.
	pub fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::Acquire)
	}

	fn ensure_initialized(&self) -> Result<()> {
		if self.is_initialized() {
			Ok(())
		} else {
			Err(Error::not_initialized("RCS client not initialized. Call initialize() first.")
				.with_provider(self.provider.name()))
		}
	}
}
impl Debug for RcsClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RcsClient")
			.field("provider", &self.provider.name())
			.field("state", &self.provider.state())
			.field("initialized", &self.is_initialized())
			.finish()
	}
}
