//! Name-based selection of credential issuers and provider adapters.
//!
//! Both tables are static. Provider names match case-insensitively and include aliases; auth
//! types match exactly.

// self
use crate::{
	_prelude::*,
	auth::{CredentialIssuer, HmacCredentialIssuer},
	config::{AuthConfig, ProviderConfig},
	error::ErrorKind,
	provider::{LongearsProvider, RcsProvider},
};

type ProviderConstructor =
	fn(Arc<dyn CredentialIssuer>, &ProviderConfig) -> Result<Box<dyn RcsProvider>>;
type IssuerConstructor = fn(&AuthConfig) -> Result<Arc<dyn CredentialIssuer>>;

const PROVIDERS: &[(&str, ProviderConstructor)] =
	&[("longears", longears_provider), ("longears-rcs", longears_provider)];
const ISSUERS: &[(&str, IssuerConstructor)] = &[(HmacCredentialIssuer::AUTH_TYPE, hmac_issuer)];

/// Builds an uninitialized adapter for `name`.
pub fn create_provider(
	name: &str,
	issuer: Arc<dyn CredentialIssuer>,
	config: &ProviderConfig,
) -> Result<Box<dyn RcsProvider>> {
	let constructor = PROVIDERS
		.iter()
		.find(|(tag, _)| tag.eq_ignore_ascii_case(name))
		.map(|(_, constructor)| *constructor)
		.ok_or_else(|| {
			Error::new(ErrorKind::ProviderNotFound, format!("Unknown provider: {name}"))
				.with_provider(name)
		})?;

	constructor(issuer, config)
}

/// Builds the credential issuer selected by `auth.kind`.
pub fn create_issuer(auth: &AuthConfig) -> Result<Arc<dyn CredentialIssuer>> {
	let constructor = ISSUERS
		.iter()
		.find(|(tag, _)| *tag == auth.kind)
		.map(|(_, constructor)| *constructor)
		.ok_or_else(|| {
			Error::new(ErrorKind::AuthInvalid, format!("Unknown auth type: {}", auth.kind))
		})?;

	constructor(auth)
}

/// Lists every accepted provider name, aliases included.
pub fn available_providers() -> Vec<&'static str> {
	PROVIDERS.iter().map(|(tag, _)| *tag).collect()
}

/// Returns `true` when `name` selects a provider.
pub fn is_provider_supported(name: &str) -> bool {
	PROVIDERS.iter().any(|(tag, _)| tag.eq_ignore_ascii_case(name))
}

/// Lists every accepted auth type.
pub fn available_auth_types() -> Vec<&'static str> {
	ISSUERS.iter().map(|(tag, _)| *tag).collect()
}

/// Returns `true` when `kind` selects a credential issuer.
pub fn is_auth_type_supported(kind: &str) -> bool {
	ISSUERS.iter().any(|(tag, _)| *tag == kind)
}

fn longears_provider(
	issuer: Arc<dyn CredentialIssuer>,
	config: &ProviderConfig,
) -> Result<Box<dyn RcsProvider>> {
	Ok(Box::new(LongearsProvider::new(issuer, config)?))
}

fn hmac_issuer(auth: &AuthConfig) -> Result<Arc<dyn CredentialIssuer>> {
	Ok(Arc::new(HmacCredentialIssuer::from_credentials(&auth.credentials)?))
}
