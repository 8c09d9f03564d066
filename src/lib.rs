//! Provider-abstracted RCS messaging client: HMAC-signed credentials, a normalizing HTTP
//! pipeline, and lossless rich-message translation in one crate.
//!
//! ```no_run
//! use rcs_client::{
//! 	client::RcsClient,
//! 	config::{AuthConfig, ClientConfig},
//! 	message::MessageBuilder,
//! };
//!
//! # async fn run() -> rcs_client::error::Result<()> {
//! let client = RcsClient::new(ClientConfig::new(
//! 	"longears",
//! 	AuthConfig::new("longears", "api-key", "api-secret"),
//! ))?;
//!
//! client.initialize().await?;
//!
//! let message = MessageBuilder::new()
//! 	.to("+12345678901")
//! 	.text("Hello from Rust")
//! 	.reply("Thanks", None)
//! 	.build()?;
//! let receipt = client.send_message(&message).await?;
//!
//! println!("{} {:?}", receipt.message_id, receipt.status);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod message;
pub mod obs;
pub mod phone;
pub mod provider;
pub mod registry;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::HmacCredentialIssuer,
		client::RcsClient,
		config::{AuthConfig, ClientConfig, ClientOptions},
	};

	/// API key used across test fixtures.
	pub const TEST_API_KEY: &str = "test-api-key";
	/// API secret used across test fixtures.
	pub const TEST_API_SECRET: &str = "test-api-secret";

	/// Builds the HMAC issuer for the fixture key pair.
	pub fn test_issuer() -> Arc<HmacCredentialIssuer> {
		Arc::new(
			HmacCredentialIssuer::new(TEST_API_KEY, TEST_API_SECRET)
				.expect("Fixture credentials should be accepted."),
		)
	}

	/// Builds a `longears` client pointed at `endpoint` (typically an `httpmock` server URL).
	pub fn build_test_client(endpoint: &str) -> RcsClient {
		let config =
			ClientConfig::new("longears", AuthConfig::new("longears", TEST_API_KEY, TEST_API_SECRET))
				.with_options(ClientOptions::default().api_endpoint(endpoint).timeout_ms(5_000));

		RcsClient::new(config).expect("Fixture client should build.")
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
