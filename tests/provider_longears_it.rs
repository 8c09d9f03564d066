// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use rcs_client::{
	auth::HmacCredentialIssuer,
	config::ProviderConfig,
	error::ErrorKind,
	message::{FeatureTag, MessageBuilder, MessageStatus, RcsMessage, ValidateOptions},
	provider::{LongearsProvider, ProviderState, RcsProvider},
};

fn provider_config(server: &MockServer) -> ProviderConfig {
	ProviderConfig { api_endpoint: Some(server.url("/v1/")), ..Default::default() }
}

fn provider(config: &ProviderConfig) -> LongearsProvider {
	let issuer = HmacCredentialIssuer::new("test-api-key", "test-api-secret")
		.expect("Test credentials should be accepted.");

	LongearsProvider::new(Arc::new(issuer), config).expect("Provider should build.")
}

async fn ready_provider(server: &MockServer) -> LongearsProvider {
	let config = provider_config(server);
	let provider = provider(&config);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/status");
			then.status(200).body("{\"status\":\"ok\"}");
		})
		.await;
	provider.initialize(&config).await.expect("Status check should succeed.");

	provider
}

fn text_message(to: &str) -> RcsMessage {
	MessageBuilder::new().to(to).text("hi").build().expect("Text messages should build.")
}

#[tokio::test]
async fn initialize_probes_exactly_once() {
	let server = MockServer::start_async().await;
	let config = provider_config(&server);
	let provider = provider(&config);
	let probe = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/status").header_exists("x-longears-auth");
			then.status(200).body("{}");
		})
		.await;

	assert_eq!(provider.state(), ProviderState::Uninitialized);

	let (first, second) = tokio::join!(provider.initialize(&config), provider.initialize(&config));

	first.expect("First initialize should succeed.");
	second.expect("Concurrent initialize should succeed.");
	provider.initialize(&config).await.expect("Repeated initialize should be a no-op.");

	probe.assert_calls_async(1).await;
	assert_eq!(provider.state(), ProviderState::Ready);
	assert_eq!(provider.endpoint(), server.url("/v1"));
}

#[tokio::test]
async fn failed_probe_is_terminal() {
	let server = MockServer::start_async().await;
	let config = provider_config(&server);
	let provider = provider(&config);
	let probe = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/status");
			then.status(503).body("maintenance");
		})
		.await;
	let err = provider.initialize(&config).await.expect_err("Failing probes should fail.");

	assert_eq!(err.kind, ErrorKind::InitializationFailed);
	assert_eq!(err.message, "Failed to initialize Longears RCS provider.");
	assert_eq!(provider.state(), ProviderState::Failed);

	let err = provider.initialize(&config).await.expect_err("Failed adapters stay failed.");

	assert_eq!(err.kind, ErrorKind::InitializationFailed);
	probe.assert_calls_async(1).await;
}

#[tokio::test]
async fn send_message_translates_request_and_receipt() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;
	let send = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/messages")
				.header_exists("x-longears-auth")
				.json_body(serde_json::json!({
					"destination": "+12345678901",
					"metadata": {},
					"text": "hi",
					"suggestions": [{ "type": "reply", "text": "Yes", "postbackData": "Yes" }]
				}));
			then.status(200).header("content-type", "application/json").body(
				"{\"messageId\":\"msg-1\",\"status\":\"success\",\"timestamp\":\"2023-01-01T00:00:00Z\"}",
			);
		})
		.await;
	let message = MessageBuilder::new()
		.to("+12345678901")
		.text("hi")
		.reply("Yes", None)
		.build()
		.expect("Message should build.");
	let receipt = provider.send_message(&message).await.expect("Send should succeed.");

	send.assert_async().await;
	assert_eq!(receipt.message_id, "msg-1");
	assert_eq!(receipt.status, MessageStatus::Sent);
	assert_eq!(receipt.timestamp, time::macros::datetime!(2023-01-01 00:00 UTC));
	assert_eq!(receipt.provider_response["messageId"], "msg-1");
}

#[tokio::test]
async fn non_success_receipts_are_pending() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/messages");
			then.status(200).body("{\"messageId\":\"msg-2\",\"status\":\"queued\"}");
		})
		.await;

	let receipt = provider
		.send_message(&text_message("+447911123456"))
		.await
		.expect("Queued sends should succeed.");

	assert_eq!(receipt.status, MessageStatus::Pending);
}

#[tokio::test]
async fn epoch_millis_receipts_still_count_as_sent() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;
	let send = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/messages");
			then.status(200).header("content-type", "application/json").body(
				"{\"messageId\":\"msg-1\",\"status\":\"success\",\"timestamp\":1672531200000}",
			);
		})
		.await;
	let receipt = provider
		.send_message(&text_message("+12345678901"))
		.await
		.expect("Accepted messages should not be reported as failed.");

	send.assert_calls_async(1).await;
	assert_eq!(receipt.message_id, "msg-1");
	assert_eq!(receipt.status, MessageStatus::Sent);
	assert_eq!(receipt.timestamp, time::macros::datetime!(2023-01-01 00:00 UTC));
}

#[tokio::test]
async fn null_capability_flags_are_not_failures() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/capabilities");
			then.status(200).body(
				"{\"isRcsSupported\":true,\"features\":{\"richCards\":null,\"suggestions\":true}}",
			);
		})
		.await;

	let result = provider
		.validate_phone_number("+12345678901", ValidateOptions::default())
		.await
		.expect("Ready providers should validate.");
	let report = result.capability().expect("Null flags should still produce a report.");

	assert!(report.is_capable);
	assert!(!report.supports(FeatureTag::RichCardStandalone));
	assert!(report.supports(FeatureTag::ActionDial));
}

#[tokio::test]
async fn unreadable_receipts_fail_the_send() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/messages");
			then.status(200).body("{\"status\":\"success\"}");
		})
		.await;

	let err = provider
		.send_message(&text_message("+12345678901"))
		.await
		.expect_err("Receipts without identifiers should fail.");

	assert_eq!(err.kind, ErrorKind::MessageSendFailed);
}

#[tokio::test]
async fn invalid_phone_numbers_never_reach_the_network() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;
	let send = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/messages");
			then.status(200).body("{}");
		})
		.await;

	for to in ["invalid-number", "12345678901", "+0123456789", "+1"] {
		let err = provider
			.send_message(&text_message(to))
			.await
			.expect_err("Non E.164 recipients should be rejected.");

		assert_eq!(err.kind, ErrorKind::InvalidPhoneNumber);
		assert_eq!(err.details.expect("Details should name the number.")["phoneNumber"], to);
	}

	send.assert_calls_async(0).await;
}

#[tokio::test]
async fn uninitialized_provider_issues_no_requests() {
	let server = MockServer::start_async().await;
	let provider = provider(&provider_config(&server));
	let any = server
		.mock_async(|when, then| {
			when.any_request();
			then.status(200).body("{}");
		})
		.await;
	let err = provider
		.send_message(&text_message("+12345678901"))
		.await
		.expect_err("Uninitialized sends should fail.");

	assert_eq!(err.kind, ErrorKind::NotInitialized);

	let err = provider
		.validate_phone_number("+12345678901", ValidateOptions::default())
		.await
		.expect_err("Uninitialized validation should fail.");

	assert_eq!(err.kind, ErrorKind::NotInitialized);
	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn capabilities_use_formatted_number_and_agent_id() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/capabilities")
				.query_param("phoneNumber", "+12345678901")
				.query_param("agentId", "agent-7");
			then.status(200).header("content-type", "application/json").body(
				serde_json::json!({
					"phoneNumber": "+12345678901",
					"isRcsSupported": true,
					"features": {
						"richCards": true,
						"carousels": true,
						"suggestions": true,
						"fileTransfer": true,
						"supportedMediaTypes": ["image/jpeg", "compose"],
						"maxMessageLength": 3072,
						"maxSuggestions": 11,
						"maxFileSize": 104857600
					},
					"carrier": "Test Mobile",
					"countryCode": "US"
				})
				.to_string(),
			);
		})
		.await;
	let result = provider
		.validate_phone_number("(234) 567-8901", ValidateOptions::default().with_agent_id("agent-7"))
		.await
		.expect("Ready providers should validate.");

	lookup.assert_async().await;

	let report = result.capability().expect("Lookup should succeed.");

	assert_eq!(report.phone_number, "+12345678901");
	assert!(report.is_capable);
	assert!(report.supports(FeatureTag::RichCardCarousel));
	assert!(report.supports(FeatureTag::ActionCompose));
	assert_eq!(report.carrier.as_deref(), Some("Test Mobile"));
	assert_eq!(report.country_code.as_deref(), Some("US"));
}

#[tokio::test]
async fn configured_agent_id_is_the_default() {
	let server = MockServer::start_async().await;
	let config = ProviderConfig {
		api_endpoint: Some(server.url("/v1")),
		agent_id: Some("agent-config".into()),
		..Default::default()
	};
	let provider = provider(&config);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/status");
			then.status(200);
		})
		.await;
	provider.initialize(&config).await.expect("Status check should succeed.");

	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/capabilities")
				.query_param("phoneNumber", "+12345678901")
				.query_param("agentId", "agent-config");
			then.status(200).body("{\"isRcsSupported\":false}");
		})
		.await;
	let result = provider
		.validate_phone_number("+12345678901", ValidateOptions::default())
		.await
		.expect("Ready providers should validate.");

	lookup.assert_async().await;

	let report = result.capability().expect("Lookup should succeed.");

	assert!(!report.is_capable);
	assert!(report.features.is_empty());
}

#[tokio::test]
async fn blank_agent_id_option_falls_back_to_config() {
	let server = MockServer::start_async().await;
	let config = ProviderConfig {
		api_endpoint: Some(server.url("/v1")),
		agent_id: Some("agent-config".into()),
		..Default::default()
	};
	let provider = provider(&config);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/status");
			then.status(200);
		})
		.await;
	provider.initialize(&config).await.expect("Status check should succeed.");

	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/capabilities")
				.query_param("phoneNumber", "+12345678901")
				.query_param("agentId", "agent-config");
			then.status(200).body("{\"isRcsSupported\":true}");
		})
		.await;
	let result = provider
		.validate_phone_number("+12345678901", ValidateOptions::default().with_agent_id(""))
		.await
		.expect("Ready providers should validate.");

	lookup.assert_async().await;
	assert!(result.is_success());
}

#[tokio::test]
async fn downstream_failures_become_failure_results() {
	let server = MockServer::start_async().await;
	let provider = ready_provider(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/capabilities");
			then.status(404);
		})
		.await;

	let result = provider
		.validate_phone_number("+12345678901", ValidateOptions::default())
		.await
		.expect("Downstream failures are reported as values.");

	assert!(!result.is_success());
	assert_eq!(
		result.error(),
		Some("Failed to validate phone number: Phone number does not support RCS.")
	);
}
