//! Longears JSON shapes and the deterministic translation to and from the neutral models.

// std
use std::{borrow::Cow, collections::BTreeSet};
// crates.io
use serde::{Deserializer, de::DeserializeOwned};
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	message::{
		CapabilityLimits, CapabilityReport, CardContent, CardOrientation, CardWidth, FeatureTag,
		MediaContent, MessageMetadata, MessageResponse, MessageStatus, RcsMessage, RichCard,
		SuggestedAction, Suggestion,
	},
};

/// Media type marker a backend lists to advertise the deprecated compose action.
pub const COMPOSE_MARKER: &str = "compose";

/// Outbound message body for `POST /messages`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage<'a> {
	destination: &'a str,
	metadata: Cow<'a, MessageMetadata>,
	#[serde(skip_serializing_if = "Option::is_none")]
	text: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	media: Option<&'a MediaContent>,
	#[serde(skip_serializing_if = "Option::is_none")]
	rich_card: Option<WireRichCard<'a>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	suggestions: Option<Vec<WireSuggestion<'a>>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireRichCard<'a> {
	Standalone {
		#[serde(skip_serializing_if = "Option::is_none")]
		title: Option<&'a str>,
		#[serde(skip_serializing_if = "Option::is_none")]
		description: Option<&'a str>,
		#[serde(skip_serializing_if = "Option::is_none")]
		media: Option<&'a MediaContent>,
		orientation: CardOrientation,
		#[serde(skip_serializing_if = "Option::is_none")]
		suggestions: Option<Vec<WireSuggestion<'a>>>,
	},
	Carousel {
		cards: &'a [CardContent],
		width: CardWidth,
	},
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSuggestion<'a> {
	#[serde(rename = "type")]
	kind: &'static str,
	text: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	postback_data: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	action: Option<&'a SuggestedAction>,
}

/// Response body of `POST /messages`.
///
/// Decoding is lenient past the identifier: by the time a receipt arrives the backend has
/// accepted the message, so odd status or timestamp shapes must not fail the send.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReceipt {
	/// Provider message identifier (string or number on the wire).
	#[serde(deserialize_with = "string_or_number")]
	pub message_id: String,
	/// Provider status string; only `success` means sent.
	#[serde(default, deserialize_with = "null_as_default")]
	pub status: String,
	/// RFC 3339 string or epoch milliseconds.
	#[serde(default)]
	pub timestamp: Option<serde_json::Value>,
}

/// Response body of `GET /capabilities`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCapabilities {
	/// Echoed address.
	#[serde(default)]
	pub phone_number: Option<String>,
	/// Whether the address supports enriched messaging.
	#[serde(default, deserialize_with = "null_as_default")]
	pub is_rcs_supported: bool,
	/// Feature flags.
	#[serde(default)]
	pub features: Option<WireFeatures>,
	/// Carrier name.
	#[serde(default)]
	pub carrier: Option<String>,
	/// Country code.
	#[serde(default)]
	pub country_code: Option<String>,
}

/// Feature flags block of [`WireCapabilities`]. `null` flags read as unset.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireFeatures {
	/// Standalone rich cards.
	#[serde(deserialize_with = "null_as_default")]
	pub rich_cards: bool,
	/// Carousels.
	#[serde(deserialize_with = "null_as_default")]
	pub carousels: bool,
	/// Suggested replies and actions.
	#[serde(deserialize_with = "null_as_default")]
	pub suggestions: bool,
	/// File transfer.
	#[serde(deserialize_with = "null_as_default")]
	pub file_transfer: bool,
	/// Accepted media types (may include [`COMPOSE_MARKER`]).
	#[serde(deserialize_with = "null_as_default")]
	pub supported_media_types: Vec<String>,
	/// Longest accepted text.
	pub max_message_length: Option<u64>,
	/// Most suggestions per message.
	pub max_suggestions: Option<u64>,
	/// Largest accepted file, in bytes.
	pub max_file_size: Option<u64>,
}

/// Translates a neutral message into the Longears body. Total and deterministic.
pub fn translate_message(message: &RcsMessage) -> WireMessage<'_> {
	let metadata = match &message.metadata {
		Some(metadata) => Cow::Borrowed(metadata),
		None => Cow::Owned(MessageMetadata::new()),
	};

	WireMessage {
		destination: &message.to,
		metadata,
		text: message.content.text.as_deref(),
		media: message.content.media.as_ref(),
		rich_card: message.content.rich_card.as_ref().map(translate_rich_card),
		suggestions: translate_suggestions(&message.suggestions),
	}
}

/// Builds the neutral receipt from a decoded Longears receipt.
pub fn translate_receipt(
	receipt: WireReceipt,
	raw: serde_json::Value,
	now: OffsetDateTime,
) -> MessageResponse {
	let status = if receipt.status == "success" { MessageStatus::Sent } else { MessageStatus::Pending };
	let timestamp = receipt.timestamp.as_ref().and_then(receipt_timestamp).unwrap_or(now);

	MessageResponse { message_id: receipt.message_id, status, timestamp, provider_response: raw }
}

/// Maps Longears feature flags onto the feature tag vocabulary.
pub fn translate_features(features: Option<&WireFeatures>) -> BTreeSet<FeatureTag> {
	let mut tags = BTreeSet::new();
	let Some(features) = features else {
		return tags;
	};

	if features.rich_cards {
		tags.insert(FeatureTag::RichCardStandalone);
	}
	if features.carousels {
		tags.insert(FeatureTag::RichCardCarousel);
	}
	if features.suggestions {
		tags.extend([
			FeatureTag::ActionDial,
			FeatureTag::ActionOpenUrl,
			FeatureTag::ActionOpenUrlInWebview,
			FeatureTag::ActionShareLocation,
			FeatureTag::ActionViewLocation,
			FeatureTag::ActionCreateCalendarEvent,
		]);

		if features.supported_media_types.iter().any(|kind| kind == COMPOSE_MARKER) {
			tags.insert(FeatureTag::ActionCompose);
		}
	}

	tags
}

/// Builds the capability report for `phone_number` from a decoded Longears response.
pub fn translate_capabilities(
	phone_number: String,
	capabilities: WireCapabilities,
	now: OffsetDateTime,
) -> CapabilityReport {
	let features = translate_features(capabilities.features.as_ref());
	let limits = capabilities.features.map(|features| CapabilityLimits {
		supported_media_types: features.supported_media_types,
		max_message_length: features.max_message_length,
		max_suggestions: features.max_suggestions,
		max_file_size: features.max_file_size,
	});

	CapabilityReport {
		phone_number,
		is_capable: capabilities.is_rcs_supported,
		features,
		timestamp: now,
		carrier: capabilities.carrier,
		country_code: capabilities.country_code,
		limits,
	}
}

/// Decodes a response body, reporting the failing JSON path.
pub fn decode<T>(body: serde_json::Value) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(body)
}

fn receipt_timestamp(value: &serde_json::Value) -> Option<OffsetDateTime> {
	match value {
		serde_json::Value::String(text) => OffsetDateTime::parse(text, &Rfc3339).ok(),
		serde_json::Value::Number(number) => {
			let millis = number
				.as_i64()
				.map(i128::from)
				.or_else(|| number.as_f64().map(|millis| millis as i128))?;

			OffsetDateTime::from_unix_timestamp_nanos(millis.checked_mul(1_000_000)?).ok()
		},
		_ => None,
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::String(text) => Ok(text),
		serde_json::Value::Number(number) => Ok(number.to_string()),
		other =>
			Err(serde::de::Error::custom(format!("expected a string or number, found {other}"))),
	}
}

fn translate_rich_card(card: &RichCard) -> WireRichCard<'_> {
	match card {
		RichCard::Standalone(standalone) => WireRichCard::Standalone {
			title: standalone.card.title.as_deref(),
			description: standalone.card.description.as_deref(),
			media: standalone.card.media.as_ref(),
			orientation: standalone.orientation.unwrap_or_default(),
			suggestions: translate_suggestions(&standalone.card.suggestions),
		},
		RichCard::Carousel(carousel) => WireRichCard::Carousel {
			cards: &carousel.cards,
			width: carousel.width.unwrap_or_default(),
		},
	}
}

fn translate_suggestions(suggestions: &[Suggestion]) -> Option<Vec<WireSuggestion<'_>>> {
	if suggestions.is_empty() {
		return None;
	}

	Some(suggestions.iter().map(translate_suggestion).collect())
}

fn translate_suggestion(suggestion: &Suggestion) -> WireSuggestion<'_> {
	match suggestion {
		Suggestion::Reply { text, postback_data } => WireSuggestion {
			kind: "reply",
			text,
			postback_data: postback_data.as_deref(),
			action: None,
		},
		Suggestion::Action { text, postback_data, action } => WireSuggestion {
			kind: "action",
			text,
			postback_data: postback_data.as_deref(),
			action: Some(action),
		},
	}
}
