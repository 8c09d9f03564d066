//! Provider-neutral message, receipt, and capability models.

pub mod builder;

pub use builder::*;

// std
use std::collections::BTreeSet;
// crates.io
use serde::ser::SerializeStruct;
// self
use crate::_prelude::*;

/// Free-form metadata attached to a message.
pub type MessageMetadata = serde_json::Map<String, serde_json::Value>;

/// Outbound rich message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcsMessage {
	/// Destination address in E.164 form.
	pub to: String,
	/// Message body.
	pub content: MessageContent,
	/// Ordered quick replies and actions.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub suggestions: Vec<Suggestion>,
	/// Free-form metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<MessageMetadata>,
}

/// Message body: any combination of text, media, and one rich card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
	/// Plain text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	/// Media reference.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub media: Option<MediaContent>,
	/// Standalone card or carousel.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rich_card: Option<RichCard>,
}
impl MessageContent {
	/// Returns `true` when no text, media, or rich card is present.
	pub fn is_empty(&self) -> bool {
		self.text.is_none() && self.media.is_none() && self.rich_card.is_none()
	}
}

/// Media category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
	/// Still image.
	Image,
	/// Video clip.
	Video,
	/// Audio clip.
	Audio,
	/// Arbitrary file.
	File,
}

/// Media reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
	/// Media URL.
	pub url: String,
	/// Media category.
	#[serde(rename = "type")]
	pub kind: MediaType,
	/// Thumbnail URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_url: Option<String>,
	/// MIME type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mime_type: Option<String>,
	/// File name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_name: Option<String>,
}
impl MediaContent {
	/// Creates a media reference with no optional fields.
	pub fn new(url: impl Into<String>, kind: MediaType) -> Self {
		Self { url: url.into(), kind, thumbnail_url: None, mime_type: None, file_name: None }
	}
}

/// The single rich card slot: a standalone card or a carousel, never both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RichCard {
	/// One card.
	Standalone(StandaloneCard),
	/// Horizontally scrolling cards.
	Carousel(CarouselCard),
}

/// Card body shared by standalone cards and carousel entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
	/// Card title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Card description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Card media.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub media: Option<MediaContent>,
	/// Card-level suggestions.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub suggestions: Vec<Suggestion>,
}

/// Card layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOrientation {
	/// Media beside the text.
	Horizontal,
	#[default]
	/// Media above the text.
	Vertical,
}

/// Standalone card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneCard {
	/// Card body.
	#[serde(flatten)]
	pub card: CardContent,
	/// Layout; the provider default applies when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub orientation: Option<CardOrientation>,
}

/// Carousel card width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardWidth {
	/// Narrow cards.
	Small,
	#[default]
	/// Regular cards.
	Medium,
}

/// Carousel of cards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselCard {
	/// Cards in display order.
	pub cards: Vec<CardContent>,
	/// Card width; the provider default applies when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<CardWidth>,
}

/// Suggested quick reply or action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
	/// Quick reply echoing a postback payload.
	#[serde(rename_all = "camelCase")]
	Reply {
		/// Label shown to the user.
		text: String,
		/// Opaque payload delivered back on selection.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		postback_data: Option<String>,
	},
	/// Device action.
	#[serde(rename_all = "camelCase")]
	Action {
		/// Label shown to the user.
		text: String,
		/// Opaque payload delivered back on selection.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		postback_data: Option<String>,
		/// Action to perform.
		action: SuggestedAction,
	},
}
impl Suggestion {
	/// Quick reply whose postback payload defaults to the label.
	pub fn reply(text: impl Into<String>, postback_data: Option<String>) -> Self {
		let text = text.into();
		let postback_data = postback_data.unwrap_or_else(|| text.clone());

		Self::Reply { text, postback_data: Some(postback_data) }
	}

	/// Action suggestion.
	pub fn action(text: impl Into<String>, kind: ActionType, data: Option<String>) -> Self {
		Self::Action {
			text: text.into(),
			postback_data: None,
			action: SuggestedAction { kind, data, parameters: None },
		}
	}

	/// Dial `phone_number`.
	pub fn dial(text: impl Into<String>, phone_number: impl Into<String>) -> Self {
		Self::action(text, ActionType::Dial, Some(phone_number.into()))
	}

	/// Open `url`.
	pub fn open_url(text: impl Into<String>, url: impl Into<String>) -> Self {
		Self::action(text, ActionType::OpenUrl, Some(url.into()))
	}

	/// Share the device location.
	pub fn share_location(text: impl Into<String>) -> Self {
		Self::action(text, ActionType::ShareLocation, None)
	}

	/// Create a calendar event, optionally described by `event_data`.
	pub fn create_calendar_event(text: impl Into<String>, event_data: Option<String>) -> Self {
		Self::action(text, ActionType::CreateCalendarEvent, event_data)
	}

	/// Label shown to the user.
	pub fn text(&self) -> &str {
		match self {
			Self::Reply { text, .. } | Self::Action { text, .. } => text,
		}
	}
}

/// Device action kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
	/// Dial a number.
	Dial,
	/// Open a URL.
	OpenUrl,
	/// Share the device location.
	ShareLocation,
	/// Create a calendar event.
	CreateCalendarEvent,
}

/// Action payload of a [`Suggestion::Action`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAction {
	/// Action kind.
	#[serde(rename = "type")]
	pub kind: ActionType,
	/// Primary datum (number, URL, event description).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
	/// Extra provider parameters.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Delivery status reported after a send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
	/// Accepted by the provider.
	Sent,
	/// Confirmed delivered.
	Delivered,
	/// Rejected.
	Failed,
	/// Queued without confirmation.
	Pending,
}

/// Receipt returned by a send.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
	/// Provider message identifier.
	pub message_id: String,
	/// Delivery status.
	pub status: MessageStatus,
	/// Provider timestamp, or the local receipt instant when absent.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Raw provider response body.
	pub provider_response: serde_json::Value,
}

/// Enriched messaging feature tags reported by capability lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureTag {
	/// Standalone rich cards.
	#[serde(rename = "RICHCARD_STANDALONE")]
	RichCardStandalone,
	/// Rich card carousels.
	#[serde(rename = "RICHCARD_CAROUSEL")]
	RichCardCarousel,
	/// Dial action.
	ActionDial,
	/// Open URL action.
	ActionOpenUrl,
	/// Open URL in webview action.
	ActionOpenUrlInWebview,
	/// Share location action.
	ActionShareLocation,
	/// View location action.
	ActionViewLocation,
	/// Create calendar event action.
	ActionCreateCalendarEvent,
	/// Deprecated compose action; only reported when the provider lists it explicitly.
	ActionCompose,
}
impl FeatureTag {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			FeatureTag::RichCardStandalone => "RICHCARD_STANDALONE",
			FeatureTag::RichCardCarousel => "RICHCARD_CAROUSEL",
			FeatureTag::ActionDial => "ACTION_DIAL",
			FeatureTag::ActionOpenUrl => "ACTION_OPEN_URL",
			FeatureTag::ActionOpenUrlInWebview => "ACTION_OPEN_URL_IN_WEBVIEW",
			FeatureTag::ActionShareLocation => "ACTION_SHARE_LOCATION",
			FeatureTag::ActionViewLocation => "ACTION_VIEW_LOCATION",
			FeatureTag::ActionCreateCalendarEvent => "ACTION_CREATE_CALENDAR_EVENT",
			FeatureTag::ActionCompose => "ACTION_COMPOSE",
		}
	}
}
impl Display for FeatureTag {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Provider limits reported alongside a capability lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityLimits {
	/// Media types accepted for this destination.
	pub supported_media_types: Vec<String>,
	/// Longest accepted text.
	pub max_message_length: Option<u64>,
	/// Most suggestions per message.
	pub max_suggestions: Option<u64>,
	/// Largest accepted file, in bytes.
	pub max_file_size: Option<u64>,
}

/// Snapshot of the enriched features a destination supports. Never cached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityReport {
	/// Address the lookup was made for (after reformatting).
	pub phone_number: String,
	/// Whether the destination supports enriched messaging at all.
	pub is_capable: bool,
	/// Supported feature tags.
	pub features: BTreeSet<FeatureTag>,
	/// Instant the report was produced.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Carrier name, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub carrier: Option<String>,
	/// Country code, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_code: Option<String>,
	/// Provider limits, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub limits: Option<CapabilityLimits>,
}
impl CapabilityReport {
	/// Returns `true` when `tag` is supported.
	pub fn supports(&self, tag: FeatureTag) -> bool {
		self.features.contains(&tag)
	}
}

/// Result of a phone number validation.
///
/// Downstream failures are reported as [`ValidationResult::Failure`] instead of an error so
/// callers can treat capability checks as non-fatal. Both variants serialize with a `success`
/// flag; deserialization tells them apart by shape and ignores the flag.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValidationResult {
	/// Lookup succeeded.
	Success {
		/// Capability snapshot.
		capability: CapabilityReport,
	},
	/// Lookup failed.
	Failure {
		/// Human-readable failure description.
		error: String,
	},
}
impl ValidationResult {
	/// Returns `true` for [`ValidationResult::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Returns the capability report on success.
	pub fn capability(&self) -> Option<&CapabilityReport> {
		match self {
			Self::Success { capability } => Some(capability),
			Self::Failure { .. } => None,
		}
	}

	/// Returns the failure description on failure.
	pub fn error(&self) -> Option<&str> {
		match self {
			Self::Success { .. } => None,
			Self::Failure { error } => Some(error),
		}
	}
}
impl Serialize for ValidationResult {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		let mut state = serializer.serialize_struct("ValidationResult", 2)?;

		state.serialize_field("success", &self.is_success())?;

		match self {
			Self::Success { capability } => state.serialize_field("capability", capability)?,
			Self::Failure { error } => state.serialize_field("error", error)?,
		}

		state.end()
	}
}

/// Per-call options for phone number validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidateOptions {
	/// Agent identifier overriding the configured default.
	pub agent_id: Option<String>,
}
impl ValidateOptions {
	/// Sets the agent identifier.
	pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
		self.agent_id = Some(agent_id.into());

		self
	}
}
