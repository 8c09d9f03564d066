//! Fluent builder for [`RcsMessage`] values.

// self
use crate::{
	_prelude::*,
	error::ErrorKind,
	message::{
		ActionType, MediaContent, MediaType, MessageContent, MessageMetadata, RcsMessage,
		RichCard, Suggestion,
	},
};

/// Errors produced by [`MessageBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MessageBuildError {
	/// Issued when no recipient was provided.
	#[error("Recipient phone number is required.")]
	MissingRecipient,
	/// Issued when neither text, media, nor a rich card was provided.
	#[error("Message must have content.")]
	MissingContent,
}

impl From<MessageBuildError> for Error {
	fn from(e: MessageBuildError) -> Self {
		Error::new(ErrorKind::ValidationFailed, e.to_string()).with_source(e)
	}
}

/// Builder for [`RcsMessage`].
#[derive(Clone, Debug, Default)]
pub struct MessageBuilder {
	to: Option<String>,
	content: MessageContent,
	suggestions: Vec<Suggestion>,
	metadata: Option<MessageMetadata>,
}
impl MessageBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the recipient.
	pub fn to(mut self, phone_number: impl Into<String>) -> Self {
		self.to = Some(phone_number.into());

		self
	}

	/// Sets the text body.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.content.text = Some(text.into());

		self
	}

	/// Attaches media with an optional thumbnail.
	pub fn media(
		mut self,
		url: impl Into<String>,
		kind: MediaType,
		thumbnail_url: Option<String>,
	) -> Self {
		let mut media = MediaContent::new(url, kind);

		media.thumbnail_url = thumbnail_url;
		self.content.media = Some(media);

		self
	}

	/// Sets the rich card slot, replacing any previous card or carousel.
	pub fn rich_card(mut self, card: RichCard) -> Self {
		self.content.rich_card = Some(card);

		self
	}

	/// Appends a quick reply; the postback payload defaults to the label.
	pub fn reply(mut self, text: impl Into<String>, postback_data: Option<String>) -> Self {
		self.suggestions.push(Suggestion::reply(text, postback_data));

		self
	}

	/// Appends an action suggestion.
	pub fn action(mut self, text: impl Into<String>, kind: ActionType, data: Option<String>) -> Self {
		self.suggestions.push(Suggestion::action(text, kind, data));

		self
	}

	/// Appends a prebuilt suggestion.
	pub fn suggestion(mut self, suggestion: Suggestion) -> Self {
		self.suggestions.push(suggestion);

		self
	}

	/// Replaces the metadata.
	pub fn metadata(mut self, metadata: MessageMetadata) -> Self {
		self.metadata = Some(metadata);

		self
	}

	/// Consumes the builder and produces an [`RcsMessage`].
	pub fn build(self) -> Result<RcsMessage, MessageBuildError> {
		let to = self.to.ok_or(MessageBuildError::MissingRecipient)?;

		if self.content.is_empty() {
			return Err(MessageBuildError::MissingContent);
		}

		Ok(RcsMessage {
			to,
			content: self.content,
			suggestions: self.suggestions,
			metadata: self.metadata,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::message::{CardContent, StandaloneCard};

	#[test]
	fn builds_message_in_call_order() {
		let message = MessageBuilder::new()
			.to("+12345678901")
			.text("Hello")
			.media("https://example.com/a.jpg", MediaType::Image, None)
			.reply("Yes", None)
			.action("Visit", ActionType::OpenUrl, Some("https://example.com".into()))
			.build()
			.expect("Builder should accept a complete message.");

		assert_eq!(message.to, "+12345678901");
		assert_eq!(message.content.text.as_deref(), Some("Hello"));
		assert_eq!(message.suggestions.len(), 2);
		assert_eq!(message.suggestions[0].text(), "Yes");
		assert!(matches!(message.suggestions[1], Suggestion::Action { .. }));
	}

	#[test]
	fn rich_card_alone_counts_as_content() {
		let card = RichCard::Standalone(StandaloneCard {
			card: CardContent { title: Some("Card".into()), ..Default::default() },
			orientation: None,
		});
		let message = MessageBuilder::new()
			.to("+12345678901")
			.rich_card(card)
			.build()
			.expect("A rich card is sufficient content.");

		assert!(message.content.text.is_none());
		assert!(message.content.rich_card.is_some());
	}

	#[test]
	fn build_rejects_missing_fields() {
		assert_eq!(
			MessageBuilder::new().text("orphan").build(),
			Err(MessageBuildError::MissingRecipient)
		);
		assert_eq!(
			MessageBuilder::new().to("+12345678901").build(),
			Err(MessageBuildError::MissingContent)
		);
	}

	#[test]
	fn build_errors_convert_to_validation_failures() {
		let err = Error::from(MessageBuildError::MissingContent);

		assert_eq!(err.kind, ErrorKind::ValidationFailed);
		assert_eq!(err.message, "Message must have content.");
	}
}
