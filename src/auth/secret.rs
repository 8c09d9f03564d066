//! Redacted holder for API secrets and signed tokens.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Sensitive string that never appears in `Debug` or `Display` output.
///
/// Serialization stays transparent so configuration documents can carry the raw value; read it
/// back with [`Secret::expose`] only at the point of use.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(Box<str>);
impl Secret {
	/// Wraps `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into().into_boxed_str())
	}

	/// Raw value. Keep it out of logs.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when nothing is wrapped.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl From<&str> for Secret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Secret({REDACTED})")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatting_hides_the_value() {
		let secret = Secret::from("super-secret");

		assert_eq!(format!("{secret:?}"), "Secret(<redacted>)");
		assert_eq!(secret.to_string(), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn serde_round_trips_the_raw_value() {
		let secret: Secret =
			serde_json::from_str("\"api-secret\"").expect("Secrets should deserialize from strings.");

		assert_eq!(secret.expose(), "api-secret");
		assert_eq!(
			serde_json::to_string(&secret).expect("Secrets should serialize."),
			"\"api-secret\""
		);
		assert!(Secret::default().is_empty());
	}
}
