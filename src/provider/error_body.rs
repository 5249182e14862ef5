//! Decoding of provider error payloads.
//!
//! Identity services disagree on where the error text lives. Two shapes are recognized:
//!
//! - `{"error": "code", "error_description": "..."}`
//! - `{"error": {"message": "text"}, "error_description": "..."}`
//!
//! Anything else decodes to [`ErrorBody::Unrecognized`].

// self
use crate::{_prelude::*, error::IdentityProviderError};

/// Outcome of decoding a response body as a provider error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorBody {
	/// Body carries an error in one of the recognized shapes.
	Recognized {
		/// Error text taken from `error` or `error.message`.
		message: String,
		/// Optional `error_description` string.
		description: Option<String>,
	},
	/// Body does not carry a recognized error.
	Unrecognized,
}
impl ErrorBody {
	/// Decodes an already parsed JSON body.
	pub fn decode(body: &JsonValue) -> Self {
		if !body.is_object() {
			return Self::Unrecognized;
		}
		if let Ok(flat) = FlatError::deserialize(body) {
			return Self::Recognized {
				message: flat.error,
				description: description(flat.error_description),
			};
		}
		if let Ok(nested) = NestedError::deserialize(body) {
			return Self::Recognized {
				message: nested.error.message,
				description: description(nested.error_description),
			};
		}

		Self::Unrecognized
	}

	/// Decodes raw bytes; bodies that are not JSON are unrecognized.
	pub fn decode_slice(body: &[u8]) -> Self {
		serde_json::from_slice::<JsonValue>(body)
			.map(|value| Self::decode(&value))
			.unwrap_or(Self::Unrecognized)
	}

	/// Returns `true` for [`ErrorBody::Recognized`].
	pub fn is_recognized(&self) -> bool {
		matches!(self, Self::Recognized { .. })
	}

	/// Converts a recognized body into an [`IdentityProviderError`] carrying the response context.
	pub fn into_error(self, status: Option<u16>, raw: &str) -> Option<IdentityProviderError> {
		match self {
			Self::Recognized { message, description } =>
				Some(IdentityProviderError::new(message, status, raw).with_description(description)),
			Self::Unrecognized => None,
		}
	}
}

#[derive(Deserialize)]
struct FlatError {
	error: String,
	#[serde(default)]
	error_description: Option<JsonValue>,
}

#[derive(Deserialize)]
struct NestedError {
	error: NestedMessage,
	#[serde(default)]
	error_description: Option<JsonValue>,
}

#[derive(Deserialize)]
struct NestedMessage {
	message: String,
}

fn description(value: Option<JsonValue>) -> Option<String> {
	match value? {
		JsonValue::String(text) => Some(text),
		_ => None,
	}
}
