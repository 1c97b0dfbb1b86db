//! Error types for effects and layers.

use thiserror::Error;

/// Errors produced while parsing a layer control message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
	/// The message has no `tag|` prefix or is otherwise unreadable
	#[error("Malformed message: {0:?}")]
	Malformed(String),

	/// The tag is not understood by the receiving layer
	#[error("Unknown message tag: {0:?}")]
	UnknownTag(String),

	/// The message carries the wrong number of fields
	#[error("Expected {expected} parameters, got {actual}")]
	WrongArity {
		/// Number of fields the tag requires
		expected: usize,
		/// Number of fields supplied
		actual: usize,
	},

	/// A numeric field failed to parse
	#[error("Invalid number: {0:?}")]
	InvalidNumber(String),
}

/// Errors that can occur while loading a sprite image
#[derive(Debug, Error)]
pub enum SpriteError {
	/// The image could not be located by the asset reader
	#[error("Image not found: {0}")]
	NotFound(String),

	/// The image data could not be decoded
	#[error(transparent)]
	Image(#[from] image::ImageError),
}
