//! The `tag|v1,v2,...` control strings understood by layers.

use crate::error::MessageError;

/// Separator between the tag and the fields
pub const TAG_SEPARATOR: char = '|';

/// Separator between fields
pub const FIELD_SEPARATOR: char = ',';

/// A parsed control message, borrowing the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
	tag: &'a str,
	body: &'a str,
}

impl<'a> Message<'a> {
	/// Splits `text` into tag and body. A bare tag such as `"g"` has an
	/// empty body.
	pub fn parse(text: &'a str) -> Result<Self, MessageError> {
		let text = text.trim();
		let (tag, body) = text.split_once(TAG_SEPARATOR).unwrap_or((text, ""));
		let tag = tag.trim();
		if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphabetic()) {
			return Err(MessageError::Malformed(text.to_string()));
		}

		Ok(Self {
			tag,
			body: body.trim(),
		})
	}

	/// Returns the tag.
	pub fn tag(&self) -> &'a str {
		self.tag
	}

	/// Returns everything after the separator.
	pub fn body(&self) -> &'a str {
		self.body
	}

	/// Returns the comma separated fields, trimmed. An empty body has none.
	pub fn fields(&self) -> Vec<&'a str> {
		if self.body.is_empty() {
			return Vec::new();
		}
		self.body.split(FIELD_SEPARATOR).map(str::trim).collect()
	}

	/// Parses exactly `N` integer fields.
	pub fn ints<const N: usize>(&self) -> Result<[i32; N], MessageError> {
		let fields = self.fields();
		if fields.len() != N {
			return Err(MessageError::WrongArity {
				expected: N,
				actual: fields.len(),
			});
		}

		let mut values = [0; N];
		for (value, field) in values.iter_mut().zip(fields) {
			*value = field.parse().map_err(|_| MessageError::InvalidNumber(field.to_string()))?;
		}
		Ok(values)
	}

	/// Builds the error for a tag the receiver does not handle.
	pub fn unknown(&self) -> MessageError {
		MessageError::UnknownTag(self.tag.to_string())
	}
}

/// Answer to a control message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
	/// Text answer, itself a message
	pub text: Option<String>,
	/// Integer answer
	pub value: i32,
}

impl Reply {
	/// An integer-only reply.
	pub fn value(value: i32) -> Self {
		Self {
			text: None,
			value,
		}
	}
}

/// Formats `values` as a `tag|a,b,c` message.
pub fn format(tag: &str, values: &[i32]) -> String {
	let fields: Vec<String> = values.iter().map(i32::to_string).collect();
	format!("{tag}{TAG_SEPARATOR}{}", fields.join(","))
}
