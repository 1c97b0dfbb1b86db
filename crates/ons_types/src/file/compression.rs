//! Extension-based compression dispatch.

use std::{
	fmt::Display,
	io::{Read, Seek, SeekFrom},
};

use super::{DecodeError, codec::KeyTable, nbz, spb};

/// Compression applied to a file stored directly on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
	/// Stored as-is
	#[default]
	None,

	/// Planar delta/run-length image, decodes to a bitmap
	Spb,

	/// bzip2 with a big-endian length prefix
	Nbz,
}

impl Compression {
	/// Returns `true` if reading the file requires a decode step.
	pub fn is_compressed(&self) -> bool {
		!matches!(self, Compression::None)
	}

	/// Returns the decoded length of the stream without consuming it.
	///
	/// For [`Compression::None`] this is the raw stream length.
	pub fn decoded_length<R: Read + Seek>(&self, reader: &mut R, key: &KeyTable) -> Result<usize, DecodeError> {
		match self {
			Compression::Spb => {
				let header = spb::Header::peek(reader, key)?;
				let position = reader.stream_position()?;
				let available = reader.seek(SeekFrom::End(0))? as usize;
				reader.seek(SeekFrom::Start(position))?;
				if available < header.min_encoded_len() {
					return Err(DecodeError::Oversized {
						width: header.width(),
						height: header.height(),
						available,
					});
				}
				Ok(header.decoded_len())
			}
			Compression::Nbz => nbz::original_length(reader, key),
			Compression::None => {
				let position = reader.stream_position()?;
				let end = reader.seek(SeekFrom::End(0))?;
				reader.seek(SeekFrom::Start(position))?;
				Ok(end as usize)
			}
		}
	}

	/// Reads the whole stream into `out`, decoding it if necessary, and
	/// returns the number of bytes produced.
	///
	/// Uncompressed content is copied up to `out.len()` bytes.
	pub fn decode_into<R: Read>(&self, reader: &mut R, key: &KeyTable, out: &mut [u8]) -> Result<usize, DecodeError> {
		match self {
			Compression::Spb => spb::decode_into(reader, key, out),
			Compression::Nbz => nbz::decode_into(reader, key, out),
			Compression::None => {
				let mut total = 0;
				while total < out.len() {
					match reader.read(&mut out[total..]) {
						Ok(0) => break,
						Ok(n) => total += n,
						Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
						Err(e) => return Err(e.into()),
					}
				}
				Ok(total)
			}
		}
	}
}

impl Display for Compression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Compression::None => write!(f, "None"),
			Compression::Spb => write!(f, "SPB"),
			Compression::Nbz => write!(f, "NBZ"),
		}
	}
}

/// Immutable mapping from uppercase file extension to [`Compression`].
///
/// Lookup is linear in registration order; the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRegistry {
	entries: Vec<(String, Compression)>,
}

impl Default for CompressionRegistry {
	fn default() -> Self {
		Self::builder()
			.register("SPB", Compression::Spb)
			.register("JPG", Compression::None)
			.register("GIF", Compression::None)
			.register("NBZ", Compression::Nbz)
			.build()
	}
}

impl CompressionRegistry {
	/// Starts an empty registry.
	pub fn builder() -> CompressionRegistryBuilder {
		CompressionRegistryBuilder::default()
	}

	/// Returns the registered extensions in registration order.
	pub fn entries(&self) -> impl Iterator<Item = (&str, Compression)> {
		self.entries.iter().map(|(ext, kind)| (ext.as_str(), *kind))
	}

	/// Looks up an extension, ignoring ASCII case.
	pub fn lookup(&self, extension: &str) -> Option<Compression> {
		self.entries.iter().find(|(ext, _)| ext.eq_ignore_ascii_case(extension)).map(|(_, kind)| *kind)
	}

	/// Returns the compression for a file name (raw bytes, any encoding).
	///
	/// The extension is everything after the last `.`. Names without an
	/// extension or with an unregistered one are [`Compression::None`].
	pub fn classify(&self, file_name: &[u8]) -> Compression {
		let Some(dot) = file_name.iter().rposition(|&b| b == b'.') else {
			return Compression::None;
		};

		let extension = &file_name[dot + 1..];
		self.entries
			.iter()
			.find(|(ext, _)| ext.as_bytes().eq_ignore_ascii_case(extension))
			.map_or(Compression::None, |(_, kind)| *kind)
	}
}

/// Collects registrations before the registry is frozen.
#[derive(Debug, Clone, Default)]
pub struct CompressionRegistryBuilder {
	entries: Vec<(String, Compression)>,
}

impl CompressionRegistryBuilder {
	/// Adds an extension. The extension is stored uppercase.
	pub fn register(mut self, extension: &str, kind: Compression) -> Self {
		self.entries.push((extension.to_ascii_uppercase(), kind));
		self
	}

	/// Freezes the registrations.
	pub fn build(self) -> CompressionRegistry {
		CompressionRegistry {
			entries: self.entries,
		}
	}
}
