//! `.SPB` image format support.
//!
//! SPB is a planar, bit-packed delta/run-length format. A file is a 4-byte
//! big-endian header (`width: u16`, `height: u16`) followed by three
//! independently encoded colour planes. Decoding produces a complete 24-bit
//! bitmap file in memory, see [`decode`](self::decode) for the algorithm.

mod decode;

use std::{
	fmt::Display,
	io::{Read, Seek, SeekFrom},
};

use super::{DecodeError, bmp, codec, codec::KeyTable};

pub use decode::{decode, decode_into};

/// Header structure for `.SPB` files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	width: u16,
	height: u16,
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = 4;

	/// Creates a header for the given dimensions.
	pub fn new(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
		}
	}

	/// Returns the width of the image in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the height of the image in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the number of pixels per plane.
	pub fn pixel_count(&self) -> usize {
		self.width as usize * self.height as usize
	}

	/// Returns the size of the bitmap file the image decodes to.
	pub fn decoded_len(&self) -> usize {
		bmp::file_size(self.width as usize, self.height as usize)
	}

	/// Returns the smallest file, header included, that can encode every
	/// pixel: a literal seed per plane, then one repeat selector per group.
	///
	/// A file shorter than this is certainly truncated.
	pub fn min_encoded_len(&self) -> usize {
		let pixels = self.pixel_count();
		if pixels == 0 {
			return Self::SIZE;
		}
		let plane_bits = 8 + 3 * (pixels - 1).div_ceil(4);
		Self::SIZE + (3 * plane_bits).div_ceil(8)
	}

	/// Reads a header from the current position of `reader`.
	pub fn from_reader<R: Read>(reader: &mut R, key: &KeyTable) -> Result<Self, DecodeError> {
		let width = codec::read_u16(reader, key)?;
		let height = codec::read_u16(reader, key)?;

		Ok(Self {
			width,
			height,
		})
	}

	/// Reads the header at offset 0 without disturbing the stream position.
	pub fn peek<R: Read + Seek>(reader: &mut R, key: &KeyTable) -> Result<Self, DecodeError> {
		let position = reader.stream_position()?;
		reader.seek(SeekFrom::Start(0))?;
		let header = Self::from_reader(reader, key);
		reader.seek(SeekFrom::Start(position))?;
		header
	}

	/// Converts the `Header` to (unkeyed) bytes.
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0..2].copy_from_slice(&self.width.to_be_bytes());
		bytes[2..4].copy_from_slice(&self.height.to_be_bytes());
		bytes
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			".SPB File Header:\n\
			- Width: {} pixels\n\
			- Height: {} pixels\n\
			- Decoded Size: {} bytes",
			self.width,
			self.height,
			self.decoded_len(),
		)
	}
}

/// A fully decoded `.SPB` image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	header: Header,
	bitmap: Vec<u8>,
}

impl File {
	/// Returns the SPB header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns the decoded bitmap file, header included.
	pub fn bitmap(&self) -> &[u8] {
		&self.bitmap
	}

	/// Returns the pixel bytes (bottom-up, BGR, padded rows).
	pub fn pixels(&self) -> &[u8] {
		&self.bitmap[bmp::HEADER_SIZE..]
	}

	/// Consumes the image and returns the bitmap file bytes.
	pub fn into_bitmap(self) -> Vec<u8> {
		self.bitmap
	}

	/// Opens and decodes an unkeyed `.SPB` file.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, DecodeError> {
		let mut file = std::fs::File::open(path)?;
		Self::from_reader(&mut file, &KeyTable::identity())
	}

	/// Decodes an image from `reader`, failing if the stream is truncated.
	pub fn from_reader<R: Read>(reader: &mut R, key: &KeyTable) -> Result<Self, DecodeError> {
		let bitmap = decode(reader, key)?;
		let width = u32::from_le_bytes([bitmap[18], bitmap[19], bitmap[20], bitmap[21]]);
		let height = u32::from_le_bytes([bitmap[22], bitmap[23], bitmap[24], bitmap[25]]);

		Ok(Self {
			header: Header::new(width as u16, height as u16),
			bitmap,
		})
	}
}
