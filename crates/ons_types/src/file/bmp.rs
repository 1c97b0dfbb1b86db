//! Minimal 24-bit Windows bitmap header, as emitted in front of decoded SPB images.
//!
//! Layout (little-endian):
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ------------------------------
//! 0       2     "BM"
//! 2       4     total file size
//! 10      4     offset to pixel data (54)
//! 14      4     info header size (40)
//! 18      4     width
//! 22      4     height (positive: bottom-up rows)
//! 26      2     planes (1)
//! 28      2     bits per pixel (24)
//! 34      4     pixel data size
//! ```

/// Size of the file header
pub const FILE_HEADER_SIZE: usize = 14;

/// Size of the `BITMAPINFOHEADER`
pub const INFO_HEADER_SIZE: usize = 40;

/// Combined header size; pixel data starts here
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// Number of padding bytes appended to each 24-bit row.
#[inline]
pub fn row_padding(width: usize) -> usize {
	(4 - width * 3 % 4) % 4
}

/// Size in bytes of one padded 24-bit row.
#[inline]
pub fn row_stride(width: usize) -> usize {
	width * 3 + row_padding(width)
}

/// Size of a complete bitmap file with the given dimensions.
///
/// Zero-sized images are valid and consist of the header only.
#[inline]
pub fn file_size(width: usize, height: usize) -> usize {
	row_stride(width) * height + HEADER_SIZE
}

/// Header of an uncompressed, bottom-up, 24-bit bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapHeader {
	width: u32,
	height: u32,
}

impl BitmapHeader {
	/// Size of the header in bytes
	pub const SIZE: usize = HEADER_SIZE;

	/// Creates a header for an image of the given dimensions.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
		}
	}

	/// Returns the width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Returns the height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns the padded row stride in bytes.
	pub fn stride(&self) -> usize {
		row_stride(self.width as usize)
	}

	/// Returns the total file size, header included.
	pub fn file_size(&self) -> usize {
		file_size(self.width as usize, self.height as usize)
	}

	/// Serialises the header.
	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let total = self.file_size() as u32;
		let body = total - HEADER_SIZE as u32;

		let mut bytes = [0u8; HEADER_SIZE];
		bytes[0] = b'B';
		bytes[1] = b'M';
		bytes[2..6].copy_from_slice(&total.to_le_bytes());
		bytes[10..14].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
		bytes[14..18].copy_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
		bytes[18..22].copy_from_slice(&self.width.to_le_bytes());
		bytes[22..26].copy_from_slice(&self.height.to_le_bytes());
		bytes[26..28].copy_from_slice(&1u16.to_le_bytes());
		bytes[28..30].copy_from_slice(&24u16.to_le_bytes());
		bytes[34..38].copy_from_slice(&body.to_le_bytes());

		bytes
	}
}
