//! SPB Image Decompression
//!
//! ## Plane Encoding
//!
//! Each of the three colour planes is a bit stream (MSB first, keyed) that
//! reconstructs `width * height` 8-bit samples:
//!
//! 1. The first sample is a raw 8-bit literal and seeds the running value `c`.
//! 2. Until the plane is full, read a 3-bit selector `n`:
//!
//! | `n`  | Meaning                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | emit `c` four times                                         |
//! | 1..5 | delta width `m = n + 2`                                     |
//! | 6    | `m = 8`: the next four samples are raw 8-bit literals      |
//! | 7    | read 1 more bit `b`, delta width `m = b + 1`                |
//!
//! 3. For `m < 8`, each of the next four samples reads `k` (`m` bits): odd `k`
//!    adds `(k >> 1) + 1` to `c`, even `k` subtracts `k >> 1`. Arithmetic wraps
//!    at 8 bits.
//!
//! Groups always emit four samples, so a plane may overrun its pixel count by
//! up to three samples; the overrun is discarded.
//!
//! ## Pixel Order
//!
//! Samples are laid out in a serpentine scan starting at the top row: even
//! rows run left to right, odd rows right to left. Because the bitmap stores
//! rows bottom-up, scan row `j` lands in bitmap row `height - 1 - j`. Plane
//! `i` fills byte `i` of every 3-byte pixel.

use std::io::Read;

use log::warn;

use super::Header;
use crate::file::{
	DecodeError,
	bmp::{self, BitmapHeader},
	codec::{BitReader, KeyTable},
};

/// Number of colour planes in an SPB image
const PLANES: usize = 3;

/// Selector that repeats the running sample
const OP_REPEAT: u32 = 0;

/// Selector that reads one extra bit for a narrow delta
const OP_NARROW: u32 = 7;

/// Delta width that means "raw literal"
const LITERAL_WIDTH: u32 = 8;

/// Samples emitted per selector
const GROUP: usize = 4;

/// Per-call decoder state
struct PlaneDecoder<'k, R> {
	bits: BitReader<'k, R>,
	width: usize,
	height: usize,
	samples: Vec<u8>,
}

impl<'k, R: Read> PlaneDecoder<'k, R> {
	fn new(reader: R, key: &'k KeyTable, width: usize, height: usize) -> Self {
		Self {
			bits: BitReader::new(reader, key),
			width,
			height,
			samples: vec![0; width * height + GROUP],
		}
	}

	/// Decodes one plane into `self.samples`.
	///
	/// Returns the number of valid samples, which is less than the pixel
	/// count only if the stream ran out.
	fn decode_plane(&mut self) -> usize {
		let pixels = self.width * self.height;
		let mut count = 0;

		let Some(seed) = self.bits.read_bits(8) else {
			return 0;
		};
		let mut c = seed as u8;
		self.samples[count] = c;
		count += 1;

		'plane: while count < pixels {
			let Some(n) = self.bits.read_bits(3) else {
				break;
			};

			if n == OP_REPEAT {
				self.samples[count..count + GROUP].fill(c);
				count += GROUP;
				continue;
			}

			let m = if n == OP_NARROW {
				match self.bits.read_bits(1) {
					Some(bit) => bit + 1,
					None => break,
				}
			} else {
				n + 2
			};

			for _ in 0..GROUP {
				if m == LITERAL_WIDTH {
					let Some(literal) = self.bits.read_bits(8) else {
						break 'plane;
					};
					c = literal as u8;
				} else {
					let Some(k) = self.bits.read_bits(m) else {
						break 'plane;
					};
					if k & 1 != 0 {
						c = c.wrapping_add(((k >> 1) + 1) as u8);
					} else {
						c = c.wrapping_sub((k >> 1) as u8);
					}
				}
				self.samples[count] = c;
				count += 1;
			}
		}

		count.min(pixels)
	}

	/// Writes the first `count` samples of the current plane into `pixels`.
	fn scatter(&self, plane: usize, count: usize, pixels: &mut [u8]) {
		let stride = bmp::row_stride(self.width);

		for (index, &sample) in self.samples[..count].iter().enumerate() {
			let row = index / self.width;
			let column = if row % 2 == 0 {
				index % self.width
			} else {
				self.width - 1 - index % self.width
			};
			let offset = (self.height - 1 - row) * stride + column * 3 + plane;
			pixels[offset] = sample;
		}
	}
}

/// Decodes the planes following `header` into `out`, which must be exactly
/// `header.decoded_len()` bytes. Returns the number of bytes produced.
fn decode_body<R: Read>(reader: R, key: &KeyTable, header: &Header, out: &mut [u8]) -> usize {
	let width = header.width() as usize;
	let height = header.height() as usize;
	let total = header.decoded_len();

	out[..bmp::HEADER_SIZE]
		.copy_from_slice(&BitmapHeader::new(width as u32, height as u32).to_bytes());
	out[bmp::HEADER_SIZE..].fill(0);

	let pixels = header.pixel_count();
	if pixels == 0 {
		return total;
	}

	let mut decoder = PlaneDecoder::new(reader, key, width, height);
	let mut produced = bmp::HEADER_SIZE;

	for plane in 0..PLANES {
		let count = decoder.decode_plane();
		decoder.scatter(plane, count, &mut out[bmp::HEADER_SIZE..]);
		produced += count;

		if count < pixels {
			warn!(
				"SPB stream truncated in plane {plane}: {count} of {pixels} samples decoded"
			);
			return produced;
		}
	}

	total
}

/// Decodes an SPB stream into a caller-provided buffer.
///
/// Returns the number of bytes produced. A complete image produces exactly
/// [`Header::decoded_len`] bytes; a smaller count means the stream was
/// truncated and only part of the pixel data is valid.
pub fn decode_into<R: Read>(
	reader: &mut R,
	key: &KeyTable,
	buf: &mut [u8],
) -> Result<usize, DecodeError> {
	let header = Header::from_reader(reader, key)?;
	let total = header.decoded_len();

	if buf.len() < total {
		return Err(DecodeError::BufferTooSmall {
			required: total,
			available: buf.len(),
		});
	}

	Ok(decode_body(reader, key, &header, &mut buf[..total]))
}

/// Decodes an SPB stream into a new bitmap file buffer.
///
/// Unlike [`decode_into`], a truncated stream is an error.
pub fn decode<R: Read>(reader: &mut R, key: &KeyTable) -> Result<Vec<u8>, DecodeError> {
	let header = Header::from_reader(reader, key)?;
	let total = header.decoded_len();
	let mut out = vec![0u8; total];

	let produced = decode_body(reader, key, &header, &mut out);
	if produced < total {
		return Err(DecodeError::Truncated {
			expected: total,
			produced,
		});
	}

	Ok(out)
}
